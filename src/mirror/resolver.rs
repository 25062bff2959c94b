use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use mc_core::config::ResolverConfig;
use mc_core::{Error, Result};
use mc_media::DecodedManifest;

use super::probe::{segment_url, HttpProbe, SegmentProbe};

/// Where one segment was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentResolution {
    pub hash: String,
    /// The winning mirror base URL, as listed in the manifest.
    pub mirror: String,
    /// Fully qualified segment URL on that mirror.
    pub url: String,
}

/// Binds a manifest's abstract segment list to concrete mirror URLs.
///
/// Mirrors for one segment are probed one after another in list order and
/// the first affirmative answer wins. Different segments are resolved
/// concurrently, up to `concurrency` at a time, and may land on different
/// mirrors.
pub struct MirrorResolver {
    probe: Arc<dyn SegmentProbe>,
    concurrency: usize,
    extension: String,
}

impl MirrorResolver {
    pub fn new(probe: Arc<dyn SegmentProbe>, config: &ResolverConfig) -> Self {
        Self {
            probe,
            concurrency: config.concurrency.max(1),
            extension: config.segment_extension.clone(),
        }
    }

    /// Resolver backed by [`HttpProbe`] with the configured probe timeout.
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(Arc::new(HttpProbe::new(config.probe_timeout())), config)
    }

    /// Resolve every segment of `manifest`, in playback order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SegmentUnavailable`] for the first segment (in
    /// playback order) that no mirror serves. Nothing partial is returned.
    pub async fn resolve(&self, manifest: &DecodedManifest) -> Result<Vec<SegmentResolution>> {
        tracing::info!(
            "Resolving {} segments against {} mirrors",
            manifest.segments.len(),
            manifest.mirrors.len()
        );

        // `buffered` yields in input order, so the output lines up with
        // playback order and an error surfaces for the earliest failing segment.
        stream::iter(&manifest.segments)
            .map(|hash| self.resolve_segment(&manifest.mirrors, hash))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    /// Find the highest-priority mirror serving `hash`.
    pub async fn resolve_segment(&self, mirrors: &[String], hash: &str) -> Result<SegmentResolution> {
        for mirror in mirrors {
            let url = segment_url(mirror, hash, &self.extension);
            if self.probe.has_segment(&url).await {
                tracing::debug!(%hash, %mirror, "segment resolved");
                return Ok(SegmentResolution {
                    hash: hash.to_string(),
                    mirror: mirror.clone(),
                    url,
                });
            }
        }

        tracing::warn!(%hash, "no mirror serves segment");
        Err(Error::segment_unavailable(hash, mirrors.len()))
    }
}
