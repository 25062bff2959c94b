//! Resolver pipeline: manifest in, server-bound playlist out.

use std::path::{Path, PathBuf};

use mc_core::config::Config;
use mc_core::Result;
use mc_media::decode_manifest;

use crate::mirror::MirrorResolver;
use crate::playlist::{synthesize_playlist, KeyArtifact};

/// A synthesized playlist and the key file it references.
#[derive(Debug)]
pub struct ResolvedPlaylist {
    pub playlist: String,
    /// Persisted key file; removing it once playback is done is up to the caller.
    pub key_path: PathBuf,
}

/// Decode `raw`, resolve every segment against its mirrors, and synthesize
/// the playlist.
///
/// The key is written to `key_out` when given, otherwise to a uniquely named
/// file in `config.resolver.key_dir`. On any failure the key file is removed
/// and no playlist is produced.
pub async fn resolve_manifest(
    config: &Config,
    resolver: &MirrorResolver,
    raw: &str,
    key_out: Option<&Path>,
) -> Result<ResolvedPlaylist> {
    let manifest = decode_manifest(raw, config.manifest.kind)?;

    let artifact = match key_out {
        Some(dest) => KeyArtifact::create_at(dest, &manifest.key)?,
        None => KeyArtifact::create_in(&config.resolver.key_dir(), &manifest.key)?,
    };

    let resolutions = resolver.resolve(&manifest).await?;
    let playlist = synthesize_playlist(
        &resolutions,
        &artifact.uri(),
        config.encoder.segment_duration_secs,
    );
    let key_path = artifact.persist()?;

    tracing::info!(
        "Resolved {} segments; key written to {}",
        resolutions.len(),
        key_path.display()
    );

    Ok(ResolvedPlaylist { playlist, key_path })
}
