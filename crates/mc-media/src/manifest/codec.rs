//! Manifest encoding and validated decoding.

use mc_core::{Error, Key, Result};

use super::types::{Manifest, Tag};

impl Manifest {
    /// Build a manifest from the asset key and its segment hashes in playback
    /// order. Mirrors are added later by the publisher.
    pub fn encode<I, S>(key: &Key, segment_hashes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::encode_with_mirrors(key, segment_hashes, std::iter::empty::<String>())
    }

    /// Build a manifest with segment refs, then mirrors, then the key tag.
    pub fn encode_with_mirrors<I, S, M, U>(key: &Key, segment_hashes: I, mirrors: M) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        M: IntoIterator<Item = U>,
        U: Into<String>,
    {
        let mut tags: Vec<Tag> = segment_hashes
            .into_iter()
            .map(|h| Tag::SegmentRef(h.into()))
            .collect();
        tags.extend(mirrors.into_iter().map(|m| Tag::Mirror(m.into())));
        tags.push(Tag::Key(key.to_base64()));

        Self {
            tags,
            ..Self::default()
        }
    }

    /// Override the discriminator.
    pub fn with_kind(mut self, kind: u64) -> Self {
        self.kind = kind;
        self
    }

    /// Insert a mirror tag after any existing mirrors, ahead of the key tag.
    pub fn add_mirror(&mut self, url: impl Into<String>) {
        let pos = self
            .tags
            .iter()
            .rposition(|t| matches!(t, Tag::SegmentRef(_) | Tag::Mirror(_)))
            .map_or(0, |i| i + 1);
        self.tags.insert(pos, Tag::Mirror(url.into()));
    }
}

/// A manifest that passed validation, split into its three collections.
#[derive(Debug, Clone)]
pub struct DecodedManifest {
    /// Mirror base URLs in priority order.
    pub mirrors: Vec<String>,
    /// Segment hashes in playback order.
    pub segments: Vec<String>,
    pub key: Key,
}

impl DecodedManifest {
    /// Validate `manifest` in a single pass over its tags.
    ///
    /// Checks run in order: discriminator, tag values, mirrors, segments, key.
    /// The first failing check is returned; there is no partial result.
    pub fn from_manifest(manifest: &Manifest, expected_kind: u64) -> Result<Self> {
        if manifest.kind != expected_kind {
            return Err(Error::WrongManifestKind {
                expected: expected_kind,
                found: manifest.kind,
            });
        }

        let mut mirrors = Vec::new();
        let mut segments = Vec::new();
        let mut keys = Vec::new();
        for tag in &manifest.tags {
            match tag {
                Tag::SegmentRef(hash) => {
                    if !is_segment_identifier(hash) {
                        return Err(Error::MalformedManifest(format!(
                            "segment-ref {hash:?} is not a URL-safe identifier"
                        )));
                    }
                    segments.push(hash.clone());
                }
                Tag::Mirror(url) => {
                    if url.is_empty() || url.chars().any(|c| c.is_control() || c.is_whitespace()) {
                        return Err(Error::MalformedManifest(format!(
                            "mirror {url:?} contains whitespace or control characters"
                        )));
                    }
                    mirrors.push(url.clone());
                }
                Tag::Key(value) => keys.push(value.as_str()),
                Tag::Other(_) => {}
            }
        }

        if mirrors.is_empty() {
            return Err(Error::NoMirrors);
        }
        if segments.is_empty() {
            return Err(Error::NoSegments);
        }
        let key = match keys.as_slice() {
            [] => return Err(Error::MissingKey),
            [value] => Key::from_base64(value)?,
            many => return Err(Error::DuplicateKey(many.len())),
        };

        Ok(Self {
            mirrors,
            segments,
            key,
        })
    }
}

/// Segment identifiers end up as a URL path component and a playlist line.
fn is_segment_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
}

/// Parse and validate a manifest from its JSON wire form.
pub fn decode_manifest(raw: &str, expected_kind: u64) -> Result<DecodedManifest> {
    let manifest = Manifest::from_json(raw)?;
    DecodedManifest::from_manifest(&manifest, expected_kind)
}
