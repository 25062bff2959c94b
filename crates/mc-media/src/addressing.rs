//! Content addressing of encoder output.
//!
//! The encoder names segments by index (`segment_000`, `segment_001`, ...).
//! [`address_segments`] renames each one to the SHA-256 of its bytes and
//! rewrites the companion playlist to match, so a segment's name no longer
//! depends on which server or encode run produced it.
//!
//! Identical segment contents collapse into one file; the playlist still
//! references it once per original occurrence.

use std::fs::File;
use std::io;
use std::path::Path;

use mc_core::{Error, Result};
use sha2::{Digest, Sha256};

/// Extension given to addressed segment files (MPEG-TS).
pub const SEGMENT_EXTENSION: &str = "ts";

/// One encoder segment and the content hash it was renamed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressedSegment {
    /// File name written by the encoder.
    pub original: String,
    /// Lowercase hex SHA-256 of the segment bytes.
    pub hash: String,
}

impl AddressedSegment {
    /// Name of the renamed file, `<hash>.ts`.
    pub fn file_name(&self) -> String {
        format!("{}.{SEGMENT_EXTENSION}", self.hash)
    }
}

/// Result of addressing an encoder output directory.
#[derive(Debug, Clone)]
pub struct AddressedOutput {
    /// Segments in playback order.
    pub segments: Vec<AddressedSegment>,
    /// Playlist text with every original name replaced by its addressed name.
    pub playlist: String,
}

impl AddressedOutput {
    /// Segment hashes in playback order, as carried by the manifest.
    pub fn hashes(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.hash.clone()).collect()
    }
}

/// Lowercase hex SHA-256 of `data`.
pub fn content_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Whether `name` is an encoder segment name: `prefix` followed by digits.
pub fn is_segment_name(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|idx| !idx.is_empty() && idx.bytes().all(|b| b.is_ascii_digit()))
}

/// Hash and rename every `<prefix><index>` file in `dir`, and rewrite
/// `playlist` to reference the new names.
///
/// Segments are processed in index order. Any read or rename failure aborts
/// the whole operation; the directory may then hold a mix of old and new
/// names and should be discarded.
pub fn address_segments(dir: &Path, prefix: &str, playlist: &str) -> Result<AddressedOutput> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_context(e, dir))? {
        let entry = entry.map_err(|e| io_context(e, dir))?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if is_segment_name(&name, prefix) && entry.path().is_file() {
            names.push(name);
        }
    }

    // Index order. Equal to plain name order while the index keeps its
    // zero padding, and still numeric once it outgrows it.
    names.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    let mut segments = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        let hash = hash_file(&path)?;
        let segment = AddressedSegment {
            original: name,
            hash,
        };
        let target = dir.join(segment.file_name());
        std::fs::rename(&path, &target).map_err(|e| io_context(e, &path))?;
        tracing::debug!(original = %segment.original, hash = %segment.hash, "segment addressed");
        segments.push(segment);
    }

    let playlist = rewrite_references(playlist, &segments);
    tracing::info!("Addressed {} segments in {}", segments.len(), dir.display());

    Ok(AddressedOutput { segments, playlist })
}

/// Replace every occurrence of each original name with its addressed name.
///
/// Longer names go first so `segment_100` never matches inside
/// `segment_1000`.
pub fn rewrite_references(playlist: &str, segments: &[AddressedSegment]) -> String {
    let mut ordered: Vec<&AddressedSegment> = segments.iter().collect();
    ordered.sort_by(|a, b| b.original.len().cmp(&a.original.len()));

    let mut text = playlist.to_string();
    for segment in ordered {
        text = text.replace(&segment.original, &segment.file_name());
    }
    text
}

fn hash_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| io_context(e, path))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| io_context(e, path))?;
    Ok(hex::encode(hasher.finalize()))
}

fn io_context(e: io::Error, path: &Path) -> Error {
    Error::Io {
        source: io::Error::new(e.kind(), format!("{}: {e}", path.display())),
    }
}
