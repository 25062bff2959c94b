//! mc-media: content addressing, manifest encoding, and HLS playlist generation.
//!
//! # Modules
//!
//! - [`addressing`] - Rename encoder segments to their SHA-256 and rewrite the playlist
//! - [`manifest`] - Flat tag-list manifest and its validated decoder
//! - [`hls`] - HLS media playlist generation (M3U8)

pub mod addressing;
pub mod hls;
pub mod manifest;

// Re-export commonly used items at the crate root.
pub use addressing::{address_segments, content_hash, AddressedOutput, AddressedSegment};
pub use hls::{generate_media_playlist, KeyDirective, MediaPlaylist, Segment};
pub use manifest::{decode_manifest, DecodedManifest, Manifest, Tag};
