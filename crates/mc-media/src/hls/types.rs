//! HLS playlist types.

use serde::{Deserialize, Serialize};

/// A single segment in a media playlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Segment duration in seconds.
    pub duration: f64,
    /// URI for this segment.
    pub uri: String,
}

/// Segment decryption directive (`#EXT-X-KEY`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDirective {
    /// Encryption method, e.g. `AES-128`.
    pub method: String,
    /// Where the player loads the key from.
    pub uri: String,
    /// Explicit initialization vector. When absent the player derives it
    /// from the media sequence number.
    pub iv: Option<[u8; 16]>,
}

impl KeyDirective {
    /// AES-128-CBC with an explicit all-zero IV.
    pub fn aes128_zero_iv(uri: impl Into<String>) -> Self {
        Self {
            method: "AES-128".to_string(),
            uri: uri.into(),
            iv: Some([0u8; 16]),
        }
    }
}

/// An HLS media playlist describing a sequence of segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaPlaylist {
    /// `#EXT-X-VERSION` value.
    pub version: u32,
    /// Maximum segment duration in integer seconds (rounded up).
    pub target_duration: u32,
    /// Sequence number of the first segment.
    pub media_sequence: u64,
    /// Optional decryption directive applied to every segment.
    pub key: Option<KeyDirective>,
    /// Ordered list of segments.
    pub segments: Vec<Segment>,
    /// Whether the playlist is complete (VOD). If true, `#EXT-X-ENDLIST` is emitted.
    pub ended: bool,
}
