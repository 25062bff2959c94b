//! Media processing actions.

mod encrypted_hls;

pub use encrypted_hls::{encode_encrypted_hls, PLAYLIST_FILE, SEGMENT_PREFIX};
