//! HLS playlist generation.
//!
//! Generates the server-bound media playlist handed to players, including
//! the AES-128 decryption directive.

mod generator;
mod types;

pub use generator::{generate_media_playlist, strip_key_directive};
pub use types::{KeyDirective, MediaPlaylist, Segment};
