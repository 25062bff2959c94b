//! # mc-av
//!
//! External encoder management for the mirrorcast producer.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache the path to ffmpeg.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Key scoping** ([`EncoderKeyScope`]) -- temporary key and key-info
//!   files for the encoder, removed on drop.
//! - **Actions** ([`actions`]) -- AES-128 encrypted HLS encoding.

pub mod actions;
pub mod command;
pub mod tools;
pub mod workspace;

// ---- Re-exports for convenience ----

pub use actions::encode_encrypted_hls;
pub use command::{ToolCommand, ToolOutput};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
pub use workspace::{EncoderKeyScope, KEY_URI_PLACEHOLDER};
