//! mc-core: shared error type, configuration, and the per-asset key.
//!
//! This crate is the foundational dependency for all other mc-* crates.

pub mod config;
pub mod error;
pub mod key;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use key::{Key, KEY_LEN};
