//! Per-asset symmetric key.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;

use crate::{Error, Result};

/// Width of the AES-128 content key in bytes.
pub const KEY_LEN: usize = 16;

/// A 128-bit AES key, generated once per asset and carried in its manifest.
#[derive(Clone, PartialEq, Eq)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    /// Generate a fresh key from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Standard (padded) base64, as carried in the manifest key tag.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    /// Parse a base64 key tag value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] if the value is not valid base64 or does
    /// not decode to exactly 16 bytes.
    pub fn from_base64(value: &str) -> Result<Self> {
        let raw = STANDARD
            .decode(value.trim())
            .map_err(|e| Error::InvalidKey(format!("not base64: {e}")))?;
        let bytes: [u8; KEY_LEN] = raw.as_slice().try_into().map_err(|_| {
            Error::InvalidKey(format!("expected {KEY_LEN} bytes, got {}", raw.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_key_base64() {
        let key = Key::from_bytes([0u8; KEY_LEN]);
        assert_eq!(key.to_base64(), "AAAAAAAAAAAAAAAAAAAAAA==");
        assert_eq!(Key::from_base64("AAAAAAAAAAAAAAAAAAAAAA==").unwrap(), key);
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(Key::generate(), Key::generate());
    }

    #[test]
    fn rejects_wrong_length() {
        // 8 bytes
        let err = Key::from_base64("AAAAAAAAAAA=").unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn rejects_non_base64() {
        let err = Key::from_base64("not*base64!").unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn debug_does_not_leak() {
        let key = Key::from_bytes([7u8; KEY_LEN]);
        assert_eq!(format!("{key:?}"), "Key(<redacted>)");
    }
}
