//! Scoped key material for the external encoder.
//!
//! ffmpeg only accepts an encryption key by file reference, so an
//! [`EncoderKeyScope`] writes the raw key and the key-info descriptor into a
//! private temporary directory. Both files disappear when the scope is
//! dropped, whether encoding succeeded or not.

use std::path::PathBuf;

use mc_core::Key;
use tempfile::TempDir;

/// URI written into the encoder's `#EXT-X-KEY` line. Players never fetch it;
/// the producer strips that line after encoding.
pub const KEY_URI_PLACEHOLDER: &str = "enc.key";

const KEY_FILE: &str = "enc.key";
const KEY_INFO_FILE: &str = "enc.keyinfo";

/// Temporary home for the key file and key-info descriptor consumed by ffmpeg.
///
/// # Example
///
/// ```no_run
/// use mc_av::EncoderKeyScope;
/// use mc_core::Key;
///
/// let scope = EncoderKeyScope::new(&Key::generate()).unwrap();
/// // ... pass scope.key_info_path() to the encoder ...
/// drop(scope); // key material removed
/// ```
pub struct EncoderKeyScope {
    temp_dir: TempDir,
}

impl EncoderKeyScope {
    /// Write `key` and its key-info descriptor into a fresh temp directory.
    ///
    /// The descriptor has three lines: the URI seen by players, the local
    /// path ffmpeg reads the key from, and an empty IV line (ffmpeg then
    /// derives the IV from the segment sequence number).
    pub fn new(key: &Key) -> mc_core::Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("mirrorcast-key-")
            .tempdir()
            .map_err(|e| mc_core::Error::tool("workspace", format!("failed to create temp dir: {e}")))?;

        let key_path = temp_dir.path().join(KEY_FILE);
        std::fs::write(&key_path, key.as_bytes())?;

        let key_info = format!("{KEY_URI_PLACEHOLDER}\n{}\n", key_path.display());
        std::fs::write(temp_dir.path().join(KEY_INFO_FILE), key_info)?;

        Ok(Self { temp_dir })
    }

    /// Path of the raw key file.
    #[cfg(test)]
    fn key_path(&self) -> PathBuf {
        self.temp_dir.path().join(KEY_FILE)
    }

    /// Path of the key-info descriptor passed as `-hls_key_info_file`.
    pub fn key_info_path(&self) -> PathBuf {
        self.temp_dir.path().join(KEY_INFO_FILE)
    }

    /// The temporary directory holding both files.
    #[cfg(test)]
    fn dir(&self) -> &std::path::Path {
        self.temp_dir.path()
    }
}
