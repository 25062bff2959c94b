//! Playlist synthesis and the local key artifact it points at.

use std::io::Write;
use std::path::{Path, PathBuf};

use mc_core::{Error, Key, Result};
use mc_media::{generate_media_playlist, KeyDirective, MediaPlaylist, Segment};
use tempfile::NamedTempFile;

use crate::mirror::SegmentResolution;

/// Raw key bytes on local disk, referenced by the playlist's `#EXT-X-KEY`.
///
/// The file is removed when the artifact is dropped, so any failure between
/// creation and [`KeyArtifact::persist`] leaves nothing behind. After
/// `persist` the file belongs to the caller.
pub struct KeyArtifact {
    file: NamedTempFile,
    target: Option<PathBuf>,
}

impl KeyArtifact {
    /// Write `key` to a uniquely named file in `dir`.
    pub fn create_in(dir: &Path, key: &Key) -> Result<Self> {
        let dir = dir.canonicalize().map_err(|e| {
            Error::Validation(format!("key directory {}: {e}", dir.display()))
        })?;
        let file = write_key(&dir, key)?;
        Ok(Self { file, target: None })
    }

    /// Stage `key` next to `dest`; [`KeyArtifact::persist`] moves it there.
    pub fn create_at(dest: &Path, key: &Key) -> Result<Self> {
        let file_name = dest.file_name().ok_or_else(|| {
            Error::Validation(format!("key path {} has no file name", dest.display()))
        })?;
        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let parent = parent.canonicalize().map_err(|e| {
            Error::Validation(format!("key directory {}: {e}", parent.display()))
        })?;

        let file = write_key(&parent, key)?;
        Ok(Self {
            file,
            target: Some(parent.join(file_name)),
        })
    }

    /// The absolute path the key will have once persisted.
    pub fn path(&self) -> &Path {
        self.target.as_deref().unwrap_or_else(|| self.file.path())
    }

    /// `file://` URI for the playlist's decryption directive.
    pub fn uri(&self) -> String {
        format!("file://{}", self.path().display())
    }

    /// Keep the file past this artifact's lifetime and return its path.
    pub fn persist(self) -> Result<PathBuf> {
        match self.target {
            Some(dest) => {
                self.file.persist(&dest).map_err(|e| Error::Io { source: e.error })?;
                Ok(dest)
            }
            None => self
                .file
                .into_temp_path()
                .keep()
                .map_err(|e| Error::Io { source: e.error }),
        }
    }
}

fn write_key(dir: &Path, key: &Key) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("mirrorcast-")
        .suffix(".key")
        .tempfile_in(dir)?;
    file.write_all(key.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Build the server-bound playlist for `resolutions`, in their order.
///
/// Every entry carries the same nominal `segment_duration`; segments are
/// decrypted with AES-128 using the key at `key_uri` and a zero IV.
pub fn synthesize_playlist(
    resolutions: &[SegmentResolution],
    key_uri: &str,
    segment_duration: u32,
) -> String {
    let playlist = MediaPlaylist {
        version: 3,
        target_duration: segment_duration,
        media_sequence: 0,
        key: Some(KeyDirective::aes128_zero_iv(key_uri)),
        segments: resolutions
            .iter()
            .map(|r| Segment {
                duration: f64::from(segment_duration),
                uri: r.url.clone(),
            })
            .collect(),
        ended: true,
    };

    generate_media_playlist(&playlist)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution(mirror: &str, hash: &str) -> SegmentResolution {
        SegmentResolution {
            hash: hash.to_string(),
            mirror: mirror.to_string(),
            url: format!("{mirror}/{hash}.ts"),
        }
    }

    #[test]
    fn playlist_lists_resolved_urls_in_order() {
        let playlist = synthesize_playlist(
            &[resolution("http://a", "h1"), resolution("http://b", "h2")],
            "file:///tmp/k.key",
            6,
        );

        let expected = "\
#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:6
#EXT-X-MEDIA-SEQUENCE:0
#EXT-X-KEY:METHOD=AES-128,URI=\"file:///tmp/k.key\",IV=0x00000000000000000000000000000000
#EXTINF:6.0,
http://a/h1.ts
#EXTINF:6.0,
http://b/h2.ts
#EXT-X-ENDLIST
";
        assert_eq!(playlist, expected);
    }

    #[test]
    fn artifact_holds_key_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let key = Key::from_bytes([5u8; 16]);
        let artifact = KeyArtifact::create_in(dir.path(), &key).unwrap();

        assert!(artifact.path().is_absolute());
        assert!(artifact.uri().starts_with("file:///"));
        assert_eq!(std::fs::read(artifact.path()).unwrap(), vec![5u8; 16]);
    }

    #[test]
    fn dropped_artifact_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = KeyArtifact::create_in(dir.path(), &Key::generate()).unwrap();
        let path = artifact.path().to_path_buf();
        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn persisted_artifact_survives() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = KeyArtifact::create_in(dir.path(), &Key::generate()).unwrap();
        let expected = artifact.path().to_path_buf();
        let path = artifact.persist().unwrap();
        assert_eq!(path, expected);
        assert!(path.exists());
    }

    #[test]
    fn create_at_moves_to_destination_on_persist() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("asset.key");
        let key = Key::from_bytes([1u8; 16]);

        let artifact = KeyArtifact::create_at(&dest, &key).unwrap();
        assert_eq!(
            artifact.path(),
            dir.path().canonicalize().unwrap().join("asset.key")
        );
        assert!(!dest.exists());

        let path = artifact.persist().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1u8; 16]);
        assert!(dest.exists());
    }

    #[test]
    fn create_in_missing_dir_fails() {
        let result = KeyArtifact::create_in(Path::new("/nonexistent/keys"), &Key::generate());
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
