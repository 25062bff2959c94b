//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! tool, encoder, manifest, and resolver sections. Every section defaults
//! sensibly so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::Error;

/// Manifest discriminator written by the producer and required by the resolver.
pub const DEFAULT_MANIFEST_KIND: u64 = 1663;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub encoder: EncoderConfig,
    pub manifest: ManifestConfig,
    pub resolver: ResolverConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.encoder.segment_duration_secs == 0 {
            warnings.push("encoder.segment_duration_secs is 0; ffmpeg will pick its default".into());
        }
        if self.encoder.crf > 51 {
            warnings.push(format!(
                "encoder.crf {} is outside the valid range 0-51",
                self.encoder.crf
            ));
        }
        if self.resolver.concurrency == 0 {
            warnings.push("resolver.concurrency is 0; segments will be probed one at a time".into());
        }
        if self.resolver.probe_timeout_secs == 0 {
            warnings.push("resolver.probe_timeout_secs is 0; every probe will time out".into());
        }
        if self.resolver.segment_extension.is_empty() {
            warnings.push("resolver.segment_extension is empty".into());
        }
        if let Some(ref dir) = self.resolver.key_dir {
            if !dir.is_dir() {
                warnings.push(format!(
                    "resolver.key_dir {} does not exist",
                    dir.display()
                ));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Paths to external CLI tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
}

/// Settings passed to the external encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Output height in pixels; width follows the aspect ratio.
    pub height: u32,
    pub crf: u32,
    /// Nominal segment length, also written as every `#EXTINF` duration.
    pub segment_duration_secs: u32,
    pub gop_size: u32,
    pub audio_bitrate: String,
    pub audio_sample_rate: u32,
    pub timeout_secs: u64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            height: 480,
            crf: 26,
            segment_duration_secs: 6,
            gop_size: 48,
            audio_bitrate: "128k".into(),
            audio_sample_rate: 48000,
            timeout_secs: 3600,
        }
    }
}

impl EncoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Manifest wire settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub kind: u64,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            kind: DEFAULT_MANIFEST_KIND,
        }
    }
}

/// Mirror resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub probe_timeout_secs: u64,
    /// Maximum number of segments probed at once.
    pub concurrency: usize,
    pub segment_extension: String,
    /// Where key artifacts are written; the system temp dir when unset.
    pub key_dir: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: 5,
            concurrency: 8,
            segment_extension: "ts".into(),
            key_dir: None,
        }
    }
}

impl ResolverConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn key_dir(&self) -> PathBuf {
        self.key_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
