//! Producer pipeline: media file in, content-addressed package and manifest out.
//!
//! Stages run strictly in sequence: key generation, external encode,
//! content addressing, manifest encoding.

use std::path::{Path, PathBuf};

use mc_av::actions::SEGMENT_PREFIX;
use mc_av::{encode_encrypted_hls, EncoderKeyScope, ToolRegistry, KEY_URI_PLACEHOLDER};
use mc_core::config::Config;
use mc_core::{Error, Key, Result};
use mc_media::hls::strip_key_directive;
use mc_media::{address_segments, AddressedSegment, Manifest};

/// Everything the producer leaves behind for the publisher.
#[derive(Debug)]
pub struct ProducedAsset {
    pub manifest: Manifest,
    /// Segments in playback order.
    pub segments: Vec<AddressedSegment>,
    /// The rewritten `index.m3u8` inside the output directory.
    pub playlist_path: PathBuf,
}

/// Prepare `output_dir` for a fresh encode.
///
/// A non-empty directory is only cleared when `force` is set.
fn prepare_output_dir(output_dir: &Path, force: bool) -> Result<()> {
    if output_dir.exists() {
        let occupied = std::fs::read_dir(output_dir)?.next().is_some();
        if occupied {
            if !force {
                return Err(Error::Validation(format!(
                    "output directory {} is not empty (use --force to replace it)",
                    output_dir.display()
                )));
            }
            tracing::warn!("Removing existing output directory {}", output_dir.display());
            std::fs::remove_dir_all(output_dir)?;
        }
    }
    std::fs::create_dir_all(output_dir)?;
    Ok(())
}

/// Encode `input` into `output_dir` and describe the result as a manifest.
///
/// The input is checked before `output_dir` is touched, so a bad input path
/// never clears an existing directory, even with `force`. `mirrors` are
/// written into the manifest as-is. On a later failure the output directory
/// is left in an unspecified state and should be discarded.
pub async fn produce(
    config: &Config,
    tools: &ToolRegistry,
    input: &Path,
    output_dir: &Path,
    mirrors: &[String],
    force: bool,
) -> Result<ProducedAsset> {
    if !input.is_file() {
        return Err(Error::Validation(format!(
            "input file {} does not exist",
            input.display()
        )));
    }
    prepare_output_dir(output_dir, force)?;

    let key = Key::generate();

    // The key scope lives exactly as long as the encode, on every exit path.
    let playlist_path = {
        let key_scope = EncoderKeyScope::new(&key)?;
        let key_info = key_scope.key_info_path();
        encode_encrypted_hls(tools, &config.encoder, input, output_dir, &key_info).await?
    };

    let raw_playlist = std::fs::read_to_string(&playlist_path)?;
    let addressed = address_segments(output_dir, SEGMENT_PREFIX, &raw_playlist)?;
    if addressed.segments.is_empty() {
        return Err(Error::Internal(format!(
            "encoder produced no segments in {}",
            output_dir.display()
        )));
    }

    let playlist = strip_key_directive(&addressed.playlist, KEY_URI_PLACEHOLDER);
    std::fs::write(&playlist_path, playlist)?;

    let manifest = Manifest::encode_with_mirrors(&key, addressed.hashes(), mirrors)
        .with_kind(config.manifest.kind);

    tracing::info!(
        "Produced {} segments in {}",
        addressed.segments.len(),
        output_dir.display()
    );

    Ok(ProducedAsset {
        manifest,
        segments: addressed.segments,
        playlist_path,
    })
}
