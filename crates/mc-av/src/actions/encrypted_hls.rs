//! AES-128 encrypted HLS encoding via ffmpeg.

use std::path::{Path, PathBuf};

use mc_core::config::EncoderConfig;

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

/// Playlist file name written by the encoder.
pub const PLAYLIST_FILE: &str = "index.m3u8";

/// Prefix of the encoder's segment files (`segment_000`, `segment_001`, ...).
pub const SEGMENT_PREFIX: &str = "segment_";

/// Encode `input` into a single-rendition encrypted HLS package.
///
/// Produces:
/// - `<output_dir>/index.m3u8`: VOD playlist referencing the segments
/// - `<output_dir>/segment_000`, `segment_001`, ...: encrypted MPEG-TS segments
///
/// Returns the playlist path. A non-zero encoder exit surfaces as
/// [`mc_core::Error::EncoderFailed`].
pub async fn encode_encrypted_hls(
    tools: &ToolRegistry,
    settings: &EncoderConfig,
    input: &Path,
    output_dir: &Path,
    key_info: &Path,
) -> mc_core::Result<PathBuf> {
    let ffmpeg = tools.require("ffmpeg")?;

    std::fs::create_dir_all(output_dir).map_err(|e| {
        mc_core::Error::Internal(format!(
            "Failed to create HLS output dir {}: {e}",
            output_dir.display()
        ))
    })?;

    let playlist_path = output_dir.join(PLAYLIST_FILE);

    tracing::info!(
        "Encoding {:?} -> {:?} ({}p, crf={}, segment_duration={}s)",
        input,
        output_dir,
        settings.height,
        settings.crf,
        settings.segment_duration_secs
    );

    let mut cmd = ToolCommand::new(ffmpeg.path.clone());
    cmd.timeout(settings.timeout());
    build_args(&mut cmd, settings, input, output_dir, key_info);
    cmd.execute().await?;

    Ok(playlist_path)
}

fn build_args(
    cmd: &mut ToolCommand,
    settings: &EncoderConfig,
    input: &Path,
    output_dir: &Path,
    key_info: &Path,
) {
    let seg_pattern = output_dir.join(format!("{SEGMENT_PREFIX}%03d"));
    let gop = settings.gop_size.to_string();

    cmd.args(["-y", "-i"]);
    cmd.arg(input.to_string_lossy().as_ref());

    // video
    cmd.args(["-c:v", "h264", "-profile:v", "main"]);
    cmd.args(["-vf", &format!("scale=-2:{}", settings.height)]);
    cmd.args(["-crf", &settings.crf.to_string()]);
    cmd.args(["-g", &gop, "-keyint_min", &gop]);

    // audio
    cmd.args(["-c:a", "aac"]);
    cmd.args(["-ar", &settings.audio_sample_rate.to_string()]);
    cmd.args(["-b:a", &settings.audio_bitrate]);

    // HLS
    cmd.args(["-hls_time", &settings.segment_duration_secs.to_string()]);
    cmd.args(["-hls_segment_filename", &seg_pattern.to_string_lossy()]);
    cmd.args(["-hls_playlist_type", "vod"]);
    cmd.args(["-hls_key_info_file", &key_info.to_string_lossy()]);
    cmd.arg(output_dir.join(PLAYLIST_FILE).to_string_lossy().as_ref());
}
