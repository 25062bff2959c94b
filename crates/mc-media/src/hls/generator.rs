//! HLS playlist generation functions.

use super::types::MediaPlaylist;
use std::fmt::Write;

/// Generate an HLS media playlist (M3U8) from a [`MediaPlaylist`].
///
/// Output includes:
/// - `#EXTM3U` header
/// - `#EXT-X-VERSION`, `#EXT-X-TARGETDURATION`, `#EXT-X-MEDIA-SEQUENCE`
/// - Optional `#EXT-X-KEY` decryption directive
/// - `#EXTINF` for each segment
/// - Optional `#EXT-X-ENDLIST` for VOD playlists
pub fn generate_media_playlist(playlist: &MediaPlaylist) -> String {
    let mut out = String::new();

    writeln!(out, "#EXTM3U").unwrap();
    writeln!(out, "#EXT-X-VERSION:{}", playlist.version).unwrap();
    writeln!(out, "#EXT-X-TARGETDURATION:{}", playlist.target_duration).unwrap();
    writeln!(out, "#EXT-X-MEDIA-SEQUENCE:{}", playlist.media_sequence).unwrap();

    if let Some(ref key) = playlist.key {
        write!(out, "#EXT-X-KEY:METHOD={},URI=\"{}\"", key.method, key.uri).unwrap();
        if let Some(iv) = key.iv {
            write!(out, ",IV=0x{}", hex::encode(iv)).unwrap();
        }
        writeln!(out).unwrap();
    }

    for segment in &playlist.segments {
        writeln!(out, "#EXTINF:{:.1},", segment.duration).unwrap();
        writeln!(out, "{}", segment.uri).unwrap();
    }

    if playlist.ended {
        writeln!(out, "#EXT-X-ENDLIST").unwrap();
    }

    out
}

/// Remove every `#EXT-X-KEY` line whose `URI` is `uri`.
///
/// The encoder writes a directive pointing at its placeholder key URI; the
/// published package carries the key in the manifest instead.
pub fn strip_key_directive(playlist: &str, uri: &str) -> String {
    let needle = format!("URI=\"{uri}\"");
    let mut out = String::with_capacity(playlist.len());
    for line in playlist.split_inclusive('\n') {
        if line.starts_with("#EXT-X-KEY:") && line.contains(&needle) {
            continue;
        }
        out.push_str(line);
    }
    out
}
