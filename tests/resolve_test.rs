//! Resolver pipeline tests against live HTTP mirrors (wiremock).

use std::time::Duration;

use mc_core::config::Config;
use mc_core::{Error, Key};
use mc_media::Manifest;
use mirrorcast::mirror::MirrorResolver;
use mirrorcast::resolve::resolve_manifest;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(server: &MockServer, segment: &str) {
    Mock::given(method("HEAD"))
        .and(path(format!("/{segment}")))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

fn config_with_key_dir(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.resolver.key_dir = Some(dir.to_path_buf());
    config.resolver.probe_timeout_secs = 2;
    config
}

fn key_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[tokio::test]
async fn test_two_mirrors_end_to_end() {
    let a = MockServer::start().await;
    let b = MockServer::start().await;
    serve(&a, "h1.ts").await;
    serve(&b, "h2.ts").await;

    let key = Key::from_bytes([0u8; 16]);
    let manifest = Manifest::encode_with_mirrors(&key, ["h1", "h2"], [a.uri(), b.uri()]);
    let raw = manifest.to_json();

    let keys = tempfile::tempdir().unwrap();
    let config = config_with_key_dir(keys.path());
    let resolver = MirrorResolver::from_config(&config.resolver);

    let resolved = resolve_manifest(&config, &resolver, &raw, None).await.unwrap();

    let first = format!("{}/h1.ts", a.uri());
    let second = format!("{}/h2.ts", b.uri());
    let lines: Vec<&str> = resolved.playlist.lines().collect();
    let first_at = lines.iter().position(|l| *l == first).unwrap();
    let second_at = lines.iter().position(|l| *l == second).unwrap();
    assert!(first_at < second_at);
    assert_eq!(lines[first_at - 1], "#EXTINF:6.0,");
    assert_eq!(lines.last(), Some(&"#EXT-X-ENDLIST"));

    let key_line = format!(
        "#EXT-X-KEY:METHOD=AES-128,URI=\"file://{}\",IV=0x00000000000000000000000000000000",
        resolved.key_path.display()
    );
    assert!(resolved.playlist.contains(&key_line));
    assert_eq!(std::fs::read(&resolved.key_path).unwrap(), vec![0u8; 16]);
    assert!(resolved.key_path.starts_with(keys.path().canonicalize().unwrap()));
}

#[tokio::test]
async fn test_priority_prefers_earlier_mirror() {
    let m1 = MockServer::start().await;
    let m2 = MockServer::start().await;
    let m3 = MockServer::start().await;
    serve(&m2, "s.ts").await;
    serve(&m3, "s.ts").await;

    let raw = Manifest::encode_with_mirrors(
        &Key::generate(),
        ["s"],
        [m1.uri(), m2.uri(), m3.uri()],
    )
    .to_json();

    let keys = tempfile::tempdir().unwrap();
    let config = config_with_key_dir(keys.path());
    let resolver = MirrorResolver::from_config(&config.resolver);
    let resolved = resolve_manifest(&config, &resolver, &raw, None).await.unwrap();

    assert!(resolved.playlist.contains(&format!("{}/s.ts", m2.uri())));
    assert!(!resolved.playlist.contains(&m3.uri()));
    assert!(m3.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unavailable_segment_leaves_no_key_behind() {
    let m1 = MockServer::start().await;
    let m2 = MockServer::start().await;
    serve(&m1, "s1.ts").await;
    serve(&m2, "s1.ts").await;

    let raw = Manifest::encode_with_mirrors(&Key::generate(), ["s1", "s2"], [m1.uri(), m2.uri()])
        .to_json();

    let keys = tempfile::tempdir().unwrap();
    let config = config_with_key_dir(keys.path());
    let resolver = MirrorResolver::from_config(&config.resolver);
    let err = resolve_manifest(&config, &resolver, &raw, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SegmentUnavailable { ref identifier, .. } if identifier == "s2"));
    assert_eq!(key_files(keys.path()), 0);
}

#[tokio::test]
async fn test_slow_mirror_falls_through_to_next() {
    let slow = MockServer::start().await;
    let fast = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&slow)
        .await;
    serve(&fast, "h1.ts").await;

    let raw = Manifest::encode_with_mirrors(&Key::generate(), ["h1"], [slow.uri(), fast.uri()])
        .to_json();

    let keys = tempfile::tempdir().unwrap();
    let mut config = config_with_key_dir(keys.path());
    config.resolver.probe_timeout_secs = 1;
    let resolver = MirrorResolver::from_config(&config.resolver);
    let resolved = resolve_manifest(&config, &resolver, &raw, None).await.unwrap();

    assert!(resolved.playlist.contains(&format!("{}/h1.ts", fast.uri())));
}

#[tokio::test]
async fn test_validation_failure_writes_no_key() {
    let keys = tempfile::tempdir().unwrap();
    let config = config_with_key_dir(keys.path());
    let resolver = MirrorResolver::from_config(&config.resolver);

    let raw = Manifest::encode(&Key::generate(), ["h1"]).to_json();
    let err = resolve_manifest(&config, &resolver, &raw, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoMirrors));
    assert_eq!(key_files(keys.path()), 0);
}

#[tokio::test]
async fn test_key_out_path_is_used() {
    let m = MockServer::start().await;
    serve(&m, "h1.ts").await;

    let key = Key::generate();
    let raw = Manifest::encode_with_mirrors(&key, ["h1"], [m.uri()]).to_json();

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("asset.key");
    let config = Config::default();
    let resolver = MirrorResolver::from_config(&config.resolver);
    let resolved = resolve_manifest(&config, &resolver, &raw, Some(&dest))
        .await
        .unwrap();

    assert_eq!(resolved.key_path, dir.path().canonicalize().unwrap().join("asset.key"));
    assert_eq!(std::fs::read(&dest).unwrap(), key.as_bytes().to_vec());
    assert!(resolved.playlist.contains("asset.key\""));
}

#[tokio::test]
async fn test_injected_playlist_lines_are_rejected() {
    let m = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&m)
        .await;

    let raw = Manifest::encode_with_mirrors(
        &Key::generate(),
        ["h1\n#EXT-X-KEY:METHOD=NONE\nhttp://evil/x"],
        [m.uri()],
    )
    .to_json();

    let keys = tempfile::tempdir().unwrap();
    let config = config_with_key_dir(keys.path());
    let resolver = MirrorResolver::from_config(&config.resolver);
    let err = resolve_manifest(&config, &resolver, &raw, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedManifest(_)));
    assert!(m.received_requests().await.unwrap().is_empty());
    assert_eq!(key_files(keys.path()), 0);
}
