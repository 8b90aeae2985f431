use super::*;
use crate::config::{Config, SourceConfig};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Downloader rooted in a temp dir, with a pinned free-space probe and a
/// short fetch timeout so timeout scenarios stay fast.
fn test_downloader(root: &std::path::Path, free_bytes: u64) -> ImageDownloader {
    let mut config = Config {
        source: SourceConfig {
            root: root.to_path_buf(),
            input_path: Some("urls.txt".into()),
            ..Default::default()
        },
        ..Default::default()
    };
    config.download.fetch_timeout = Duration::from_millis(300);
    ImageDownloader::with_space_probe(
        config,
        Arc::new(move |_: &std::path::Path| Ok(free_bytes)),
    )
    .unwrap()
}

fn image_head_response(etag: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "image/png")
        .insert_header("content-length", "2048")
        .insert_header("etag", etag)
}

#[tokio::test]
async fn test_mixed_outcomes_end_to_end() {
    let temp_dir = tempfile::tempdir().unwrap();
    let out_dir = temp_dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/good"))
        .respond_with(image_head_response("\"abc123\""))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"png bytes".as_slice()),
        )
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(image_head_response("\"zzz\"").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let downloader = test_downloader(temp_dir.path(), u64::MAX);
    let sink = DiagnosticSink::new();

    // The syntactically invalid token is rejected before scheduling
    let valid = collect_valid(vec!["invalid_locator".to_string()], &sink);
    assert!(valid.is_empty());

    let good = format!("{}/good", server.uri());
    let slow = format!("{}/slow", server.uri());
    let missing = format!("{}/missing", server.uri());
    downloader
        .execute_batches(vec![good.clone(), slow.clone(), missing.clone()], &out_dir, &sink)
        .await;

    // One file written, for the admissible URL only
    let written = std::fs::read(out_dir.join("abc123.png")).unwrap();
    assert_eq!(written, b"png bytes");
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 1);

    // Exactly three diagnostics: syntax, timeout, unavailable
    let diagnostics = sink.snapshot();
    assert_eq!(diagnostics.len(), 3, "diagnostics: {diagnostics:?}");
    assert!(diagnostics.contains(&messages::invalid_locator("invalid_locator")));
    assert!(diagnostics.contains(&messages::timed_out(&slow)));
    assert!(diagnostics.contains(&messages::unavailable(&missing)));
}

#[tokio::test]
async fn test_already_present_artifact_skips_transfer() {
    let temp_dir = tempfile::tempdir().unwrap();
    let out_dir = temp_dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();
    // Artifact for this fingerprint+type is already on disk
    std::fs::write(out_dir.join("abc123.png"), b"existing bytes").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/pic"))
        .respond_with(image_head_response("\"abc123\""))
        .mount(&server)
        .await;
    // The dedup pre-check must prevent the body transfer entirely
    Mock::given(method("GET"))
        .and(path("/pic"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let downloader = test_downloader(temp_dir.path(), u64::MAX);
    let sink = DiagnosticSink::new();
    downloader
        .execute_batches(vec![format!("{}/pic", server.uri())], &out_dir, &sink)
        .await;

    // No transfer, no diagnostic, body untouched
    assert!(sink.is_empty(), "diagnostics: {:?}", sink.snapshot());
    let content = std::fs::read(out_dir.join("abc123.png")).unwrap();
    assert_eq!(content, b"existing bytes");
    server.verify().await;
}

#[tokio::test]
async fn test_admission_rejection_prevents_transfer() {
    let temp_dir = tempfile::tempdir().unwrap();
    let out_dir = temp_dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .insert_header("content-length", "2048")
                .insert_header("etag", "\"abc\""),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let downloader = test_downloader(temp_dir.path(), u64::MAX);
    let sink = DiagnosticSink::new();
    let url = format!("{}/page", server.uri());
    downloader.execute_batches(vec![url.clone()], &out_dir, &sink).await;

    assert_eq!(
        sink.snapshot(),
        vec![messages::admission_failed(&url, crate::AdmissionError::ContentTypeRejected)]
    );
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 0);
    server.verify().await;
}

#[tokio::test]
async fn test_insufficient_space_rejects_before_transfer() {
    let temp_dir = tempfile::tempdir().unwrap();
    let out_dir = temp_dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/pic"))
        .respond_with(image_head_response("\"abc\""))
        .mount(&server)
        .await;

    // Free space barely under the margin once the body lands
    let downloader = test_downloader(temp_dir.path(), 1_000_000);
    let sink = DiagnosticSink::new();
    let url = format!("{}/pic", server.uri());
    downloader.execute_batches(vec![url.clone()], &out_dir, &sink).await;

    assert_eq!(
        sink.snapshot(),
        vec![messages::admission_failed(&url, crate::AdmissionError::InsufficientSpace)]
    );
}

#[tokio::test]
async fn test_save_failure_is_caught_as_diagnostic() {
    let temp_dir = tempfile::tempdir().unwrap();
    let out_dir = temp_dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();
    // This artifact's target directory vanishes before the write lands
    let gone_dir = temp_dir.path().join("gone");

    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/pic"))
        .respond_with(image_head_response("\"abc123\""))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pic"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"png bytes".as_slice()),
        )
        .mount(&server)
        .await;

    let downloader = test_downloader(temp_dir.path(), u64::MAX);
    let url = format!("{}/pic", server.uri());

    // The persistence fault (missing directory) is caught and recorded,
    // never raised out of the batch
    let sink = DiagnosticSink::new();
    downloader
        .execute_batches(vec![url.clone()], &gone_dir, &sink)
        .await;

    let diagnostics = sink.snapshot();
    assert_eq!(diagnostics.len(), 1, "diagnostics: {diagnostics:?}");
    assert!(
        diagnostics[0].starts_with(&format!("Unable to load File from {url}. ")),
        "unexpected diagnostic: {}",
        diagnostics[0]
    );
    // The rendered entry carries the underlying I/O message, not a canned one
    assert_ne!(diagnostics[0], messages::unavailable(&url));
    assert_ne!(diagnostics[0], messages::timed_out(&url));

    // The same fetch against an intact directory still persists its
    // artifact afterwards
    let sink = DiagnosticSink::new();
    downloader.execute_batches(vec![url.clone()], &out_dir, &sink).await;
    assert!(sink.is_empty(), "diagnostics: {:?}", sink.snapshot());
    assert_eq!(
        std::fs::read(out_dir.join("abc123.png")).unwrap(),
        b"png bytes"
    );
}

#[tokio::test]
async fn test_run_with_invalid_download_dir_is_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join("urls.txt"), "http://valid.com").unwrap();

    let mut downloader = test_downloader(temp_dir.path(), u64::MAX);
    let mut config = (*downloader.config).clone();
    config.download.download_dir = Some("no_such_dir".into());
    downloader.config = Arc::new(config);

    let result = downloader.run().await;

    // Exactly one fatal diagnostic; nothing was probed or written
    assert_eq!(
        result.diagnostics,
        vec![messages::invalid_download_dir(Some(std::path::Path::new("no_such_dir")))]
    );
    assert!(result.resolved_input_path.is_some());
    assert!(result.resolved_output_dir.is_none());
    assert!(!temp_dir.path().join("downloads").exists());
}

#[tokio::test]
async fn test_run_with_missing_input_is_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = Config {
        source: SourceConfig {
            root: temp_dir.path().to_path_buf(),
            input_path: None,
            ..Default::default()
        },
        ..Default::default()
    };
    let downloader = ImageDownloader::with_space_probe(
        config,
        Arc::new(|_: &std::path::Path| Ok(u64::MAX)),
    )
    .unwrap();

    let result = downloader.run().await;
    assert_eq!(result.diagnostics, vec![messages::invalid_input_path(None)]);
    assert!(result.resolved_input_path.is_none());
    assert!(result.resolved_output_dir.is_none());
}

#[tokio::test]
async fn test_run_records_syntax_diagnostics_and_flushes_log() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join("urls.txt"), "first_bad second@bad").unwrap();

    let downloader = test_downloader(temp_dir.path(), u64::MAX);
    let result = downloader.run().await;

    assert_eq!(
        result.diagnostics,
        vec![
            messages::invalid_locator("first_bad"),
            messages::invalid_locator("second@bad"),
        ]
    );
    // Default download dir was created even though nothing was fetched
    assert_eq!(
        result.resolved_output_dir.as_deref(),
        Some(temp_dir.path().join("downloads").as_path())
    );

    let log = std::fs::read_to_string(temp_dir.path().join("process.log")).unwrap();
    assert_eq!(
        log.lines().collect::<Vec<_>>(),
        result.diagnostics.iter().map(String::as_str).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_run_tokenizes_across_newlines() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join("urls.txt"), "bad_one\nbad_two bad_three\n").unwrap();

    let downloader = test_downloader(temp_dir.path(), u64::MAX);
    let result = downloader.run().await;
    assert_eq!(result.diagnostics.len(), 3);
}

#[test]
fn test_collect_valid_filters_and_dedups() {
    let sink = DiagnosticSink::new();
    let tokens = vec![
        "http://a.com".to_string(),
        "not-a-url".to_string(),
        "http://a.com".to_string(),
        "http://b.com".to_string(),
    ];
    let valid = collect_valid(tokens, &sink);
    assert_eq!(valid, vec!["http://a.com", "http://b.com"]);
    assert_eq!(sink.snapshot(), vec![messages::invalid_locator("not-a-url")]);
}

#[test]
fn test_tokenize_with_custom_separator() {
    let tokens = tokenize("http://a.com,http://b.com\nhttp://c.com", ",");
    assert_eq!(tokens, vec!["http://a.com", "http://b.com", "http://c.com"]);
}
