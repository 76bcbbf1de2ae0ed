// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the network module using wiremock.
//!
//! Tests the Downloader with HTTP mocking, covering:
//! - File downloads and the `.part` staging file
//! - Error handling (HTTP errors, missing params)
//! - Cancellation
//! - The user agent

use std::time::Duration;

use moqt_build::error::{BuildError, NetworkError};
use moqt_build::net::Downloader;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn network_error(err: &BuildError) -> &NetworkError {
    match err {
        BuildError::Network(e) => e.as_ref(),
        other => panic!("expected network error, got {other:?}"),
    }
}

// =============================================================================
// download (file) tests
// =============================================================================

#[tokio::test]
async fn test_download_file_success() {
    let mock_server = MockServer::start().await;
    let binary = vec![0x7f, b'E', b'L', b'F', 0, 1, 2, 3];
    Mock::given(method("GET"))
        .and(path("/v1.26.0/bazelisk-linux-amd64"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(binary.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp = temp_dir();
    let output = temp.path().join("install").join("bazelisk").join("bazelisk");
    Downloader::new()
        .url(format!("{}/v1.26.0/bazelisk-linux-amd64", mock_server.uri()))
        .file(&output)
        .silent()
        .download()
        .await
        .unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), binary);
    assert!(!output.with_file_name("bazelisk.part").exists());
}

#[tokio::test]
async fn test_download_file_404_leaves_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let temp = temp_dir();
    let output = temp.path().join("bazelisk");
    let err = Downloader::new()
        .url(format!("{}/nope", mock_server.uri()))
        .file(&output)
        .silent()
        .download()
        .await
        .unwrap_err();

    assert!(matches!(
        network_error(&err),
        NetworkError::HttpError { status: 404, .. }
    ));
    assert!(std::fs::read_dir(temp.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_download_server_error_names_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let temp = temp_dir();
    let url = format!("{}/v1.26.0/bazelisk-linux-amd64", mock_server.uri());
    let err = Downloader::new()
        .url(&url)
        .file(temp.path().join("bazelisk"))
        .silent()
        .download()
        .await
        .unwrap_err();

    match network_error(&err) {
        NetworkError::HttpError { status, url: got_url } => {
            assert_eq!(*status, 500);
            assert_eq!(got_url, &url);
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_download_replaces_existing_file() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("new"))
        .mount(&mock_server)
        .await;

    let temp = temp_dir();
    let output = temp.path().join("bazelisk");
    std::fs::write(&output, "old").unwrap();

    Downloader::new()
        .url(mock_server.uri())
        .file(&output)
        .silent()
        .download()
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "new");
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_download_cancelled_mid_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let temp = temp_dir();
    let output = temp.path().join("bazelisk");
    let token = CancellationToken::new();
    let downloader = Downloader::new()
        .url(mock_server.uri())
        .file(&output)
        .silent()
        .cancel_token(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });
    let err = downloader.download().await.unwrap_err();
    canceller.await.unwrap();

    assert!(matches!(network_error(&err), NetworkError::Interrupted));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_download_cancelled_before_start() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let temp = temp_dir();
    let output = temp.path().join("bazelisk");
    let token = CancellationToken::new();
    token.cancel();
    let err = Downloader::new()
        .url(mock_server.uri())
        .file(&output)
        .silent()
        .cancel_token(token)
        .download()
        .await
        .unwrap_err();

    assert!(matches!(network_error(&err), NetworkError::Interrupted));
    assert!(!output.exists());
}

// =============================================================================
// Headers
// =============================================================================

#[tokio::test]
async fn test_user_agent_set() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header_regex("user-agent", r"^moqt-build/\d+\.\d+\.\d+"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp = temp_dir();
    Downloader::new()
        .url(mock_server.uri())
        .file(temp.path().join("bazelisk"))
        .silent()
        .download()
        .await
        .unwrap();
}

// =============================================================================
// Missing parameters
// =============================================================================

#[tokio::test]
async fn test_download_no_url_errors() {
    let temp = temp_dir();
    let err = Downloader::new()
        .file(temp.path().join("out"))
        .silent()
        .download()
        .await
        .unwrap_err();
    assert!(matches!(network_error(&err), NetworkError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_download_no_file_error() {
    let err = Downloader::new()
        .url("http://127.0.0.1:9/unused")
        .silent()
        .download()
        .await
        .unwrap_err();
    insta::assert_snapshot!(
        err,
        @"network error: download failed: http://127.0.0.1:9/unused - no output file specified"
    );
}
