//! End-to-end tests for the HTTP deployment path

use std::sync::Arc;
use std::time::Duration;

use dashsync_core::domain::{Endpoint, SyncError, TrustPolicy};
use dashsync_device::{DeviceTimeouts, HttpDeviceConnector};
use dashsync_sync::{DeploymentPipeline, HttpBackend, LocalAssetStore};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn asset_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn backend(server: &MockServer) -> HttpBackend {
    let connector = HttpDeviceConnector::new(TrustPolicy::AcceptAny).with_timeouts(DeviceTimeouts {
        status: Duration::from_millis(500),
        upload: Duration::from_millis(500),
    });
    HttpBackend::new(
        Arc::new(connector),
        Arc::new(LocalAssetStore::new()),
        Endpoint::parse(&server.uri()).unwrap(),
    )
}

fn pipeline() -> DeploymentPipeline {
    DeploymentPipeline::new(Arc::new(LocalAssetStore::new()))
}

async fn mount_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_uploads_every_asset() {
    let server = MockServer::start().await;
    mount_status(&server, 200).await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/webfiles/(index\.html|app\.js|style\.css)$"))
        .and(header("Content-Type", "text/plain; charset=utf-8"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(3)
        .mount(&server)
        .await;

    let dir = asset_dir(&[
        ("index.html", "<html></html>"),
        ("app.js", "console.log(1);"),
        ("style.css", "body {}"),
        ("notes.txt", "not an asset"),
    ]);

    let report = pipeline().run(&backend(&server), dir.path()).await.unwrap();

    assert_eq!(report.summary.success_count, 3);
    assert_eq!(report.summary.failure_count, 0);
    assert!(report.summary.is_success());
}

#[tokio::test]
async fn test_failed_file_does_not_stop_the_run() {
    let server = MockServer::start().await;
    mount_status(&server, 200).await;
    Mock::given(method("PUT"))
        .and(path("/api/webfiles/app.js"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Failed to write file"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/webfiles/(index\.html|style\.css)$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let dir = asset_dir(&[
        ("index.html", "<html></html>"),
        ("app.js", "console.log(1);"),
        ("style.css", "body {}"),
    ]);

    let report = pipeline().run(&backend(&server), dir.path()).await.unwrap();

    assert_eq!(report.summary.success_count, 2);
    assert_eq!(report.summary.failure_count, 1);
    let failed: Vec<String> = report
        .summary
        .failed()
        .map(|o| o.describe())
        .collect();
    assert_eq!(failed, vec!["HTTP 500: Failed to write file"]);
}

#[tokio::test]
async fn test_liveness_failure_means_zero_writes() {
    let server = MockServer::start().await;
    mount_status(&server, 503).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = asset_dir(&[("index.html", "<html></html>")]);

    let err = pipeline()
        .run(&backend(&server), dir.path())
        .await
        .unwrap_err();

    match err {
        SyncError::LivenessCheckFailed { endpoint, reason } => {
            assert_eq!(endpoint, server.uri());
            assert!(reason.contains("503"));
        }
        other => panic!("expected liveness failure, got {other}"),
    }
}

#[tokio::test]
async fn test_missing_directory_means_no_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = pipeline()
        .run(&backend(&server), &dir.path().join("web"))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::DirectoryNotFound(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn test_url_delimiters_in_names_reach_their_own_resource() {
    let server = MockServer::start().await;
    mount_status(&server, 200).await;
    Mock::given(method("PUT"))
        .and(path("/api/webfiles/v1%232.js"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/webfiles/q%3Fa=1.css"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    // Anything truncated at '#' or '?' lands here and fails the upload
    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/webfiles/(v1|q)$"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let dir = asset_dir(&[("v1#2.js", "let v = 2;"), ("q?a=1.css", "p {}")]);

    let report = pipeline().run(&backend(&server), dir.path()).await.unwrap();

    assert_eq!(report.summary.success_count, 2);
    assert!(report.summary.is_success());
}
