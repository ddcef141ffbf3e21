//! Integration tests for asset writes through a device session

use std::time::Duration;

use dashsync_core::ports::{IDeviceConnector, IDeviceSession, TransportError};
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_put_sends_text_plain_body() {
    let (server, client) = common::setup_device_mock(200).await;
    let content = b"body { color: red; }\n".to_vec();

    Mock::given(method("PUT"))
        .and(path("/api/webfiles/style.css"))
        .and(header("Content-Type", "text/plain; charset=utf-8"))
        .and(body_bytes(content.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = client
        .put_web_file("/api/webfiles/style.css", content)
        .await
        .expect("upload failed");
    assert_eq!(status, 200);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_put_error_status_is_returned_not_raised() {
    let (server, client) = common::setup_device_mock(200).await;
    common::mount_webfile(&server, "app.js", 500, "Failed to write file").await;

    let (status, body) = client
        .put_web_file("/api/webfiles/app.js", b"x".to_vec())
        .await
        .expect("a status was received");
    assert_eq!(status, 500);
    assert_eq!(body, "Failed to write file");
}

#[tokio::test]
async fn test_session_put_reports_status() {
    let (server, _client) = common::setup_device_mock(200).await;
    common::mount_webfile(&server, "index.html", 200, "OK").await;
    common::mount_webfile(&server, "app.js", 404, "Not Found").await;

    let mut session = common::connector()
        .connect(&common::endpoint_of(&server))
        .await
        .expect("connect failed");

    let ok = session
        .put("/api/webfiles/index.html", b"<html></html>".to_vec())
        .await
        .unwrap();
    assert_eq!(ok.status, 200);

    let missing = session
        .put("/api/webfiles/app.js", b"x".to_vec())
        .await
        .unwrap();
    assert_eq!(missing.status, 404);
    assert_eq!(missing.body, "Not Found");
}

#[tokio::test]
async fn test_session_put_timeout() {
    let (server, _client) = common::setup_device_mock(200).await;
    Mock::given(method("PUT"))
        .and(path("/api/webfiles/app.js"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let mut session = common::connector()
        .connect(&common::endpoint_of(&server))
        .await
        .expect("connect failed");

    let err = session
        .put("/api/webfiles/app.js", b"x".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Timeout(_)));
}

#[tokio::test]
async fn test_same_content_twice_is_two_writes() {
    let (server, client) = common::setup_device_mock(200).await;
    Mock::given(method("PUT"))
        .and(path("/api/webfiles/index.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    for _ in 0..2 {
        let (status, _) = client
            .put_web_file("/api/webfiles/index.html", b"same".to_vec())
            .await
            .unwrap();
        assert_eq!(status, 200);
    }
}
