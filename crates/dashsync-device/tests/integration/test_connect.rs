//! Integration tests for the liveness probe and connector

use std::time::Duration;

use dashsync_core::domain::{Endpoint, PinnedCertificate, TrustPolicy};
use dashsync_core::ports::{ConnectError, IDeviceConnector, IDeviceSession};
use dashsync_device::{DeviceError, HttpDeviceConnector};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_status_ok() {
    let (_server, client) = common::setup_device_mock(200).await;

    let status = client.get_status().await.expect("probe failed");
    assert_eq!(status.code, 200);
    assert_eq!(status.details.unwrap()["status"], "ok");
}

#[tokio::test]
async fn test_status_non_200_is_error() {
    let (_server, client) = common::setup_device_mock(503).await;

    let err = client.get_status().await.unwrap_err();
    assert!(matches!(err, DeviceError::UnexpectedStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_connect_returns_session_for_endpoint() {
    let (server, _client) = common::setup_device_mock(200).await;
    let endpoint = common::endpoint_of(&server);

    let session = common::connector()
        .connect(&endpoint)
        .await
        .expect("connect failed");
    assert_eq!(session.endpoint(), &endpoint);
}

#[tokio::test]
async fn test_connect_probes_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = common::connector()
        .connect(&common::endpoint_of(&server))
        .await;

    assert!(matches!(result, Err(ConnectError::UnhealthyStatus(500))));
    // `expect(1)` is verified when the server drops: no retry happened
}

#[tokio::test]
async fn test_connect_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let result = common::connector()
        .connect(&common::endpoint_of(&server))
        .await;

    match result {
        Err(ConnectError::Timeout(after)) => assert_eq!(after, Duration::from_millis(300)),
        Err(other) => panic!("expected timeout, got {other}"),
        Ok(_) => panic!("expected timeout, got a session"),
    }
}

#[tokio::test]
async fn test_connect_unreachable() {
    // Nothing listens on the discard port
    let endpoint = Endpoint::parse("http://127.0.0.1:9").unwrap();

    let result = common::connector().connect(&endpoint).await;
    assert!(matches!(
        result,
        Err(ConnectError::Unreachable(_)) | Err(ConnectError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_connect_rejects_bad_pinned_certificate_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pem = "-----BEGIN CERTIFICATE-----\n!!!!\n-----END CERTIFICATE-----\n";
    let policy = TrustPolicy::Pinned(PinnedCertificate::from_pem(pem).unwrap());
    let connector = HttpDeviceConnector::new(policy).with_timeouts(common::test_timeouts());

    let result = connector.connect(&common::endpoint_of(&server)).await;
    assert!(matches!(result, Err(ConnectError::Configuration(_))));
}
