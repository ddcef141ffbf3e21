//! Shared test helpers for device API integration tests
//!
//! Provides wiremock-based mock server setup for the device endpoints.
//! The mock device speaks plain HTTP; the client is built with the
//! default accept-any trust policy.

use std::time::Duration;

use dashsync_core::domain::{Endpoint, TrustPolicy};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dashsync_device::{DeviceClient, DeviceTimeouts, HttpDeviceConnector};

/// Short timeouts so timeout tests stay fast
pub fn test_timeouts() -> DeviceTimeouts {
    DeviceTimeouts {
        status: Duration::from_millis(300),
        upload: Duration::from_millis(300),
    }
}

pub fn endpoint_of(server: &MockServer) -> Endpoint {
    Endpoint::parse(&server.uri()).expect("mock server uri is a valid endpoint")
}

/// Starts a mock device whose status endpoint answers with `status`
/// and returns a (MockServer, DeviceClient) tuple.
pub async fn setup_device_mock(status: u16) -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "status": "ok",
            "uptime": 1234
        })))
        .mount(&server)
        .await;

    let client = DeviceClient::new(endpoint_of(&server), &TrustPolicy::AcceptAny, test_timeouts())
        .expect("build client");

    (server, client)
}

pub fn connector() -> HttpDeviceConnector {
    HttpDeviceConnector::new(TrustPolicy::AcceptAny).with_timeouts(test_timeouts())
}

/// Mounts a `PUT /api/webfiles/{name}` endpoint answering with `status`.
pub async fn mount_webfile(server: &MockServer, name: &str, status: u16, body: &str) {
    Mock::given(method("PUT"))
        .and(path(format!("/api/webfiles/{name}")))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}
