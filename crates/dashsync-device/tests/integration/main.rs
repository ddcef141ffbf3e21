//! Integration tests for dashsync-device
//!
//! Uses wiremock to simulate the device's HTTP API and verifies the
//! liveness probe, asset writes, and the connector/session contract.

mod common;

mod test_connect;
mod test_upload;
