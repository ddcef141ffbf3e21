//! dashsync Device - HTTPS client for the dashboard device API
//!
//! Provides the adapters that implement the core's device ports:
//! - Trust policy application to the HTTP client (accept-any or pinned)
//! - The `GET /api/status` liveness probe
//! - `PUT /api/webfiles/{name}` asset writes
//!
//! ## Modules
//!
//! - [`client`] - Low-level HTTP client for the device endpoints
//! - [`connector`] - [`IDeviceConnector`](dashsync_core::ports::IDeviceConnector) implementation
//! - [`session`] - [`IDeviceSession`](dashsync_core::ports::IDeviceSession) implementation
//! - [`trust`] - Mapping of `TrustPolicy` onto `reqwest`

pub mod client;
pub mod connector;
pub mod session;
pub mod trust;

use std::time::Duration;

use thiserror::Error;

pub use client::{DeviceClient, DeviceStatus, DeviceTimeouts};
pub use connector::HttpDeviceConnector;
pub use session::HttpDeviceSession;

/// Errors that can occur when talking to the device
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The pinned certificate could not be parsed
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The request did not complete in time
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The device answered with a status other than the one expected
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
