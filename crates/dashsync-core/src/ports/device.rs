//! Device transport port (driven/secondary port)
//!
//! This module defines how the core reaches the target device. Connecting
//! and probing liveness are one step: an [`IDeviceSession`] only exists once
//! the device has answered its status probe.
//!
//! ## Design Notes
//!
//! - Sessions are run-scoped. Connectors hand out a fresh session per call
//!   and never pool or cache them.
//! - `put` returns `Ok` for any HTTP status, including errors. Deciding what
//!   counts as success belongs to the executor. `Err` is reserved for
//!   failures where no status arrived.
//! - `put` takes `&mut self` so a session cannot be shared while in use.

use std::time::Duration;

use thiserror::Error;

use crate::domain::newtypes::Endpoint;

/// Reply to a write request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReply {
    /// HTTP status code
    pub status: u16,
    /// Response body as text (lossy UTF-8)
    pub body: String,
}

/// Failure to establish a session
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The status probe answered with something other than 200
    #[error("status probe returned HTTP {0}")]
    UnhealthyStatus(u16),

    /// The status probe did not complete within its timeout
    #[error("status probe timed out after {0:?}")]
    Timeout(Duration),

    /// The request never produced a response (DNS, refused, TLS)
    #[error("cannot reach device: {0}")]
    Unreachable(String),

    /// The client could not be configured (e.g. bad pinned certificate)
    #[error("transport configuration rejected: {0}")]
    Configuration(String),
}

/// Failure of a single write where no status arrived
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Network(String),
}

/// A live, liveness-checked connection to one device
#[async_trait::async_trait]
pub trait IDeviceSession: Send {
    /// The endpoint this session talks to
    fn endpoint(&self) -> &Endpoint;

    /// Replaces the resource at `remote_path` with `content`
    async fn put(
        &mut self,
        remote_path: &str,
        content: Vec<u8>,
    ) -> Result<DeviceReply, TransportError>;
}

/// Creates sessions after a successful liveness probe
#[async_trait::async_trait]
pub trait IDeviceConnector: Send + Sync {
    /// Probes `endpoint` once and returns a session if it is healthy
    ///
    /// No retries: a single failure is final.
    async fn connect(&self, endpoint: &Endpoint)
        -> Result<Box<dyn IDeviceSession>, ConnectError>;
}
