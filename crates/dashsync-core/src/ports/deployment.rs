//! Deployment backend port
//!
//! Every deployment follows the same pipeline shape: scan the asset
//! directory, evaluate capacity, prepare the transport, execute, and report.
//! Scanning, evaluation and reporting are shared. A backend supplies only
//! the two transport-specific steps.
//!
//! `prepare` is the gate: if it fails, `execute` is never called and no
//! asset leaves the machine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Manifest, SyncError, UploadOutcome};

/// Which transport a backend deploys through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Per-file PUT requests to the running device
    Http,
    /// Firmware rebuild and flash over a serial port
    UsbSerial,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Http => write!(f, "http"),
            BackendKind::UsbSerial => write!(f, "usb-serial"),
        }
    }
}

/// Transport-specific half of a deployment
#[async_trait::async_trait]
pub trait DeploymentBackend: Send + Sync {
    /// State produced by `prepare` and consumed by `execute`
    type Session: Send;

    fn kind(&self) -> BackendKind;

    /// Human-readable destination (endpoint URL or serial port)
    fn destination(&self) -> String;

    /// Establishes the transport; failure aborts the run before any write
    async fn prepare(&self) -> Result<Self::Session, SyncError>;

    /// Deploys every asset in `manifest`, one outcome per record
    ///
    /// Per-asset failures are outcomes, not errors. `Err` means the
    /// deployment as a whole could not proceed.
    async fn execute(
        &self,
        session: Self::Session,
        manifest: &Manifest,
    ) -> Result<Vec<UploadOutcome>, SyncError>;
}
