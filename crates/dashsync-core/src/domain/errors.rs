//! Domain error types
//!
//! This module defines the validation errors raised while constructing
//! domain values, and the fatal errors that abort a synchronization run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while constructing or validating domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Asset name is empty, contains a path separator, or has an unsupported extension
    #[error("Invalid asset name: {0}")]
    InvalidAssetName(String),

    /// Endpoint address could not be turned into a base URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Flash target is not one of the supported chips
    #[error("Invalid flash target: {0}")]
    InvalidTarget(String),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Errors that abort a synchronization run
///
/// Per-file upload failures are not represented here: they are recorded
/// as [`UploadOutcome`](super::outcome::UploadOutcome) values and the run
/// continues.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The local asset directory does not exist
    #[error("Asset directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The device did not answer the status probe with HTTP 200
    #[error("Liveness check failed for {endpoint}: {reason}")]
    LivenessCheckFailed {
        /// The endpoint that was probed
        endpoint: String,
        /// What went wrong (status code, timeout, transport error)
        reason: String,
    },

    /// The selected flash target has no dashboard and the operator did not confirm
    #[error("Target {0} has no dashboard; confirmation required")]
    TargetWithoutDashboard(String),

    /// Flash target or port is missing or invalid
    #[error("Invalid flash setup: {0}")]
    InvalidFlashSetup(String),

    /// The external build/flash tool exited unsuccessfully
    #[error("{step} step failed ({})", describe_exit(.exit_code))]
    ToolFailed {
        /// Which step failed (`build` or `flash`)
        step: String,
        /// Process exit code, if the process exited normally
        exit_code: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// The trust policy or client configuration was rejected before connecting
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Local I/O failure outside of per-file reads
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A domain-level validation error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl SyncError {
    /// Returns true if the error happened before any network activity
    pub fn is_pre_network(&self) -> bool {
        matches!(
            self,
            SyncError::DirectoryNotFound(_)
                | SyncError::Configuration(_)
                | SyncError::InvalidFlashSetup(_)
                | SyncError::TargetWithoutDashboard(_)
                | SyncError::Domain(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidAssetName("../etc/passwd".to_string());
        assert_eq!(err.to_string(), "Invalid asset name: ../etc/passwd");

        let err = SyncError::DirectoryNotFound(PathBuf::from("main/web"));
        assert_eq!(err.to_string(), "Asset directory not found: main/web");

        let err = SyncError::LivenessCheckFailed {
            endpoint: "https://kc.local".to_string(),
            reason: "HTTP 503".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Liveness check failed for https://kc.local: HTTP 503"
        );
    }

    #[test]
    fn test_tool_failed_display() {
        let err = SyncError::ToolFailed {
            step: "flash".to_string(),
            exit_code: Some(2),
            stdout: String::new(),
            stderr: "port busy".to_string(),
        };
        assert_eq!(err.to_string(), "flash step failed (exit code 2)");

        let err = SyncError::ToolFailed {
            step: "build".to_string(),
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "build step failed (terminated by signal)");
    }

    #[test]
    fn test_domain_error_converts() {
        let err: SyncError = DomainError::InvalidTarget("esp8266".to_string()).into();
        assert!(matches!(err, SyncError::Domain(_)));
        assert!(err.is_pre_network());
    }

    #[test]
    fn test_liveness_is_not_pre_network() {
        let err = SyncError::LivenessCheckFailed {
            endpoint: "https://kc.local".to_string(),
            reason: "timeout".to_string(),
        };
        assert!(!err.is_pre_network());
    }

    #[test]
    fn test_error_equality() {
        let err1 = DomainError::InvalidEndpoint("".to_string());
        let err2 = DomainError::InvalidEndpoint("".to_string());
        let err3 = DomainError::InvalidEndpoint("x".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
