//! Failure remediation
//!
//! Turns fatal errors and partially failed runs into an actionable message
//! with suggestions, instead of a raw error chain. The CLI prints these for
//! every run that does not fully succeed.

use serde::{Deserialize, Serialize};

use crate::domain::{SyncError, SyncSummary};

/// Human-readable explanation of a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remediation {
    /// What went wrong
    pub message: String,
    /// Actionable suggestions for resolving it
    pub suggestions: Vec<String>,
}

impl Remediation {
    /// Explains a fatal error
    pub fn for_error(error: &SyncError) -> Self {
        match error {
            SyncError::DirectoryNotFound(path) => Self {
                message: format!("Asset directory not found: {}", path.display()),
                suggestions: vec![
                    "Run the command from the project root, where main/web lives.".to_string(),
                    "Pass --dir to point at the asset directory.".to_string(),
                    "Set assets.directory in the config file.".to_string(),
                ],
            },

            SyncError::LivenessCheckFailed { endpoint, reason } => Self {
                message: format!("Cannot connect to {endpoint}: {reason}"),
                suggestions: vec![
                    "Make sure the device is powered on and connected to WiFi.".to_string(),
                    "Make sure the hostname resolves (try the IP address instead).".to_string(),
                    "Make sure the dashboard server is running.".to_string(),
                ],
            },

            SyncError::TargetWithoutDashboard(target) => Self {
                message: format!(
                    "Target {target} is cloud-only and has no dashboard; its web files are unused."
                ),
                suggestions: vec![
                    "Use --target s3 to deploy the dashboard.".to_string(),
                    "Pass --yes to flash anyway.".to_string(),
                ],
            },

            SyncError::InvalidFlashSetup(reason) => Self {
                message: format!("Cannot flash: {reason}"),
                suggestions: vec![
                    "Both --target and --port are required, e.g. --target s3 --port COM3."
                        .to_string(),
                ],
            },

            SyncError::ToolFailed {
                step,
                stdout,
                stderr,
                ..
            } => {
                let mut suggestions = Vec::new();
                for (label, stream) in [("stderr", stderr), ("stdout", stdout)] {
                    if let Some(line) = last_line(stream) {
                        suggestions.push(format!("Last {label} line: {line}"));
                    }
                }
                if step == "flash" {
                    suggestions.push(
                        "Check that the board is connected and the port is correct.".to_string(),
                    );
                } else {
                    suggestions.push("Fix the build errors and re-run.".to_string());
                }
                Self {
                    message: error.to_string(),
                    suggestions,
                }
            }

            SyncError::Configuration(reason) => Self {
                message: format!("Configuration error: {reason}"),
                suggestions: vec![
                    "Run 'dashsync config validate' to check the config file.".to_string(),
                ],
            },

            SyncError::Io(_) | SyncError::Domain(_) => Self {
                message: error.to_string(),
                suggestions: Vec::new(),
            },
        }
    }

    /// Explains a completed run with failures, or `None` if every asset succeeded
    pub fn for_summary(summary: &SyncSummary) -> Option<Self> {
        if summary.is_success() {
            return None;
        }

        let mut suggestions: Vec<String> = summary
            .failed()
            .map(|o| format!("{}: {}", o.asset_name(), o.describe()))
            .collect();
        suggestions.push("Re-run the upload; successful files are simply overwritten.".to_string());

        Some(Self {
            message: format!(
                "Upload completed with errors: {} succeeded, {} failed.",
                summary.success_count, summary.failure_count
            ),
            suggestions,
        })
    }
}

fn last_line(stream: &str) -> Option<&str> {
    stream.lines().rev().map(str::trim).find(|l| !l.is_empty())
}
