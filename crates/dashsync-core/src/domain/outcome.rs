//! Per-file upload outcomes and the run summary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::{AssetName, RunId};

/// HTTP status the device returns for an accepted write
pub const SUCCESS_STATUS: u16 = 200;

/// What happened to a single asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeDetail {
    /// The device answered with this status
    HttpStatus {
        code: u16,
        /// Response body, kept for non-success codes
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    /// The attempt failed locally or in transport before a status arrived
    LocalError { description: String },
    /// The asset was deployed inside a flashed firmware image
    Flashed { port: String },
}

/// Result of one upload attempt. Exactly one exists per manifest record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutcome {
    asset_name: AssetName,
    succeeded: bool,
    detail: OutcomeDetail,
}

impl UploadOutcome {
    /// Outcome for a response from the device; only 200 counts as success
    pub fn from_status(asset_name: AssetName, code: u16, body: Option<String>) -> Self {
        let succeeded = code == SUCCESS_STATUS;
        Self {
            asset_name,
            succeeded,
            detail: OutcomeDetail::HttpStatus {
                code,
                body: if succeeded { None } else { body },
            },
        }
    }

    /// Outcome for a read, transport, or timeout failure
    pub fn local_error(asset_name: AssetName, description: impl Into<String>) -> Self {
        Self {
            asset_name,
            succeeded: false,
            detail: OutcomeDetail::LocalError {
                description: description.into(),
            },
        }
    }

    /// Outcome for an asset shipped in a successfully flashed image
    pub fn flashed(asset_name: AssetName, port: impl Into<String>) -> Self {
        Self {
            asset_name,
            succeeded: true,
            detail: OutcomeDetail::Flashed { port: port.into() },
        }
    }

    pub fn asset_name(&self) -> &AssetName {
        &self.asset_name
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn detail(&self) -> &OutcomeDetail {
        &self.detail
    }

    /// One-line description of the outcome for display
    pub fn describe(&self) -> String {
        match &self.detail {
            OutcomeDetail::HttpStatus { code, body: None } => format!("HTTP {code}"),
            OutcomeDetail::HttpStatus {
                code,
                body: Some(body),
            } => {
                let body = body.trim();
                if body.is_empty() {
                    format!("HTTP {code}")
                } else {
                    format!("HTTP {code}: {body}")
                }
            }
            OutcomeDetail::LocalError { description } => description.clone(),
            OutcomeDetail::Flashed { port } => format!("flashed via {port}"),
        }
    }
}

/// Terminal artifact of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub success_count: usize,
    pub failure_count: usize,
    pub outcomes: Vec<UploadOutcome>,
}

impl SyncSummary {
    /// True when no asset failed. Drives the CLI exit code.
    pub fn is_success(&self) -> bool {
        self.failure_count == 0
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Outcomes that failed, in run order
    pub fn failed(&self) -> impl Iterator<Item = &UploadOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    /// Attaches timing information to a summary
    pub fn with_timing(mut self, started_at: DateTime<Utc>, duration_ms: u64) -> Self {
        self.started_at = started_at;
        self.duration_ms = duration_ms;
        self
    }
}

/// Aggregates outcomes into a summary, partitioning by success
pub fn summarize(outcomes: Vec<UploadOutcome>) -> SyncSummary {
    let success_count = outcomes.iter().filter(|o| o.succeeded()).count();
    let failure_count = outcomes.len() - success_count;

    SyncSummary {
        run_id: RunId::new(),
        started_at: Utc::now(),
        duration_ms: 0,
        success_count,
        failure_count,
        outcomes,
    }
}
