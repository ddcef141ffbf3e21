//! Domain entities and business logic
//!
//! This module contains the core domain types for dashsync:
//! - Newtypes for validated names, endpoints, and identifiers
//! - Asset records and the scan manifest
//! - The partition capacity verdict
//! - Per-file upload outcomes and the run summary
//! - The transport trust policy
//! - Domain-specific error types

pub mod asset;
pub mod capacity;
pub mod errors;
pub mod newtypes;
pub mod outcome;
pub mod trust;

// Re-export commonly used types
pub use asset::{AssetRecord, Manifest};
pub use capacity::{evaluate, CapacityVerdict, PARTITION_BUDGET_BYTES, WARNING_THRESHOLD};
pub use errors::{DomainError, SyncError};
pub use newtypes::*;
pub use outcome::{summarize, OutcomeDetail, SyncSummary, UploadOutcome};
pub use trust::{PinnedCertificate, TrustPolicy};
