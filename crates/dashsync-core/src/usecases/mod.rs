//! Use cases (interactors) for dashsync
//!
//! This module contains the application use cases that orchestrate
//! domain entities and port interfaces. Use cases are thin coordinators
//! that delegate business rules to domain methods and I/O to ports.
//!
//! ## Use Cases
//!
//! - [`AssetInventory`] - Local asset directory scan into a manifest
//! - [`SyncExecutor`] - Sequential per-file upload through a device session
//! - [`Remediation`] - Actionable explanations of fatal and partial failures

pub mod explain_failure;
pub mod scan_assets;
pub mod sync_assets;

pub use explain_failure::Remediation;
pub use scan_assets::AssetInventory;
pub use sync_assets::SyncExecutor;
