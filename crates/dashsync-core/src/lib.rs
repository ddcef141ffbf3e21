//! dashsync Core - Domain logic for dashboard asset synchronization
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `AssetRecord`, `Manifest`, `CapacityVerdict`, `UploadOutcome`, `SyncSummary`
//! - **Use cases** - `AssetInventory`, `SyncExecutor`, `Remediation`
//! - **Port definitions** - Traits for adapters: `IAssetStore`, `IDeviceConnector`,
//!   `IDeviceSession`, `IToolRunner`, `DeploymentBackend`
//! - **Diagnostics** - The standalone NVS partition audit
//! - **Provisioning** - Self-signed certificate generation for the device
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain entities through port interfaces.

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod ports;
pub mod provisioning;
pub mod usecases;
