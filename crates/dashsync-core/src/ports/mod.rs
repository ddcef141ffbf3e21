//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IAssetStore`] - Local asset directory listing and file reads
//! - [`IDeviceConnector`] / [`IDeviceSession`] - Liveness-gated device transport
//! - [`IToolRunner`] - External build/flash process invocation
//! - [`DeploymentBackend`] - Transport-specific half of the deployment pipeline

pub mod asset_store;
pub mod deployment;
pub mod device;
pub mod tool_runner;

pub use asset_store::{AssetEntry, IAssetStore};
pub use deployment::{BackendKind, DeploymentBackend};
pub use device::{ConnectError, DeviceReply, IDeviceConnector, IDeviceSession, TransportError};
pub use tool_runner::{IToolRunner, ToolInvocation, ToolOutput};
