//! dashsync Sync - Deployment pipeline
//!
//! Provides:
//! - The shared scan → evaluate → prepare → execute → report pipeline
//! - HTTP and USB-serial deployment backends
//! - Local adapters for the asset directory and external tools
//!
//! ## Modules
//!
//! - [`engine`] - [`DeploymentPipeline`](engine::DeploymentPipeline) and its report
//! - [`backend`] - [`HttpBackend`](backend::HttpBackend) and [`UsbSerialBackend`](backend::UsbSerialBackend)
//! - [`filesystem`] - Local asset directory adapter on `tokio::fs`
//! - [`tool_runner`] - External process adapter on `tokio::process`

pub mod backend;
pub mod engine;
pub mod filesystem;
pub mod tool_runner;

pub use backend::{FlashPlan, FlashTool, HttpBackend, UsbSerialBackend};
pub use engine::{DeploymentPipeline, DeploymentReport};
pub use filesystem::LocalAssetStore;
pub use tool_runner::TokioToolRunner;
