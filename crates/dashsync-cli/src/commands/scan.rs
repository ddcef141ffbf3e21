//! Scan command - Show what would be deployed
//!
//! Runs the scan and capacity stages only; no device is contacted.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use dashsync_sync::{DeploymentPipeline, LocalAssetStore};
use tracing::info;

use crate::context::CliContext;
use crate::output::{print_fatal, print_manifest};

/// List the deployable assets and their share of the partition
#[derive(Debug, Args)]
pub struct ScanCommand {
    /// Asset directory (defaults to assets.directory from the config)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

impl ScanCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<ExitCode> {
        let formatter = ctx.formatter();
        let dir = ctx.asset_dir(self.dir.as_deref());

        info!(dir = %dir.display(), "Scanning assets");

        let pipeline = DeploymentPipeline::new(Arc::new(LocalAssetStore::new()));
        let (manifest, capacity) = match pipeline.inspect(&dir).await {
            Ok(inspected) => inspected,
            Err(e) => return Ok(print_fatal(formatter.as_ref(), ctx.format, &e)),
        };

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "directory": dir.display().to_string(),
                "manifest": manifest,
                "capacity": capacity,
            }));
        } else {
            formatter.success(&format!("Scanned {}", dir.display()));
            print_manifest(formatter.as_ref(), &manifest, &capacity);
        }

        Ok(ExitCode::SUCCESS)
    }
}
