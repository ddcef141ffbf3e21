//! Upload command - Deploy assets to a running device over HTTPS
//!
//! Provides the `dashsync upload` CLI command which:
//! 1. Resolves the device endpoint and trust policy from flags and config
//! 2. Runs the deployment pipeline with the HTTP backend
//! 3. Prints per-file results, or remediation for a fatal error

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use dashsync_core::domain::{Endpoint, SyncError};
use dashsync_core::ports::{DeploymentBackend, IAssetStore, IDeviceConnector};
use dashsync_device::{DeviceTimeouts, HttpDeviceConnector};
use dashsync_sync::{DeploymentPipeline, HttpBackend, LocalAssetStore};
use tracing::info;

use crate::context::CliContext;
use crate::output::{print_fatal, print_report};

/// Upload web assets with one `PUT` per file
#[derive(Debug, Args)]
pub struct UploadCommand {
    /// Device hostname, IP, or URL (defaults to device.host from the config)
    pub host: Option<String>,

    /// Asset directory (defaults to assets.directory from the config)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

impl UploadCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<ExitCode> {
        let formatter = ctx.formatter();
        let dir = ctx.asset_dir(self.dir.as_deref());
        let store: Arc<dyn IAssetStore> = Arc::new(LocalAssetStore::new());

        let backend = match self.backend(ctx, store.clone()) {
            Ok(backend) => backend,
            Err(e) => return Ok(print_fatal(formatter.as_ref(), ctx.format, &e)),
        };

        info!(dir = %dir.display(), endpoint = %backend.endpoint(), "Starting upload");
        formatter.info(&format!(
            "Uploading {} to {}",
            dir.display(),
            backend.destination()
        ));

        let pipeline = DeploymentPipeline::new(store);
        match pipeline.run(&backend, &dir).await {
            Ok(report) => {
                if report.capacity.warning {
                    formatter.warn(&format!(
                        "Assets use {:.1}% of the partition",
                        report.capacity.utilization_percent()
                    ));
                }
                Ok(print_report(formatter.as_ref(), ctx.format, &report))
            }
            Err(e) => Ok(print_fatal(formatter.as_ref(), ctx.format, &e)),
        }
    }

    fn backend(
        &self,
        ctx: &CliContext,
        store: Arc<dyn IAssetStore>,
    ) -> Result<HttpBackend, SyncError> {
        ctx.validate_config(|field| field.starts_with("device."))?;
        let config = &ctx.config;

        let host = self
            .host
            .as_deref()
            .or(config.device.host.as_deref())
            .ok_or_else(|| {
                SyncError::Configuration(
                    "no device host given; pass HOST or set device.host".to_string(),
                )
            })?;
        let endpoint = Endpoint::parse(host)?;

        let policy = config
            .trust_policy()
            .map_err(|e| SyncError::Configuration(format!("{e:#}")))?;
        if policy.is_insecure() && endpoint.is_https() {
            ctx.formatter()
                .warn("Certificate verification is disabled (device.trust = accept_any)");
        }

        let connector: Arc<dyn IDeviceConnector> = Arc::new(
            HttpDeviceConnector::new(policy).with_timeouts(DeviceTimeouts {
                status: config.status_timeout(),
                upload: config.upload_timeout(),
            }),
        );

        Ok(HttpBackend::new(connector, store, endpoint))
    }
}
