//! Flash command - Rebuild the firmware with the assets and flash it
//!
//! The web assets are embedded in the firmware image, so this path runs the
//! project's build script twice (build, then flash) over USB serial.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use dashsync_core::domain::{FlashTarget, SyncError};
use dashsync_core::ports::{DeploymentBackend, IToolRunner};
use dashsync_sync::{
    DeploymentPipeline, FlashTool, LocalAssetStore, TokioToolRunner, UsbSerialBackend,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::context::CliContext;
use crate::output::{print_fatal, print_report, OutputFormatter};

/// Build and flash firmware carrying the assets
#[derive(Debug, Args)]
pub struct FlashCommand {
    /// Chip target: c6 or s3 (defaults to flash.target from the config)
    #[arg(long)]
    pub target: Option<String>,

    /// Serial port, e.g. COM3 or /dev/ttyUSB0 (defaults to flash.port)
    #[arg(long)]
    pub port: Option<String>,

    /// Asset directory (defaults to assets.directory from the config)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Flash a target without a dashboard without asking
    #[arg(short, long)]
    pub yes: bool,
}

impl FlashCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<ExitCode> {
        let formatter = ctx.formatter();
        let dir = ctx.asset_dir(self.dir.as_deref());

        let pipeline = DeploymentPipeline::new(Arc::new(LocalAssetStore::new()));

        let target = match self.preflight(ctx, &pipeline, &dir).await {
            Ok(target) => target,
            Err(e) => return Ok(print_fatal(formatter.as_ref(), ctx.format, &e)),
        };

        let mut confirmed = self.yes;
        if !target.has_dashboard() && !confirmed && can_prompt(ctx) {
            confirmed = confirm_without_dashboard(formatter.as_ref(), target).await?;
            if !confirmed {
                formatter.info("Flash cancelled");
                return Ok(ExitCode::SUCCESS);
            }
        }

        let backend = self.backend(ctx, Arc::new(TokioToolRunner::new()), target, confirmed);
        info!(dir = %dir.display(), destination = %backend.destination(), "Starting flash");
        formatter.info(&format!(
            "Flashing {} to {}",
            dir.display(),
            backend.destination()
        ));

        match pipeline.run(&backend, &dir).await {
            Ok(report) => {
                if report.capacity.warning {
                    formatter.warn(&format!(
                        "Assets use {:.1}% of the partition",
                        report.capacity.utilization_percent()
                    ));
                }
                let code = print_report(formatter.as_ref(), ctx.format, &report);
                if report.summary.is_success() {
                    formatter.info("On first boot the device copies the embedded assets into FATFS.");
                }
                Ok(code)
            }
            Err(e) => Ok(print_fatal(formatter.as_ref(), ctx.format, &e)),
        }
    }

    /// Everything that can fail before the operator is asked to confirm
    async fn preflight(
        &self,
        ctx: &CliContext,
        pipeline: &DeploymentPipeline,
        dir: &Path,
    ) -> Result<FlashTarget, SyncError> {
        // flash.target is irrelevant when --target is given
        ctx.validate_config(|field| {
            field == "flash.program" || (field == "flash.target" && self.target.is_none())
        })?;
        let target = self.target(ctx)?;
        pipeline.inspect(dir).await?;
        Ok(target)
    }

    fn target(&self, ctx: &CliContext) -> Result<FlashTarget, SyncError> {
        let raw = self.target.as_deref().unwrap_or(&ctx.config.flash.target);
        Ok(raw.parse::<FlashTarget>()?)
    }

    fn backend(
        &self,
        ctx: &CliContext,
        runner: Arc<dyn IToolRunner>,
        target: FlashTarget,
        confirmed: bool,
    ) -> UsbSerialBackend {
        let flash = &ctx.config.flash;
        // An empty port is rejected when the backend prepares
        let port = self
            .port
            .as_deref()
            .or(flash.port.as_deref())
            .unwrap_or_default();

        UsbSerialBackend::new(
            runner,
            FlashTool::new(flash.program.as_str(), flash.args.clone()),
            target,
            port,
        )
        .confirmed(confirmed)
    }
}

fn can_prompt(ctx: &CliContext) -> bool {
    !ctx.is_json() && std::io::stdin().is_terminal()
}

async fn confirm_without_dashboard(
    formatter: &dyn OutputFormatter,
    target: FlashTarget,
) -> Result<bool> {
    formatter.warn(&format!(
        "Target {target} is cloud-only and has no dashboard; web files are only used by s3"
    ));

    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Continue anyway? [y/N] ").await?;
    stdout.flush().await?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
