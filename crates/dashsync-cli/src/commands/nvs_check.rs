//! NVS check command - Audit a partition dump for plaintext credentials
//!
//! The dump is read from a file produced beforehand, e.g. with
//! `esptool.py read_flash 0x9000 0x6000 nvs_dump.bin`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use dashsync_core::diagnostics;
use tracing::info;

use crate::context::CliContext;

/// Check an NVS dump for unencrypted WiFi credentials
#[derive(Debug, Args)]
pub struct NvsCheckCommand {
    /// Raw NVS partition dump
    pub dump: PathBuf,
}

impl NvsCheckCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<ExitCode> {
        let formatter = ctx.formatter();

        let data = tokio::fs::read(&self.dump)
            .await
            .with_context(|| format!("Failed to read NVS dump {}", self.dump.display()))?;
        info!(dump = %self.dump.display(), bytes = data.len(), "Auditing NVS dump");

        let report = diagnostics::audit(&data);
        let encrypted = !report.plaintext_found();

        if ctx.is_json() {
            let mut json = serde_json::to_value(&report).context("Failed to serialize report")?;
            if let Some(obj) = json.as_object_mut() {
                obj.insert("encrypted".to_string(), serde_json::Value::Bool(encrypted));
            }
            formatter.print_json(&json);
        } else {
            formatter.info(&format!("Dump: {} ({} bytes)", self.dump.display(), data.len()));
            formatter.info("");
            for hit in &report.markers {
                if hit.found {
                    formatter.error(&format!("Found '{}' in plain text", hit.marker));
                } else {
                    formatter.success(&format!("'{}' not found", hit.marker));
                }
            }

            let stats = &report.statistics;
            formatter.info("");
            formatter.info(&format!(
                "Used bytes:  {} ({:.1}%)",
                stats.used_bytes, stats.used_percent
            ));
            formatter.info(&format!(
                "Blank bytes: {} ({:.1}%)",
                stats.blank_bytes(),
                stats.blank_percent()
            ));
            formatter.info("");
            for row in &report.preview {
                formatter.info(&row.to_string());
            }
            formatter.info("");

            if encrypted {
                formatter.success("No plaintext credentials found; NVS encryption appears to be working");
            } else {
                formatter.error("Plaintext credentials found; NVS encryption is NOT working");
                formatter.info("- Check that the nvs_keys partition exists and CONFIG_NVS_ENCRYPTION is enabled.");
                formatter.info("- Erase the NVS partition and provision the credentials again.");
            }
        }

        Ok(if encrypted {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}
