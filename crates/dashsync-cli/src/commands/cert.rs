//! Cert command - Generate the device's self-signed HTTPS certificate
//!
//! Writes `server_key.pem` and `server_cert.pem` for the firmware to embed.
//! The certificate can then be pinned with `device.trust: pinned`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use dashsync_core::provisioning::{self, CertificateSubject, CERT_FILE, KEY_FILE};
use tracing::info;

use crate::context::CliContext;

/// Generate a self-signed certificate (RSA-2048, valid for 10 years)
#[derive(Debug, Args)]
pub struct CertCommand {
    /// Two-letter country code [default: US]
    #[arg(long)]
    pub country: Option<String>,

    /// State or province [default: California]
    #[arg(long)]
    pub state: Option<String>,

    /// City or locality [default: San Francisco]
    #[arg(long)]
    pub city: Option<String>,

    /// Organization name [default: ESP32 IoT Device]
    #[arg(long)]
    pub org: Option<String>,

    /// Organizational unit [default: IoT]
    #[arg(long)]
    pub org_unit: Option<String>,

    /// Common name, the host the device answers to [default: esp32.local]
    #[arg(long)]
    pub common_name: Option<String>,

    /// Directory that receives the PEM files
    #[arg(long, default_value = "main/certs")]
    pub out_dir: PathBuf,

    /// Replace existing key and certificate files
    #[arg(long)]
    pub force: bool,
}

impl CertCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<ExitCode> {
        let formatter = ctx.formatter();

        let existing: Vec<PathBuf> = [KEY_FILE, CERT_FILE]
            .iter()
            .map(|name| self.out_dir.join(name))
            .filter(|path| path.exists())
            .collect();
        if !existing.is_empty() && !self.force {
            let listed: Vec<String> = existing.iter().map(|p| p.display().to_string()).collect();
            formatter.error(&format!("Refusing to overwrite {}", listed.join(", ")));
            formatter.info("Pass --force to replace them; the firmware must then be rebuilt.");
            return Ok(ExitCode::FAILURE);
        }

        let subject = self.subject();
        info!(common_name = %subject.common_name, out_dir = %self.out_dir.display(), "Generating certificate");
        formatter.info(&format!(
            "Generating certificate for {} (C={}, ST={}, L={}, O={}, OU={})",
            subject.common_name,
            subject.country,
            subject.state,
            subject.locality,
            subject.organization,
            subject.organizational_unit
        ));

        // RSA key generation is CPU bound
        let generated = tokio::task::spawn_blocking(move || provisioning::generate(&subject))
            .await
            .context("Certificate generation task failed")??;
        let paths = generated.write_to(&self.out_dir)?;

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "key": paths.key.display().to_string(),
                "cert": paths.cert.display().to_string(),
                "not_after": generated.not_after.to_string(),
            }));
        } else {
            formatter.success(&format!("Private key saved to {}", paths.key.display()));
            formatter.success(&format!("Certificate saved to {}", paths.cert.display()));
            formatter.info(&format!("Valid until {}", generated.not_after));
            formatter.info("");
            formatter.info("Rebuild and flash the firmware to embed the new certificate.");
            formatter.info(&format!(
                "To pin it: dashsync config set device.trust pinned && dashsync config set device.certificate {}",
                paths.cert.display()
            ));
        }

        Ok(ExitCode::SUCCESS)
    }

    fn subject(&self) -> CertificateSubject {
        let defaults = CertificateSubject::default();
        CertificateSubject {
            country: self.country.clone().unwrap_or(defaults.country),
            state: self.state.clone().unwrap_or(defaults.state),
            locality: self.city.clone().unwrap_or(defaults.locality),
            organization: self.org.clone().unwrap_or(defaults.organization),
            organizational_unit: self.org_unit.clone().unwrap_or(defaults.organizational_unit),
            common_name: self.common_name.clone().unwrap_or(defaults.common_name),
        }
    }
}
