//! Config command - View and manage dashsync configuration
//!
//! Provides the `dashsync config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Sets individual configuration values via dot-notation keys
//! 3. Validates the configuration file and reports errors

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;
use dashsync_core::config::Config;
use tracing::info;

use crate::context::CliContext;
use crate::output::plural;

/// Keys accepted by `config set`, with a short description
const SUPPORTED_KEYS: [(&str, &str); 11] = [
    ("assets.directory", "Asset directory to deploy"),
    ("device.host", "Default device host or IP ('none' to clear)"),
    ("device.trust", "accept_any|pinned"),
    ("device.certificate", "PEM certificate to pin ('none' to clear)"),
    ("device.status_timeout_secs", "Liveness probe timeout"),
    ("device.upload_timeout_secs", "Per-file upload timeout"),
    ("flash.program", "Build script runner"),
    ("flash.args", "Space-separated arguments before -Target"),
    ("flash.target", "c6|s3"),
    ("flash.port", "Default serial port ('none' to clear)"),
    ("logging.level", "trace|debug|info|warn|error"),
];

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "device.host")
        key: String,
        /// New value
        value: String,
    },
    /// Validate configuration file
    Validate,
}

impl ConfigCommand {
    pub fn execute(&self, ctx: &CliContext) -> Result<ExitCode> {
        match self {
            ConfigCommand::Show => self.execute_show(ctx),
            ConfigCommand::Set { key, value } => self.execute_set(ctx, key, value),
            ConfigCommand::Validate => self.execute_validate(ctx),
        }
    }

    fn execute_show(&self, ctx: &CliContext) -> Result<ExitCode> {
        let formatter = ctx.formatter();

        info!(config_path = %ctx.config_path.display(), "Showing configuration");

        if ctx.is_json() {
            let json = serde_json::to_value(&ctx.config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&ctx.config)
                .context("Failed to serialize configuration to YAML")?;

            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(ExitCode::SUCCESS)
    }

    fn execute_set(&self, ctx: &CliContext, key: &str, value: &str) -> Result<ExitCode> {
        let formatter = ctx.formatter();
        let mut config = ctx.config.clone();

        info!(key = %key, value = %value, "Setting configuration value");

        if let Err(e) = apply_config_value(&mut config, key, value) {
            if ctx.is_json() {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "value": value,
                    "error": e.to_string(),
                }));
            } else {
                formatter.error(&format!("Failed to set '{}': {}", key, e));
                formatter.info("");
                formatter.info("Supported keys:");
                for (name, description) in SUPPORTED_KEYS {
                    formatter.info(&format!("  {:<28} - {}", name, description));
                }
            }
            return Ok(ExitCode::FAILURE);
        }

        // The certificate file may be created after the setting
        let errors: Vec<String> = config
            .validate()
            .iter()
            .filter(|e| e.field != "device.certificate")
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();

        if !errors.is_empty() {
            if ctx.is_json() {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "value": value,
                    "errors": errors,
                }));
            } else {
                formatter.error(&format!(
                    "Invalid value for '{}': {}",
                    key,
                    errors.join("; ")
                ));
            }
            return Ok(ExitCode::FAILURE);
        }

        if let Some(parent) = ctx.config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create configuration directory")?;
        }
        let yaml = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
        std::fs::write(&ctx.config_path, &yaml).context("Failed to write configuration file")?;

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "key": key,
                "value": value,
                "config_path": ctx.config_path.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Set {} = {}", key, value));
            formatter.info(&format!("Saved to {}", ctx.config_path.display()));
        }

        Ok(ExitCode::SUCCESS)
    }

    fn execute_validate(&self, ctx: &CliContext) -> Result<ExitCode> {
        let formatter = ctx.formatter();
        let config_path = &ctx.config_path;

        // Load explicitly: the context fell back to defaults on a bad file
        let config = match Config::load(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                if !config_path.exists() {
                    if ctx.is_json() {
                        formatter.print_json(&serde_json::json!({
                            "valid": true,
                            "config_path": config_path.display().to_string(),
                            "errors": [],
                            "defaults": true,
                        }));
                    } else {
                        formatter.info(&format!(
                            "Configuration file not found at {}",
                            config_path.display()
                        ));
                        formatter.success("Using the built-in defaults");
                    }
                    return Ok(ExitCode::SUCCESS);
                }

                if ctx.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "valid": false,
                        "config_path": config_path.display().to_string(),
                        "errors": [format!("{e:#}")],
                    }));
                } else {
                    formatter.error(&format!("{e:#}"));
                }
                return Ok(ExitCode::FAILURE);
            }
        };

        info!(config_path = %config_path.display(), "Validating configuration");

        let errors = config.validate();

        if ctx.is_json() {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                plural(errors.len())
            ));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        Ok(if errors.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

/// Apply a dot-notation key/value pair to a Config struct
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "assets.directory" => {
            config.assets.directory = PathBuf::from(value);
        }

        "device.host" => {
            config.device.host = optional(value).map(str::to_string);
        }
        "device.trust" => {
            config.device.trust = value.to_string();
        }
        "device.certificate" => {
            config.device.certificate = optional(value).map(PathBuf::from);
        }
        "device.status_timeout_secs" => {
            config.device.status_timeout_secs = value
                .parse::<u64>()
                .context("Expected a positive integer for device.status_timeout_secs")?;
        }
        "device.upload_timeout_secs" => {
            config.device.upload_timeout_secs = value
                .parse::<u64>()
                .context("Expected a positive integer for device.upload_timeout_secs")?;
        }

        "flash.program" => {
            config.flash.program = value.to_string();
        }
        "flash.args" => {
            config.flash.args = value.split_whitespace().map(str::to_string).collect();
        }
        "flash.target" => {
            config.flash.target = value.to_string();
        }
        "flash.port" => {
            config.flash.port = optional(value).map(str::to_string);
        }

        "logging.level" => {
            config.logging.level = value.to_string();
        }

        _ => {
            anyhow::bail!("Unknown configuration key: '{}'", key);
        }
    }

    Ok(())
}

/// `""` and `"none"` clear an optional setting
fn optional(value: &str) -> Option<&str> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value)
    }
}
