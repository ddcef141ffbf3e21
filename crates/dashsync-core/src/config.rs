//! Configuration module for dashsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.
//! Every section is optional in the file; missing keys take their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::newtypes::FlashTarget;
use crate::domain::{PinnedCertificate, TrustPolicy};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for dashsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub assets: AssetsConfig,
    pub device: DeviceConfig,
    pub flash: FlashConfig,
    pub logging: LoggingConfig,
}

/// Local asset directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory holding the dashboard's `.html`, `.js` and `.css` files.
    pub directory: PathBuf,
}

/// Running-device (HTTP) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Default hostname or IP used when `upload` is given none.
    pub host: Option<String>,
    /// Certificate trust mode: `accept_any` or `pinned`.
    pub trust: String,
    /// PEM certificate to pin. Required when `trust` is `pinned`.
    pub certificate: Option<PathBuf>,
    /// Timeout for the `GET /api/status` liveness probe, in seconds.
    pub status_timeout_secs: u64,
    /// Timeout for each `PUT /api/webfiles/{name}` request, in seconds.
    pub upload_timeout_secs: u64,
}

/// Firmware build/flash tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashConfig {
    /// Program that runs the build script.
    pub program: String,
    /// Arguments placed before `-Target`/`-Action`/`-Port`.
    pub args: Vec<String>,
    /// Default chip target: `c6` or `s3`.
    pub target: String,
    /// Default serial port, e.g. `COM3` or `/dev/ttyUSB0`.
    pub port: Option<String>,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/dashsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("dashsync")
            .join("config.yaml")
    }

    /// Builds the trust policy described by the `device` section.
    ///
    /// Reads the pinned certificate from disk when `trust` is `pinned`.
    pub fn trust_policy(&self) -> anyhow::Result<TrustPolicy> {
        match self.device.trust.as_str() {
            TRUST_ACCEPT_ANY => Ok(TrustPolicy::AcceptAny),
            TRUST_PINNED => {
                let path = self
                    .device
                    .certificate
                    .as_deref()
                    .context("device.certificate is required when device.trust is 'pinned'")?;
                Ok(TrustPolicy::Pinned(PinnedCertificate::from_file(path)?))
            }
            other => anyhow::bail!("unknown device.trust mode '{other}'"),
        }
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.device.status_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.device.upload_timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("main/web"),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: None,
            trust: TRUST_ACCEPT_ANY.to_string(),
            certificate: None,
            status_timeout_secs: 5,
            upload_timeout_secs: 10,
        }
    }
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            program: "powershell.exe".to_string(),
            args: vec![
                "-ExecutionPolicy".to_string(),
                "Bypass".to_string(),
                "-File".to_string(),
                "./build.ps1".to_string(),
            ],
            target: "s3".to_string(),
            port: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"device.status_timeout_secs"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const TRUST_ACCEPT_ANY: &str = "accept_any";
const TRUST_PINNED: &str = "pinned";

/// Valid values for `device.trust`.
const VALID_TRUST_MODES: &[&str] = &[TRUST_ACCEPT_ANY, TRUST_PINNED];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- device ---
        if self.device.status_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "device.status_timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.device.upload_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "device.upload_timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        if !VALID_TRUST_MODES.contains(&self.device.trust.as_str()) {
            errors.push(ValidationError {
                field: "device.trust".into(),
                message: format!(
                    "invalid trust mode '{}'; expected one of: {}",
                    self.device.trust,
                    VALID_TRUST_MODES.join(", ")
                ),
            });
        } else if self.device.trust == TRUST_PINNED {
            match &self.device.certificate {
                None => errors.push(ValidationError {
                    field: "device.certificate".into(),
                    message: "required when device.trust is 'pinned'".into(),
                }),
                Some(path) if !path.exists() => errors.push(ValidationError {
                    field: "device.certificate".into(),
                    message: format!("file does not exist: {}", path.display()),
                }),
                Some(_) => {}
            }
        }

        // --- flash ---
        if self.flash.program.trim().is_empty() {
            errors.push(ValidationError {
                field: "flash.program".into(),
                message: "must not be empty".into(),
            });
        }
        if self.flash.target.parse::<FlashTarget>().is_err() {
            errors.push(ValidationError {
                field: "flash.target".into(),
                message: format!(
                    "invalid target '{}'; expected one of: c6, s3",
                    self.flash.target
                ),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid log level '{}'; expected one of: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and lets callers override individual fields.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder pre-populated with default values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- assets ---

    pub fn assets_directory(mut self, dir: PathBuf) -> Self {
        self.config.assets.directory = dir;
        self
    }

    // --- device ---

    pub fn device_host(mut self, host: impl Into<String>) -> Self {
        self.config.device.host = Some(host.into());
        self
    }

    pub fn device_trust(mut self, trust: impl Into<String>) -> Self {
        self.config.device.trust = trust.into();
        self
    }

    pub fn device_certificate(mut self, path: PathBuf) -> Self {
        self.config.device.certificate = Some(path);
        self
    }

    pub fn device_status_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.device.status_timeout_secs = seconds;
        self
    }

    pub fn device_upload_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.device.upload_timeout_secs = seconds;
        self
    }

    // --- flash ---

    pub fn flash_program(mut self, program: impl Into<String>) -> Self {
        self.config.flash.program = program.into();
        self
    }

    pub fn flash_args(mut self, args: Vec<String>) -> Self {
        self.config.flash.args = args;
        self
    }

    pub fn flash_target(mut self, target: impl Into<String>) -> Self {
        self.config.flash.target = target.into();
        self
    }

    pub fn flash_port(mut self, port: impl Into<String>) -> Self {
        self.config.flash.port = Some(port.into());
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
