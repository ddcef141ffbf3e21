//! State shared by every subcommand

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dashsync_core::config::Config;
use dashsync_core::domain::SyncError;

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Global flags plus the loaded configuration
#[derive(Debug)]
pub struct CliContext {
    pub format: OutputFormat,
    pub quiet: bool,
    pub config: Config,
    pub config_path: PathBuf,
}

impl CliContext {
    /// Loads the configuration named by `--config`, or the default file
    ///
    /// An explicit path must exist and parse; the default path falls back
    /// to built-in defaults when absent.
    pub fn load(format: OutputFormat, quiet: bool, explicit: Option<&Path>) -> Result<Self> {
        let (config, config_path) = match explicit {
            Some(path) => (
                Config::load(path).context("Cannot load the file given with --config")?,
                path.to_path_buf(),
            ),
            None => {
                let path = Config::default_path();
                (Config::load_or_default(&path), path)
            }
        };

        Ok(Self {
            format,
            quiet,
            config,
            config_path,
        })
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.format, self.quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Checks the config fields a command depends on
    ///
    /// `relevant` filters [`Config::validate`] results by field name, so a
    /// broken `flash` section does not block an upload and vice versa.
    pub fn validate_config(&self, relevant: impl Fn(&str) -> bool) -> Result<(), SyncError> {
        let errors: Vec<String> = self
            .config
            .validate()
            .into_iter()
            .filter(|e| relevant(&e.field))
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SyncError::Configuration(errors.join("; ")))
        }
    }

    /// The asset directory: `--dir` if given, otherwise `assets.directory`
    pub fn asset_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.assets.directory.clone())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "assets:\n  directory: site\n").unwrap();

        let ctx = CliContext::load(OutputFormat::Human, false, Some(&path)).unwrap();
        assert_eq!(ctx.config.assets.directory, PathBuf::from("site"));
        assert_eq!(ctx.config_path, path);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = TempDir::new().unwrap();
        let result = CliContext::load(
            OutputFormat::Human,
            false,
            Some(&dir.path().join("absent.yaml")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_config_filters_by_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "device:\n  upload_timeout_secs: 0\nflash:\n  target: esp8266\n",
        )
        .unwrap();
        let ctx = CliContext::load(OutputFormat::Human, false, Some(&path)).unwrap();

        match ctx.validate_config(|field| field.starts_with("device.")) {
            Err(SyncError::Configuration(reason)) => {
                assert!(reason.contains("device.upload_timeout_secs"));
                assert!(!reason.contains("flash.target"));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
        assert!(ctx.validate_config(|field| field == "logging.level").is_ok());
    }

    #[test]
    fn test_dir_flag_overrides_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "assets:\n  directory: site\n").unwrap();
        let ctx = CliContext::load(OutputFormat::Json, true, Some(&path)).unwrap();

        assert_eq!(ctx.asset_dir(None), PathBuf::from("site"));
        assert_eq!(
            ctx.asset_dir(Some(Path::new("other/web"))),
            PathBuf::from("other/web")
        );
        assert!(ctx.is_json());
    }
}
