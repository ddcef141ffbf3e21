//! dashsync CLI - Deploy dashboard assets to an embedded device
//!
//! Provides commands for:
//! - Uploading web assets to a running device over HTTPS
//! - Rebuilding and flashing the firmware over USB serial
//! - Inspecting the asset directory against the partition budget
//! - Auditing an NVS partition dump for plaintext credentials
//! - Generating the device's self-signed certificate

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;

use commands::{
    cert::CertCommand, completions::CompletionsCommand, config::ConfigCommand, flash::FlashCommand,
    nvs_check::NvsCheckCommand, scan::ScanCommand, upload::UploadCommand,
};
use context::CliContext;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "dashsync",
    version,
    about = "Deploy dashboard web assets to an embedded device"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload web assets to a running device over HTTPS
    Upload(UploadCommand),
    /// Rebuild the firmware with the assets and flash it over USB serial
    Flash(FlashCommand),
    /// List the assets that would be deployed and check their size
    Scan(ScanCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Check an NVS partition dump for plaintext WiFi credentials
    NvsCheck(NvsCheckCommand),
    /// Generate the device's self-signed HTTPS certificate
    Cert(CertCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match run(cli, format).await {
        Ok(code) => code,
        Err(e) => {
            output::get_formatter(format, false).error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, format: OutputFormat) -> Result<ExitCode> {
    // Completions need neither config nor logging
    if let Commands::Completions(cmd) = &cli.command {
        return cmd.execute();
    }

    let ctx = CliContext::load(format, cli.quiet, cli.config.as_deref())?;
    init_tracing(cli.verbose, &ctx.config.logging.level);

    match cli.command {
        Commands::Upload(cmd) => cmd.execute(&ctx).await,
        Commands::Flash(cmd) => cmd.execute(&ctx).await,
        Commands::Scan(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx),
        Commands::NvsCheck(cmd) => cmd.execute(&ctx).await,
        Commands::Cert(cmd) => cmd.execute(&ctx).await,
        Commands::Completions(cmd) => cmd.execute(),
    }
}

/// `RUST_LOG` wins, then `-v`, then `logging.level` from the config
fn init_tracing(verbose: u8, configured: &str) {
    let filter = match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
