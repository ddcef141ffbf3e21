//! Shell completions generation command
//!
//! Usage: `dashsync completions bash > ~/.local/share/bash-completion/completions/dashsync`

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;

/// Arguments for the completions subcommand
#[derive(Debug, clap::Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Prints completions to stdout
    pub fn execute(&self) -> Result<ExitCode> {
        let mut cmd = crate::Cli::command();
        clap_complete::generate(self.shell, &mut cmd, "dashsync", &mut io::stdout());
        Ok(ExitCode::SUCCESS)
    }
}
