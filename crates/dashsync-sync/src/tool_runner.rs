//! External tool adapter
//!
//! Implements [`IToolRunner`] with `tokio::process`. Output is captured in
//! full; the build script is expected to finish on its own.

use std::process::Stdio;

use anyhow::Context;
use dashsync_core::ports::{IToolRunner, ToolInvocation, ToolOutput};
use tracing::{debug, instrument};

/// Runs tools as child processes of the current process
#[derive(Debug, Clone, Default)]
pub struct TokioToolRunner;

impl TokioToolRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl IToolRunner for TokioToolRunner {
    #[instrument(skip(self), fields(program = %invocation.program))]
    async fn run(&self, invocation: &ToolInvocation) -> anyhow::Result<ToolOutput> {
        debug!(command = %invocation, "spawning");
        let output = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to start '{}'", invocation.program))?;

        let result = ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(exit_code = ?result.exit_code, "process finished");
        Ok(result)
    }
}
