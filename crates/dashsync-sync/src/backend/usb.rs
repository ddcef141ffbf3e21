//! USB-serial deployment backend
//!
//! The assets are embedded in the firmware image, so deploying them means
//! rebuilding and flashing the whole firmware. Both steps are delegated to
//! the project's build script, invoked as:
//!
//! ```text
//! <program> <args...> -Target <t> -Action build
//! <program> <args...> -Target <t> -Action flash -Port <p>
//! ```

use std::sync::Arc;

use dashsync_core::domain::newtypes::FlashTarget;
use dashsync_core::domain::{Manifest, SyncError, UploadOutcome};
use dashsync_core::ports::{BackendKind, DeploymentBackend, IToolRunner, ToolInvocation};
use tracing::{info, warn};

/// The build script and the arguments that precede the per-step flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashTool {
    pub program: String,
    pub args: Vec<String>,
}

impl FlashTool {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn invocation(&self) -> ToolInvocation {
        ToolInvocation::new(self.program.as_str()).args(self.args.iter().cloned())
    }
}

/// The two commands a flash deployment will run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashPlan {
    pub build: ToolInvocation,
    pub flash: ToolInvocation,
}

/// Deploys assets by rebuilding and flashing the firmware
pub struct UsbSerialBackend {
    runner: Arc<dyn IToolRunner>,
    tool: FlashTool,
    target: FlashTarget,
    port: String,
    confirmed: bool,
}

impl UsbSerialBackend {
    pub fn new(
        runner: Arc<dyn IToolRunner>,
        tool: FlashTool,
        target: FlashTarget,
        port: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            tool,
            target,
            port: port.into(),
            confirmed: false,
        }
    }

    /// Records that the operator accepted flashing a target without a dashboard
    pub fn confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }

    pub fn target(&self) -> FlashTarget {
        self.target
    }

    /// Builds the command pair without running anything
    pub fn plan(&self) -> FlashPlan {
        let target = self.target.as_str();
        FlashPlan {
            build: self
                .tool
                .invocation()
                .args(["-Target", target, "-Action", "build"]),
            flash: self.tool.invocation().args([
                "-Target",
                target,
                "-Action",
                "flash",
                "-Port",
                self.port.as_str(),
            ]),
        }
    }

    async fn run_step(&self, step: &str, invocation: &ToolInvocation) -> Result<(), SyncError> {
        info!(step, command = %invocation, "Running firmware step");
        let output = self.runner.run(invocation).await.map_err(|e| {
            SyncError::Io(std::io::Error::other(format!("{step} step: {e:#}")))
        })?;

        if !output.success() {
            warn!(step, exit_code = ?output.exit_code, "Firmware step failed");
            return Err(SyncError::ToolFailed {
                step: step.to_string(),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }
        info!(step, "Firmware step succeeded");
        Ok(())
    }
}

#[async_trait::async_trait]
impl DeploymentBackend for UsbSerialBackend {
    type Session = FlashPlan;

    fn kind(&self) -> BackendKind {
        BackendKind::UsbSerial
    }

    fn destination(&self) -> String {
        format!("{} on {}", self.target, self.port)
    }

    async fn prepare(&self) -> Result<Self::Session, SyncError> {
        if self.port.trim().is_empty() {
            return Err(SyncError::InvalidFlashSetup(
                "a serial port is required".to_string(),
            ));
        }
        if self.tool.program.trim().is_empty() {
            return Err(SyncError::InvalidFlashSetup(
                "no build tool configured".to_string(),
            ));
        }
        if !self.target.has_dashboard() {
            if !self.confirmed {
                return Err(SyncError::TargetWithoutDashboard(self.target.to_string()));
            }
            warn!(target = %self.target, "Target has no dashboard; flashing anyway");
        }
        Ok(self.plan())
    }

    async fn execute(
        &self,
        plan: Self::Session,
        manifest: &Manifest,
    ) -> Result<Vec<UploadOutcome>, SyncError> {
        self.run_step("build", &plan.build).await?;
        self.run_step("flash", &plan.flash).await?;

        Ok(manifest
            .iter()
            .map(|record| UploadOutcome::flashed(record.name().clone(), self.port.as_str()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use dashsync_core::domain::newtypes::AssetName;
    use dashsync_core::domain::AssetRecord;
    use dashsync_core::ports::ToolOutput;

    use super::*;

    /// Runner that records invocations and replays scripted exit codes
    struct ScriptedRunner {
        exit_codes: Mutex<Vec<Option<i32>>>,
        calls: Mutex<Vec<ToolInvocation>>,
    }

    impl ScriptedRunner {
        fn new(exit_codes: Vec<Option<i32>>) -> Arc<Self> {
            Arc::new(Self {
                exit_codes: Mutex::new(exit_codes),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<ToolInvocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl IToolRunner for ScriptedRunner {
        async fn run(&self, invocation: &ToolInvocation) -> anyhow::Result<ToolOutput> {
            self.calls.lock().unwrap().push(invocation.clone());
            let exit_code = self.exit_codes.lock().unwrap().remove(0);
            Ok(ToolOutput {
                exit_code,
                stdout: "building...".to_string(),
                stderr: if exit_code == Some(0) {
                    String::new()
                } else {
                    "error: port busy".to_string()
                },
            })
        }
    }

    fn tool() -> FlashTool {
        FlashTool::new(
            "powershell.exe",
            vec![
                "-ExecutionPolicy".into(),
                "Bypass".into(),
                "-File".into(),
                "./build.ps1".into(),
            ],
        )
    }

    fn manifest() -> Manifest {
        Manifest::new(vec![
            AssetRecord::new(AssetName::new("index.html").unwrap(), PathBuf::from("web/index.html"), 10),
            AssetRecord::new(AssetName::new("app.js").unwrap(), PathBuf::from("web/app.js"), 20),
        ])
        .unwrap()
    }

    #[test]
    fn test_plan_arguments() {
        let backend = UsbSerialBackend::new(ScriptedRunner::new(vec![]), tool(), FlashTarget::S3, "COM3");
        let plan = backend.plan();

        assert_eq!(
            plan.build.to_string(),
            "powershell.exe -ExecutionPolicy Bypass -File ./build.ps1 -Target s3 -Action build"
        );
        assert_eq!(
            plan.flash.to_string(),
            "powershell.exe -ExecutionPolicy Bypass -File ./build.ps1 -Target s3 -Action flash -Port COM3"
        );
    }

    #[tokio::test]
    async fn test_prepare_requires_port() {
        let backend = UsbSerialBackend::new(ScriptedRunner::new(vec![]), tool(), FlashTarget::S3, " ");
        assert!(matches!(
            backend.prepare().await,
            Err(SyncError::InvalidFlashSetup(_))
        ));
    }

    #[tokio::test]
    async fn test_prepare_refuses_target_without_dashboard() {
        let backend = UsbSerialBackend::new(ScriptedRunner::new(vec![]), tool(), FlashTarget::C6, "COM3");
        assert!(matches!(
            backend.prepare().await,
            Err(SyncError::TargetWithoutDashboard(t)) if t == "c6"
        ));

        let confirmed =
            UsbSerialBackend::new(ScriptedRunner::new(vec![]), tool(), FlashTarget::C6, "COM3")
                .confirmed(true);
        assert!(confirmed.prepare().await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_builds_then_flashes() {
        let runner = ScriptedRunner::new(vec![Some(0), Some(0)]);
        let backend = UsbSerialBackend::new(runner.clone(), tool(), FlashTarget::S3, "/dev/ttyUSB0");

        let plan = backend.prepare().await.unwrap();
        let outcomes = backend.execute(plan, &manifest()).await.unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].args.ends_with(&["-Action".to_string(), "build".to_string()]));
        assert!(calls[1].args.ends_with(&["-Port".to_string(), "/dev/ttyUSB0".to_string()]));

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.succeeded()));
        assert_eq!(outcomes[0].describe(), "flashed via /dev/ttyUSB0");
    }

    #[tokio::test]
    async fn test_build_failure_skips_flash() {
        let runner = ScriptedRunner::new(vec![Some(1)]);
        let backend = UsbSerialBackend::new(runner.clone(), tool(), FlashTarget::S3, "COM3");

        let plan = backend.prepare().await.unwrap();
        let err = backend.execute(plan, &manifest()).await.unwrap_err();

        match err {
            SyncError::ToolFailed {
                step,
                exit_code,
                stderr,
                ..
            } => {
                assert_eq!(step, "build");
                assert_eq!(exit_code, Some(1));
                assert_eq!(stderr, "error: port busy");
            }
            other => panic!("expected ToolFailed, got {other}"),
        }
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_flash_failure() {
        let runner = ScriptedRunner::new(vec![Some(0), Some(2)]);
        let backend = UsbSerialBackend::new(runner.clone(), tool(), FlashTarget::S3, "COM3");

        let plan = backend.prepare().await.unwrap();
        let err = backend.execute(plan, &manifest()).await.unwrap_err();
        assert_eq!(err.to_string(), "flash step failed (exit code 2)");
    }
}
