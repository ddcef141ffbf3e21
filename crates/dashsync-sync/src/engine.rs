//! Deployment pipeline
//!
//! The [`DeploymentPipeline`] runs every deployment through the same stages,
//! whatever the backend:
//!
//! 1. **Scan**: build the manifest from the asset directory
//! 2. **Evaluate**: compare the total size with the partition budget (advisory)
//! 3. **Prepare**: backend-specific gate (liveness probe, target checks)
//! 4. **Execute**: backend-specific deployment, one outcome per asset
//! 5. **Report**: aggregate outcomes into a [`SyncSummary`]
//!
//! A failure in stages 1 or 3 aborts the run before anything is written to
//! the device.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use dashsync_core::domain::{
    evaluate, summarize, CapacityVerdict, Manifest, SyncError, SyncSummary,
};
use dashsync_core::ports::{BackendKind, DeploymentBackend, IAssetStore};
use dashsync_core::usecases::AssetInventory;

/// Everything a completed deployment produced
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    pub backend: BackendKind,
    pub destination: String,
    pub manifest: Manifest,
    pub capacity: CapacityVerdict,
    pub summary: SyncSummary,
}

/// Runs the shared stages around a [`DeploymentBackend`]
pub struct DeploymentPipeline {
    inventory: AssetInventory,
}

impl DeploymentPipeline {
    pub fn new(store: Arc<dyn IAssetStore>) -> Self {
        Self {
            inventory: AssetInventory::new(store),
        }
    }

    /// Scans `dir` and evaluates capacity without touching any device
    pub async fn inspect(&self, dir: &Path) -> Result<(Manifest, CapacityVerdict), SyncError> {
        let manifest = self.inventory.scan(dir).await?;
        let capacity = evaluate(&manifest);
        if capacity.warning {
            warn!(
                bytes = capacity.aggregate_size_bytes,
                percent = %format_args!("{:.1}", capacity.utilization_percent()),
                "Assets use most of the partition"
            );
        }
        Ok((manifest, capacity))
    }

    /// Runs a full deployment of `dir` through `backend`
    ///
    /// # Errors
    ///
    /// Returns the fatal error of the first stage that could not proceed.
    /// Per-asset failures are not errors; they are counted in the summary.
    #[tracing::instrument(skip(self, backend), fields(backend = %backend.kind()))]
    pub async fn run<B: DeploymentBackend>(
        &self,
        backend: &B,
        dir: &Path,
    ) -> Result<DeploymentReport, SyncError> {
        // Stages 1-2
        let (manifest, capacity) = self.inspect(dir).await?;

        let started_at = Utc::now();
        let clock = Instant::now();

        // Stage 3
        let session = backend.prepare().await?;
        info!(destination = %backend.destination(), "Backend ready");

        // Stage 4
        let outcomes = backend.execute(session, &manifest).await?;

        // Stage 5
        let duration_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
        let summary = summarize(outcomes).with_timing(started_at, duration_ms);
        info!(
            run_id = %summary.run_id,
            succeeded = summary.success_count,
            failed = summary.failure_count,
            duration_ms,
            "Deployment finished"
        );

        Ok(DeploymentReport {
            backend: backend.kind(),
            destination: backend.destination(),
            manifest,
            capacity,
            summary,
        })
    }
}
