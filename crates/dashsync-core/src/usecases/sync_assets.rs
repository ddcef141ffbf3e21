//! Sync executor use case
//!
//! Pushes every manifest record to a live device session, one request at a
//! time, in manifest order. A failing asset is recorded and the run moves on
//! to the next one. Nothing is retried and nothing is rolled back.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::domain::{summarize, AssetRecord, Manifest, SyncSummary, UploadOutcome};
use crate::ports::{IAssetStore, IDeviceSession};

/// Uploads manifest records through a device session
pub struct SyncExecutor {
    store: Arc<dyn IAssetStore>,
}

impl SyncExecutor {
    /// Creates a new SyncExecutor
    ///
    /// # Arguments
    ///
    /// * `store` - Local asset store used to read file content at upload time
    pub fn new(store: Arc<dyn IAssetStore>) -> Self {
        Self { store }
    }

    /// Uploads every record and summarizes the run
    ///
    /// The session is consumed: it belongs to this run only.
    pub async fn run(&self, mut session: Box<dyn IDeviceSession>, manifest: &Manifest) -> SyncSummary {
        let started_at = Utc::now();
        let clock = Instant::now();

        let outcomes = self.upload_all(session.as_mut(), manifest).await;

        let duration_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
        summarize(outcomes).with_timing(started_at, duration_ms)
    }

    /// Uploads every record and returns one outcome per record, in order
    pub async fn upload_all(
        &self,
        session: &mut dyn IDeviceSession,
        manifest: &Manifest,
    ) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::with_capacity(manifest.len());
        for record in manifest {
            outcomes.push(self.upload_one(session, record).await);
        }
        outcomes
    }

    #[instrument(skip_all, fields(asset = %record.name()))]
    async fn upload_one(&self, session: &mut dyn IDeviceSession, record: &AssetRecord) -> UploadOutcome {
        let name = record.name().clone();

        // Content is read at upload time, not scan time
        let content = match self.store.read(record.local_path()).await {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "Failed to read asset");
                return UploadOutcome::local_error(name, format!("read failed: {e:#}"));
            }
        };

        let remote_path = name.remote_path();
        match session.put(&remote_path, content).await {
            Ok(reply) => {
                let outcome = UploadOutcome::from_status(name, reply.status, Some(reply.body));
                if outcome.succeeded() {
                    info!(status = reply.status, "Asset uploaded");
                } else {
                    warn!(status = reply.status, "Device rejected asset");
                }
                outcome
            }
            Err(e) => {
                warn!(error = %e, "Upload failed");
                UploadOutcome::local_error(name, e.to_string())
            }
        }
    }
}
