//! HTTP deployment backend
//!
//! `prepare` is the liveness gate: the connector probes the device once and
//! only a healthy device yields a session. `execute` hands that session to
//! the [`SyncExecutor`].

use std::sync::Arc;

use dashsync_core::domain::{Endpoint, Manifest, SyncError, UploadOutcome};
use dashsync_core::ports::{
    BackendKind, ConnectError, DeploymentBackend, IAssetStore, IDeviceConnector, IDeviceSession,
};
use dashsync_core::usecases::SyncExecutor;
use tracing::info;

/// Deploys assets with one `PUT` per file
pub struct HttpBackend {
    connector: Arc<dyn IDeviceConnector>,
    endpoint: Endpoint,
    executor: SyncExecutor,
}

impl HttpBackend {
    pub fn new(
        connector: Arc<dyn IDeviceConnector>,
        store: Arc<dyn IAssetStore>,
        endpoint: Endpoint,
    ) -> Self {
        Self {
            connector,
            endpoint,
            executor: SyncExecutor::new(store),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl DeploymentBackend for HttpBackend {
    type Session = Box<dyn IDeviceSession>;

    fn kind(&self) -> BackendKind {
        BackendKind::Http
    }

    fn destination(&self) -> String {
        self.endpoint.to_string()
    }

    async fn prepare(&self) -> Result<Self::Session, SyncError> {
        self.connector
            .connect(&self.endpoint)
            .await
            .map_err(|e| match e {
                ConnectError::Configuration(reason) => SyncError::Configuration(reason),
                other => SyncError::LivenessCheckFailed {
                    endpoint: self.endpoint.to_string(),
                    reason: other.to_string(),
                },
            })
    }

    async fn execute(
        &self,
        mut session: Self::Session,
        manifest: &Manifest,
    ) -> Result<Vec<UploadOutcome>, SyncError> {
        info!(endpoint = %session.endpoint(), assets = manifest.len(), "Uploading assets");
        Ok(self.executor.upload_all(session.as_mut(), manifest).await)
    }
}
