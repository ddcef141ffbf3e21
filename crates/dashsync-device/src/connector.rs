//! HttpDeviceConnector - IDeviceConnector implementation over HTTPS
//!
//! Builds a client with the injected trust policy, probes
//! `GET /api/status` exactly once, and hands out a session on HTTP 200.

use dashsync_core::domain::{Endpoint, TrustPolicy};
use dashsync_core::ports::{ConnectError, IDeviceConnector, IDeviceSession};
use tracing::{info, warn};

use crate::client::{DeviceClient, DeviceTimeouts};
use crate::session::HttpDeviceSession;
use crate::DeviceError;

/// Connects to the device over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpDeviceConnector {
    policy: TrustPolicy,
    timeouts: DeviceTimeouts,
}

impl HttpDeviceConnector {
    /// Creates a connector using `policy` for certificate handling
    pub fn new(policy: TrustPolicy) -> Self {
        Self {
            policy,
            timeouts: DeviceTimeouts::default(),
        }
    }

    /// Overrides the default probe and upload timeouts
    pub fn with_timeouts(mut self, timeouts: DeviceTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn policy(&self) -> &TrustPolicy {
        &self.policy
    }
}

#[async_trait::async_trait]
impl IDeviceConnector for HttpDeviceConnector {
    async fn connect(
        &self,
        endpoint: &Endpoint,
    ) -> Result<Box<dyn IDeviceSession>, ConnectError> {
        let client = DeviceClient::new(endpoint.clone(), &self.policy, self.timeouts)
            .map_err(|e| ConnectError::Configuration(e.to_string()))?;

        match client.get_status().await {
            Ok(status) => {
                info!(
                    endpoint = %endpoint,
                    trust = self.policy.label(),
                    details = ?status.details,
                    "Device is reachable"
                );
                Ok(Box::new(HttpDeviceSession::new(client)))
            }
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "Status probe failed");
                Err(match e {
                    DeviceError::UnexpectedStatus { status, .. } => {
                        ConnectError::UnhealthyStatus(status)
                    }
                    DeviceError::Timeout(after) => ConnectError::Timeout(after),
                    other => ConnectError::Unreachable(other.to_string()),
                })
            }
        }
    }
}
