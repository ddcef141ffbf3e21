//! Device API client
//!
//! Provides a typed HTTP client for the two endpoints the dashboard device
//! exposes for asset management. Each request carries its own timeout.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dashsync_core::domain::{Endpoint, TrustPolicy};
//! use dashsync_device::client::{DeviceClient, DeviceTimeouts};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let endpoint = Endpoint::parse("kc.local")?;
//! let client = DeviceClient::new(endpoint, &TrustPolicy::AcceptAny, DeviceTimeouts::default())?;
//! let status = client.get_status().await?;
//! println!("device answered {}", status.code);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use dashsync_core::domain::{Endpoint, TrustPolicy};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use tracing::{debug, instrument};

use crate::{trust, DeviceError};

/// Liveness probe path
pub const STATUS_PATH: &str = "/api/status";

/// Content type sent with every asset write, whatever the asset kind
pub const UPLOAD_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Per-request timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceTimeouts {
    /// Liveness probe timeout
    pub status: Duration,
    /// Timeout for each asset write
    pub upload: Duration,
}

impl Default for DeviceTimeouts {
    fn default() -> Self {
        Self {
            status: Duration::from_secs(5),
            upload: Duration::from_secs(10),
        }
    }
}

/// Answer to a successful liveness probe
#[derive(Debug, Clone)]
pub struct DeviceStatus {
    /// HTTP status code (always 200)
    pub code: u16,
    /// Body parsed as JSON, if it was JSON
    pub details: Option<serde_json::Value>,
}

/// HTTP client bound to one device endpoint
#[derive(Debug, Clone)]
pub struct DeviceClient {
    client: Client,
    endpoint: Endpoint,
    timeouts: DeviceTimeouts,
}

impl DeviceClient {
    /// Creates a client for `endpoint` trusting it according to `policy`
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidCertificate`] or
    /// [`DeviceError::ClientBuild`] before any network activity.
    pub fn new(
        endpoint: Endpoint,
        policy: &TrustPolicy,
        timeouts: DeviceTimeouts,
    ) -> Result<Self, DeviceError> {
        let builder = trust::apply(Client::builder(), policy)?;
        let client = builder
            .build()
            .map_err(|e| DeviceError::ClientBuild(e.to_string()))?;
        Ok(Self::with_client(client, endpoint, timeouts))
    }

    /// Wraps an already configured `reqwest::Client`
    pub fn with_client(client: Client, endpoint: Endpoint, timeouts: DeviceTimeouts) -> Self {
        Self {
            client,
            endpoint,
            timeouts,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn timeouts(&self) -> DeviceTimeouts {
        self.timeouts
    }

    /// Creates a request builder for `path` relative to the endpoint
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.endpoint.url_for(path))
    }

    /// Probes `GET /api/status` once
    ///
    /// # Errors
    ///
    /// Any status other than 200 is [`DeviceError::UnexpectedStatus`].
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn get_status(&self) -> Result<DeviceStatus, DeviceError> {
        let timeout = self.timeouts.status;
        let response = self
            .request(Method::GET, STATUS_PATH)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let code = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(e, timeout))?;

        if code != 200 {
            return Err(DeviceError::UnexpectedStatus { status: code, body });
        }

        debug!(code, "Status probe succeeded");
        Ok(DeviceStatus {
            code,
            details: serde_json::from_str(&body).ok(),
        })
    }

    /// Writes `content` to `remote_path` with `PUT`
    ///
    /// Returns the status code and body for every response, including
    /// error statuses. Only failures without a response are `Err`.
    #[instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn put_web_file(
        &self,
        remote_path: &str,
        content: Vec<u8>,
    ) -> Result<(u16, String), DeviceError> {
        let timeout = self.timeouts.upload;
        let response = self
            .request(Method::PUT, remote_path)
            .header(CONTENT_TYPE, UPLOAD_CONTENT_TYPE)
            .body(content)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let code = response.status().as_u16();
        // A body that cannot be read does not change the verdict
        let body = response.text().await.unwrap_or_default();
        debug!(code, "Write answered");
        Ok((code, body))
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> DeviceError {
    if error.is_timeout() {
        DeviceError::Timeout(timeout)
    } else {
        DeviceError::Network(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let t = DeviceTimeouts::default();
        assert_eq!(t.status, Duration::from_secs(5));
        assert_eq!(t.upload, Duration::from_secs(10));
    }

    #[test]
    fn test_request_url() {
        let client = DeviceClient::new(
            Endpoint::parse("192.168.0.215").unwrap(),
            &TrustPolicy::AcceptAny,
            DeviceTimeouts::default(),
        )
        .unwrap();

        let request = client
            .request(Method::PUT, "/api/webfiles/app.js")
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://192.168.0.215/api/webfiles/app.js"
        );
    }
}
