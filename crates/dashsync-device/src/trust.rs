//! Trust policy application
//!
//! Translates the core's [`TrustPolicy`] into `reqwest` client settings.
//! This is the only place certificate validation is configured.

use dashsync_core::domain::TrustPolicy;
use reqwest::{Certificate, ClientBuilder};
use tracing::{debug, warn};

use crate::DeviceError;

/// Configures `builder` to trust the device according to `policy`
///
/// - `AcceptAny` turns certificate validation off.
/// - `Pinned` drops the built-in root store and trusts only the pinned
///   certificate.
pub fn apply(builder: ClientBuilder, policy: &TrustPolicy) -> Result<ClientBuilder, DeviceError> {
    match policy {
        TrustPolicy::AcceptAny => {
            warn!("Certificate validation disabled; any server at the endpoint will be trusted");
            Ok(builder.danger_accept_invalid_certs(true))
        }
        TrustPolicy::Pinned(cert) => {
            let certificate = Certificate::from_pem(cert.pem())
                .map_err(|e| DeviceError::InvalidCertificate(e.to_string()))?;
            debug!(source = ?cert.source(), "Pinning device certificate");
            Ok(builder
                .tls_built_in_root_certs(false)
                .add_root_certificate(certificate))
        }
    }
}
