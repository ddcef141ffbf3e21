//! Transport trust policy
//!
//! The device serves HTTPS with a self-signed certificate that no public
//! trust chain can validate. The policy decides how the client treats it:
//!
//! - [`TrustPolicy::AcceptAny`] disables certificate validation and trusts
//!   whatever answers at the operator-supplied address. This is the default,
//!   since the operator typically has no copy of the device certificate.
//!   It offers no protection against an impostor on the local network.
//! - [`TrustPolicy::Pinned`] trusts only the given certificate (the
//!   `server_cert.pem` generated for the firmware) and nothing else.
//!
//! Adapters receive the policy by injection; they never pick one themselves.

use std::fmt;
use std::path::{Path, PathBuf};

use super::errors::DomainError;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";

/// A PEM-encoded certificate used as the only trust anchor
#[derive(Clone, PartialEq, Eq)]
pub struct PinnedCertificate {
    pem: Vec<u8>,
    source: Option<PathBuf>,
}

impl PinnedCertificate {
    /// Wraps PEM bytes after a basic shape check
    pub fn from_pem(pem: impl Into<Vec<u8>>) -> Result<Self, DomainError> {
        let pem = pem.into();
        let text = String::from_utf8_lossy(&pem);
        if !text.contains(PEM_BEGIN) {
            return Err(DomainError::ValidationFailed(
                "pinned certificate is not PEM encoded".to_string(),
            ));
        }
        Ok(Self { pem, source: None })
    }

    /// Reads a PEM certificate from disk
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let pem = std::fs::read(path).map_err(|e| {
            anyhow::anyhow!("Failed to read certificate {}: {e}", path.display())
        })?;
        let mut cert = Self::from_pem(pem)?;
        cert.source = Some(path.to_path_buf());
        Ok(cert)
    }

    pub fn pem(&self) -> &[u8] {
        &self.pem
    }

    /// File the certificate was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl fmt::Debug for PinnedCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinnedCertificate")
            .field("source", &self.source)
            .field("pem_bytes", &self.pem.len())
            .finish()
    }
}

/// How the transport decides whether to trust the device
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrustPolicy {
    /// Trust only this certificate
    Pinned(PinnedCertificate),
    /// Skip certificate validation entirely
    #[default]
    AcceptAny,
}

impl TrustPolicy {
    /// Returns true if certificate validation is disabled
    pub fn is_insecure(&self) -> bool {
        matches!(self, TrustPolicy::AcceptAny)
    }

    /// Short label for logs and JSON output
    pub fn label(&self) -> &'static str {
        match self {
            TrustPolicy::Pinned(_) => "pinned",
            TrustPolicy::AcceptAny => "accept_any",
        }
    }
}
