//! Device provisioning helpers
//!
//! Produces the files the firmware embeds at build time. Like the
//! diagnostics, nothing here touches the deployment pipeline.

pub mod certificate;

pub use certificate::{
    generate, CertificateError, CertificatePaths, CertificateSubject, GeneratedCertificate,
    CERT_FILE, KEY_FILE,
};
