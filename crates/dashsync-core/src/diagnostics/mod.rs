//! Standalone device diagnostics
//!
//! These tools share no state with the deployment pipeline.

pub mod nvs;

pub use nvs::{audit, HexRow, MarkerHit, NvsReport, NvsStatistics, CREDENTIAL_MARKERS};
