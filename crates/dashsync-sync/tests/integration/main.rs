//! Integration tests for dashsync-sync
//!
//! Runs the full HTTP deployment pipeline against a wiremock device, with
//! assets read from a temporary directory.

mod test_http_pipeline;
