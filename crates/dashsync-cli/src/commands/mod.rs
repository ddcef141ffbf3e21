//! CLI subcommands

pub mod cert;
pub mod completions;
pub mod config;
pub mod flash;
pub mod nvs_check;
pub mod scan;
pub mod upload;
