//! Asset store port (driven/secondary port)
//!
//! This module defines the interface for reading the local asset directory.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because filesystem errors are adapter-specific.
//! - `list_files` returns only regular files directly inside the directory;
//!   filtering by extension is the inventory's job, not the adapter's.

use std::path::{Path, PathBuf};

/// A regular file found in the asset directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// File name (last path component)
    pub file_name: String,
    /// Full path to the file
    pub path: PathBuf,
    /// Size in bytes at listing time
    pub size_bytes: u64,
}

/// Port trait for local asset directory access
#[async_trait::async_trait]
pub trait IAssetStore: Send + Sync {
    /// Returns true if `dir` exists and is a directory
    async fn directory_exists(&self, dir: &Path) -> bool;

    /// Lists regular files directly inside `dir`, in directory order
    async fn list_files(&self, dir: &Path) -> anyhow::Result<Vec<AssetEntry>>;

    /// Reads a file fully into memory
    async fn read(&self, path: &Path) -> anyhow::Result<Vec<u8>>;
}
