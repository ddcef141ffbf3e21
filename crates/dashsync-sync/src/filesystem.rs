//! Local asset directory adapter (secondary/driven adapter)
//!
//! Implements [`IAssetStore`] using `tokio::fs` for async file operations.
//! The adapter is read-only: nothing in the pipeline writes locally.

use std::path::Path;

use anyhow::Context;
use dashsync_core::ports::{AssetEntry, IAssetStore};
use tracing::{debug, instrument};

/// Adapter that bridges the [`IAssetStore`] port to the real filesystem.
///
/// Zero-sized: every operation takes its context from the path arguments.
#[derive(Debug, Clone, Default)]
pub struct LocalAssetStore;

impl LocalAssetStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl IAssetStore for LocalAssetStore {
    async fn directory_exists(&self, dir: &Path) -> bool {
        tokio::fs::metadata(dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    #[instrument(skip(self), fields(dir = %dir.display()))]
    async fn list_files(&self, dir: &Path) -> anyhow::Result<Vec<AssetEntry>> {
        let mut reader = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("Failed to list {}", dir.display()))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let path = entry.path();
            // Follows symlinks, so a linked asset counts as a file
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(m) => m,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
                debug!(path = %path.display(), "Skipping non UTF-8 file name");
                continue;
            };
            entries.push(AssetEntry {
                file_name,
                path,
                size_bytes: metadata.len(),
            });
        }

        debug!(count = entries.len(), "directory listed");
        Ok(entries)
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn read(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        debug!(bytes = data.len(), "file read complete");
        Ok(data)
    }
}
