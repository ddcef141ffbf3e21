//! Asset inventory use case
//!
//! Turns the local asset directory into a [`Manifest`]. Only files with a
//! dashboard extension are kept; everything else is ignored.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::newtypes::{AssetKind, AssetName};
use crate::domain::{AssetRecord, Manifest, SyncError};
use crate::ports::IAssetStore;

/// Scans an asset directory into a manifest
pub struct AssetInventory {
    store: Arc<dyn IAssetStore>,
}

impl AssetInventory {
    pub fn new(store: Arc<dyn IAssetStore>) -> Self {
        Self { store }
    }

    /// Scans `dir` and returns one record per dashboard asset
    ///
    /// Record order follows the directory listing. Sizes are captured now
    /// and not re-checked later.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::DirectoryNotFound`] if `dir` is missing, or
    /// [`SyncError::Io`] if the listing fails.
    pub async fn scan(&self, dir: &Path) -> Result<Manifest, SyncError> {
        if !self.store.directory_exists(dir).await {
            return Err(SyncError::DirectoryNotFound(dir.to_path_buf()));
        }

        let entries = self
            .store
            .list_files(dir)
            .await
            .map_err(|e| SyncError::Io(std::io::Error::other(format!("{e:#}"))))?;

        let mut records = Vec::new();
        for entry in entries {
            if AssetKind::from_file_name(&entry.file_name).is_none() {
                debug!(file = %entry.file_name, "Skipping non-asset file");
                continue;
            }
            match AssetName::new(entry.file_name.as_str()) {
                Ok(name) => records.push(AssetRecord::new(name, entry.path, entry.size_bytes)),
                Err(e) => debug!(file = %entry.file_name, error = %e, "Skipping unusable file name"),
            }
        }

        let manifest = Manifest::new(records)?;
        info!(
            dir = %dir.display(),
            assets = manifest.len(),
            bytes = manifest.aggregate_size_bytes(),
            "Asset scan complete"
        );
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;
    use crate::ports::AssetEntry;

    /// In-memory asset store keyed by directory
    struct MemoryStore {
        dirs: HashMap<PathBuf, Vec<AssetEntry>>,
    }

    impl MemoryStore {
        fn with_dir(dir: &str, files: &[(&str, u64)]) -> Self {
            let entries = files
                .iter()
                .map(|(name, size)| AssetEntry {
                    file_name: name.to_string(),
                    path: PathBuf::from(dir).join(name),
                    size_bytes: *size,
                })
                .collect();
            let mut dirs = HashMap::new();
            dirs.insert(PathBuf::from(dir), entries);
            Self { dirs }
        }
    }

    #[async_trait::async_trait]
    impl IAssetStore for MemoryStore {
        async fn directory_exists(&self, dir: &Path) -> bool {
            self.dirs.contains_key(dir)
        }

        async fn list_files(&self, dir: &Path) -> anyhow::Result<Vec<AssetEntry>> {
            self.dirs
                .get(dir)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no such directory"))
        }

        async fn read(&self, _path: &Path) -> anyhow::Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    fn inventory(store: MemoryStore) -> AssetInventory {
        AssetInventory::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_scan_typical_dashboard() {
        let inv = inventory(MemoryStore::with_dir(
            "main/web",
            &[("index.html", 10000), ("app.js", 20000), ("style.css", 5000)],
        ));

        let manifest = inv.scan(Path::new("main/web")).await.unwrap();
        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest.aggregate_size_bytes(), 35000);

        let names: Vec<&str> = manifest.iter().map(|r| r.name().as_str()).collect();
        assert_eq!(names, vec!["index.html", "app.js", "style.css"]);
    }

    #[tokio::test]
    async fn test_scan_skips_other_files() {
        let inv = inventory(MemoryStore::with_dir(
            "web",
            &[
                ("index.html", 100),
                ("README.md", 50),
                ("favicon.ico", 10),
                ("APP.JS", 10),
                ("style.css", 20),
            ],
        ));

        let manifest = inv.scan(Path::new("web")).await.unwrap();
        let names: Vec<&str> = manifest.iter().map(|r| r.name().as_str()).collect();
        assert_eq!(names, vec!["index.html", "style.css"]);
        assert_eq!(manifest.aggregate_size_bytes(), 120);
    }

    #[tokio::test]
    async fn test_scan_empty_directory() {
        let inv = inventory(MemoryStore::with_dir("web", &[]));
        let manifest = inv.scan(Path::new("web")).await.unwrap();
        assert!(manifest.is_empty());
        assert_eq!(manifest.aggregate_size_bytes(), 0);
    }

    #[tokio::test]
    async fn test_scan_missing_directory() {
        let inv = inventory(MemoryStore::with_dir("web", &[]));
        let err = inv.scan(Path::new("missing")).await.unwrap_err();
        assert!(matches!(err, SyncError::DirectoryNotFound(p) if p == Path::new("missing")));
    }
}
