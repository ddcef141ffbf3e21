//! Asset records and the scan manifest

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::AssetName;

/// A single local asset discovered by a scan
///
/// Immutable after creation. The size is the one observed at scan time and
/// is used for reporting and capacity checks only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    name: AssetName,
    local_path: PathBuf,
    size_bytes: u64,
}

impl AssetRecord {
    pub fn new(name: AssetName, local_path: PathBuf, size_bytes: u64) -> Self {
        Self {
            name,
            local_path,
            size_bytes,
        }
    }

    pub fn name(&self) -> &AssetName {
        &self.name
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Ordered list of assets found by a scan
///
/// Order is discovery order and carries no meaning. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    records: Vec<AssetRecord>,
}

impl Manifest {
    /// Builds a manifest, rejecting duplicate asset names
    pub fn new(records: Vec<AssetRecord>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.name().as_str()) {
                return Err(DomainError::ValidationFailed(format!(
                    "duplicate asset name in manifest: {}",
                    record.name()
                )));
            }
        }
        Ok(Self { records })
    }

    /// An empty manifest
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssetRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all record sizes
    pub fn aggregate_size_bytes(&self) -> u64 {
        self.records.iter().map(AssetRecord::size_bytes).sum()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a AssetRecord;
    type IntoIter = std::slice::Iter<'a, AssetRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, size: u64) -> AssetRecord {
        AssetRecord::new(
            AssetName::new(name).unwrap(),
            PathBuf::from("main/web").join(name),
            size,
        )
    }

    #[test]
    fn test_aggregate_size() {
        let manifest = Manifest::new(vec![
            record("index.html", 10_000),
            record("app.js", 20_000),
            record("style.css", 5_000),
        ])
        .unwrap();

        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest.aggregate_size_bytes(), 35_000);
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::empty();
        assert!(manifest.is_empty());
        assert_eq!(manifest.aggregate_size_bytes(), 0);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = Manifest::new(vec![record("app.js", 1), record("app.js", 2)]);
        assert!(matches!(result, Err(DomainError::ValidationFailed(_))));
    }

    #[test]
    fn test_preserves_discovery_order() {
        let manifest =
            Manifest::new(vec![record("style.css", 1), record("app.js", 2)]).unwrap();
        let names: Vec<&str> = manifest.iter().map(|r| r.name().as_str()).collect();
        assert_eq!(names, vec!["style.css", "app.js"]);
    }
}
