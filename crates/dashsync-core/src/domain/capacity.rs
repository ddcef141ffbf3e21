//! Partition capacity check
//!
//! The device exposes no endpoint reporting its asset partition size, so the
//! budget is a compile-time constant. If the firmware's partition table
//! changes, this constant goes stale silently.
// TODO: read the budget from the device once /api/status reports partition capacity.

use serde::{Deserialize, Serialize};

use super::asset::Manifest;

/// Declared size of the device's asset partition (1 MiB)
pub const PARTITION_BUDGET_BYTES: u64 = 1_048_576;

/// Utilization ratio above which the verdict carries a warning
pub const WARNING_THRESHOLD: f64 = 0.90;

/// Advisory result of comparing a manifest against the partition budget
///
/// Never blocks a sync; the caller decides how to display it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityVerdict {
    pub aggregate_size_bytes: u64,
    pub partition_budget_bytes: u64,
    pub utilization_ratio: f64,
    pub warning: bool,
}

impl CapacityVerdict {
    /// Utilization as a percentage, for display
    pub fn utilization_percent(&self) -> f64 {
        self.utilization_ratio * 100.0
    }

    /// Bytes left before the partition is full (zero when over budget)
    pub fn remaining_bytes(&self) -> u64 {
        self.partition_budget_bytes
            .saturating_sub(self.aggregate_size_bytes)
    }
}

/// Evaluates a manifest against [`PARTITION_BUDGET_BYTES`]
pub fn evaluate(manifest: &Manifest) -> CapacityVerdict {
    verdict_for(manifest.aggregate_size_bytes())
}

fn verdict_for(aggregate_size_bytes: u64) -> CapacityVerdict {
    let budget = PARTITION_BUDGET_BYTES;
    let utilization_ratio = aggregate_size_bytes as f64 / budget as f64;

    CapacityVerdict {
        aggregate_size_bytes,
        partition_budget_bytes: budget,
        utilization_ratio,
        warning: aggregate_size_bytes as f64 > budget as f64 * WARNING_THRESHOLD,
    }
}
