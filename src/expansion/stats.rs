//! Generation run statistics.
//!
//! Counts what a run did: records accepted, branches rejected and why,
//! base records skipped. Mergeable across base records.
//!
//! | Counter | Definition |
//! |---------|-----------|
//! | accepted | Records emitted |
//! | conflicts | Offerings rejected because a target cell was filled |
//! | unknown_code_rejections | Offerings rejected for an unmapped code (Reject policy) |
//! | duplicates_removed | Global-pairing results dropped as equivalent |
//! | bases_processed | Base records expanded |
//! | malformed_bases | Base records skipped as unparseable |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counters for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Records emitted.
    pub accepted: usize,
    /// Offerings rejected by an occupied cell.
    pub conflicts: usize,
    /// Offerings rejected for an unmapped slot code.
    pub unknown_code_rejections: usize,
    /// Equivalent results dropped by global pairing.
    pub duplicates_removed: usize,
    /// Base records expanded.
    pub bases_processed: usize,
    /// Base records skipped because their grid could not be read.
    pub malformed_bases: usize,
    /// Conflicts per stage label.
    pub conflicts_by_stage: BTreeMap<String, usize>,
}

impl GenerationStats {
    /// Creates zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_conflict(&mut self, label: &str) {
        self.conflicts += 1;
        *self.conflicts_by_stage.entry(label.to_string()).or_insert(0) += 1;
    }

    /// Total offerings rejected for any reason.
    pub fn rejected(&self) -> usize {
        self.conflicts + self.unknown_code_rejections
    }

    /// Adds another run's counters into this one.
    pub fn merge(&mut self, other: &GenerationStats) {
        self.accepted += other.accepted;
        self.conflicts += other.conflicts;
        self.unknown_code_rejections += other.unknown_code_rejections;
        self.duplicates_removed += other.duplicates_removed;
        self.bases_processed += other.bases_processed;
        self.malformed_bases += other.malformed_bases;
        for (label, n) in &other.conflicts_by_stage {
            *self.conflicts_by_stage.entry(label.clone()).or_insert(0) += n;
        }
    }
}
