//! Combinatorial expansion drivers.
//!
//! Turns per-course offerings into complete timetables by exhaustive
//! enumeration, using the overlay engine's slot-disjointness rule as the
//! only acceptance test. There is no objective function and no pruning
//! beyond the per-stage conflict check.
//!
//! # Variants
//!
//! - [`StagedExpansion`]: course by course onto a seed record. Each stage
//!   tries every offering of its course against the grid built so far;
//!   a conflicting offering is skipped, a fitting one moves to the next
//!   stage. Reaching the end emits a record.
//! - [`augment`]: the staged driver degenerated to one course, for
//!   extending an existing dataset.
//! - [`GlobalPairing`]: one offering per course for all courses at once,
//!   accepted iff the chosen offerings' cells are pairwise disjoint.
//!
//! All drivers are lazy iterators over an explicit worklist, so callers
//! can stop early (`take`, `find`) or fan out per base record. Branches
//! share no mutable state: every emitted grid is independent.

mod pairing;
mod staged;
mod stats;

pub use pairing::{GlobalPairing, Pairings};
pub use staged::{augment, Expand, ExpandAll, StagedExpansion};
pub use stats::GenerationStats;

use serde::{Deserialize, Serialize};

use crate::models::Course;
use crate::normalize::{Normalizer, Offering};

/// One course's contribution to an expansion: the label written into
/// grid cells and the deduplicated offerings to try.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Label stamped into cells (the course code).
    pub label: String,
    /// Semester used when the expansion starts from an empty seed.
    pub semester: u32,
    /// Degree used when the expansion starts from an empty seed.
    pub degree: String,
    /// Candidate offerings, in exploration order.
    pub offerings: Vec<Offering>,
}

impl Stage {
    /// Creates a stage with no offerings.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            semester: 0,
            degree: String::new(),
            offerings: Vec::new(),
        }
    }

    /// Builds a stage from a course, deduplicating its offerings.
    pub fn from_course(course: &Course, normalizer: &Normalizer<'_>) -> Self {
        Self {
            label: course.code.clone(),
            semester: course.semester,
            degree: course.degree.clone(),
            offerings: normalizer.dedupe(&course.slot_combinations),
        }
    }

    /// Sets semester and degree.
    pub fn with_cohort(mut self, semester: u32, degree: impl Into<String>) -> Self {
        self.semester = semester;
        self.degree = degree.into();
        self
    }

    /// Adds an offering.
    pub fn with_offering(mut self, offering: Offering) -> Self {
        self.offerings.push(offering);
        self
    }

    /// Whether the stage has nothing to try.
    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }
}

/// Appends `codes` to `base`, skipping codes already present.
pub(crate) fn union_slots(base: &[String], codes: &[String]) -> Vec<String> {
    let mut out = base.to_vec();
    for code in codes {
        if !out.contains(code) {
            out.push(code.clone());
        }
    }
    out
}
