//! Dataset maintenance over generated records.
//!
//! Read-side utilities for a store of [`TimetableRecord`]s:
//!
//! - [`scan_records`]: how many records carry a set of courses, split by
//!   whether they also carry a target course.
//! - [`retain_complete`]: drop records missing required courses (and,
//!   optionally, any lab cell).
//! - [`sample_suitable`]: draw a uniform random subset of records matching
//!   a predicate, for building small test datasets.
//!
//! Course presence is exact whole-cell matching, case-insensitive, so a
//! theory code never matches its lab variant.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::TimetableRecord;

/// Counts produced by [`scan_records`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Records inspected.
    pub processed: usize,
    /// Records carrying every required course.
    pub eligible: usize,
    /// Eligible records that also carry the target.
    pub with_target: usize,
    /// Eligible records without the target.
    pub without_target: usize,
}

impl ScanReport {
    /// Adds one record to the counts.
    pub fn observe<S: AsRef<str>>(&mut self, record: &TimetableRecord, required: &[S], target: &str) {
        self.processed += 1;
        if !record.has_all_courses(required) {
            return;
        }
        self.eligible += 1;
        if record.has_course(target) {
            self.with_target += 1;
        } else {
            self.without_target += 1;
        }
    }
}

/// Scans `records` for `required` courses and `target`.
pub fn scan_records<'r, I, S>(records: I, required: &[S], target: &str) -> ScanReport
where
    I: IntoIterator<Item = &'r TimetableRecord>,
    S: AsRef<str>,
{
    let mut report = ScanReport::default();
    for record in records {
        report.observe(record, required, target);
    }
    info!(
        processed = report.processed,
        eligible = report.eligible,
        with_target = report.with_target,
        without_target = report.without_target,
        course = target,
        "scan finished"
    );
    report
}

/// Keeps only records carrying every `required` course and, when
/// `lab_suffix` is given, at least one cell labelled with a lab course.
///
/// Returns the number of records removed.
pub fn retain_complete<S: AsRef<str>>(
    records: &mut Vec<TimetableRecord>,
    required: &[S],
    lab_suffix: Option<&str>,
) -> usize {
    let before = records.len();
    records.retain(|r| {
        r.has_all_courses(required)
            && lab_suffix.map_or(true, |suffix| r.grid.has_label_with_suffix(suffix))
    });
    let removed = before - records.len();
    info!(removed, kept = records.len(), "incomplete records removed");
    removed
}

/// Draws up to `n` distinct records satisfying `predicate`, uniformly at
/// random. Returns every suitable record when fewer than `n` exist.
pub fn sample_suitable<'r, F, R>(
    records: &'r [TimetableRecord],
    n: usize,
    predicate: F,
    rng: &mut R,
) -> Vec<&'r TimetableRecord>
where
    F: Fn(&TimetableRecord) -> bool,
    R: Rng + ?Sized,
{
    let suitable: Vec<&TimetableRecord> = records.iter().filter(|&r| predicate(r)).collect();
    suitable.choose_multiple(rng, n).copied().collect()
}
