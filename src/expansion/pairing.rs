//! Global pairing: one offering per course, all courses at once.
//!
//! # Algorithm
//!
//! 1. Precompute each offering's occupied cell set once.
//! 2. Walk the Cartesian product of offerings with an odometer, first
//!    stage slowest.
//! 3. Accept a combination iff its cell sets are pairwise disjoint. When
//!    stage `j` overlaps an earlier stage, every combination sharing the
//!    prefix `0..=j` is skipped at once and counted as one conflict, the
//!    same count a staged run reports.
//! 4. Optionally drop combinations whose (course, footprint) set was
//!    already emitted.
//!
//! Acceptance depends only on the chosen sets, so the accepted set is the
//! same for any ordering of the stages; only emission order changes.
//!
//! # Complexity
//! Worst case O(Π offerings × stages² × cells per offering); clashing
//! prefixes are never extended.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info};

use super::{union_slots, GenerationStats, Stage};
use crate::models::{CellPosition, TimetableGrid, TimetableRecord};
use crate::normalize::CanonicalSlotSet;
use crate::overlay::OverlayEngine;

/// Pairing over a fixed list of stages.
///
/// # Example
/// ```
/// use u_timetable::expansion::{GlobalPairing, Stage};
/// use u_timetable::index::SlotMappingIndex;
/// use u_timetable::models::{Course, GridLayout};
/// use u_timetable::normalize::Normalizer;
/// use u_timetable::overlay::OverlayEngine;
///
/// let index = SlotMappingIndex::build(&GridLayout::standard());
/// let normalizer = Normalizer::new(&index);
/// let stages = vec![
///     Stage::from_course(&Course::new("PHY1008L").with_offering("L1+L2").with_offering("L3+L4"), &normalizer),
///     Stage::from_course(&Course::new("ENG1011L").with_offering("L1+L2").with_offering("L5+L6"), &normalizer),
/// ];
///
/// let records: Vec<_> = GlobalPairing::new(OverlayEngine::new(&index), &stages).iter().collect();
/// // (L1+L2, L1+L2) collides; the other three pairings fit.
/// assert_eq!(records.len(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GlobalPairing<'a> {
    engine: OverlayEngine<'a>,
    stages: &'a [Stage],
    dedupe: bool,
}

impl<'a> GlobalPairing<'a> {
    /// Creates a pairing over `stages` with result deduplication on.
    pub fn new(engine: OverlayEngine<'a>, stages: &'a [Stage]) -> Self {
        Self {
            engine,
            stages,
            dedupe: true,
        }
    }

    /// Enables or disables result deduplication.
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    /// Lazily enumerates accepted combinations.
    ///
    /// An empty stage list, or any stage without offerings, yields nothing.
    pub fn iter(&self) -> Pairings<'a> {
        let mut stats = GenerationStats::new();
        let footprints: Vec<Vec<Option<BTreeSet<CellPosition>>>> = self
            .stages
            .iter()
            .map(|stage| {
                stage
                    .offerings
                    .iter()
                    .map(|offering| match self.engine.check_codes(&offering.codes) {
                        Ok(()) => Some(self.engine.occupied_cells(&offering.codes)),
                        Err(err) => {
                            debug!(stage = %stage.label, error = %err, "offering excluded");
                            stats.unknown_code_rejections += 1;
                            None
                        }
                    })
                    .collect()
            })
            .collect();

        let exhausted = self.stages.is_empty() || self.stages.iter().any(Stage::is_empty);
        Pairings {
            stages: self.stages,
            footprints,
            odometer: vec![0; self.stages.len()],
            exhausted,
            dedupe: self.dedupe,
            seen: HashSet::new(),
            stats,
        }
    }
}

/// Why a prefix of the odometer cannot complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dead {
    /// The offering at this stage was excluded by the unknown-code policy.
    Excluded(usize),
    /// The offering at this stage overlaps an earlier stage's offering.
    Clash(usize),
}

/// Iterator over accepted combinations. See [`GlobalPairing::iter`].
#[derive(Debug, Clone)]
pub struct Pairings<'a> {
    stages: &'a [Stage],
    footprints: Vec<Vec<Option<BTreeSet<CellPosition>>>>,
    odometer: Vec<usize>,
    exhausted: bool,
    dedupe: bool,
    seen: HashSet<Vec<(String, CanonicalSlotSet)>>,
    stats: GenerationStats,
}

impl Pairings<'_> {
    /// Counters so far.
    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Drains the iterator, returning every record and the final counters.
    pub fn collect_with_stats(mut self) -> (Vec<TimetableRecord>, GenerationStats) {
        let records: Vec<TimetableRecord> = self.by_ref().collect();
        info!(
            stages = self.stages.len(),
            accepted = self.stats.accepted,
            rejected = self.stats.rejected(),
            duplicates = self.stats.duplicates_removed,
            "pairing finished"
        );
        (records, self.stats)
    }

    /// Moves the odometer past every combination sharing the prefix
    /// `0..=stage`: later digits reset, digit `stage` steps with carry.
    fn advance_at(&mut self, stage: usize) {
        for digit in &mut self.odometer[stage + 1..] {
            *digit = 0;
        }
        for i in (0..=stage).rev() {
            self.odometer[i] += 1;
            if self.odometer[i] < self.footprints[i].len() {
                return;
            }
            self.odometer[i] = 0;
        }
        self.exhausted = true;
    }

    /// First stage at which the prefix of `choice` is dead: an excluded
    /// offering, or a footprint overlapping an earlier stage's.
    fn first_dead(&self, choice: &[usize]) -> Option<Dead> {
        let mut chosen: Vec<&BTreeSet<CellPosition>> = Vec::with_capacity(choice.len());
        for (stage, &k) in choice.iter().enumerate() {
            let Some(cells) = self.footprints[stage][k].as_ref() else {
                return Some(Dead::Excluded(stage));
            };
            if chosen.iter().any(|earlier| !earlier.is_disjoint(cells)) {
                return Some(Dead::Clash(stage));
            }
            chosen.push(cells);
        }
        None
    }

    fn build(&self, choice: &[usize]) -> TimetableRecord {
        let first = &self.stages[0];
        let mut grid = TimetableGrid::empty();
        let mut slots: Vec<String> = Vec::new();
        for (stage_idx, &k) in choice.iter().enumerate() {
            let stage = &self.stages[stage_idx];
            if let Some(cells) = &self.footprints[stage_idx][k] {
                for &pos in cells {
                    grid.set_if_empty(pos, &stage.label);
                }
            }
            slots = union_slots(&slots, &stage.offerings[k].codes);
        }
        TimetableRecord {
            semester: first.semester,
            degree: first.degree.clone(),
            grid,
            all_slots: slots,
        }
    }

    fn signature(&self, choice: &[usize]) -> Vec<(String, CanonicalSlotSet)> {
        let mut key: Vec<(String, CanonicalSlotSet)> = choice
            .iter()
            .enumerate()
            .map(|(i, &k)| {
                (
                    self.stages[i].label.clone(),
                    self.stages[i].offerings[k].signature.clone(),
                )
            })
            .collect();
        key.sort();
        key
    }
}

impl Iterator for Pairings<'_> {
    type Item = TimetableRecord;

    fn next(&mut self) -> Option<TimetableRecord> {
        while !self.exhausted {
            let choice = self.odometer.clone();

            match self.first_dead(&choice) {
                Some(Dead::Excluded(stage)) => {
                    self.advance_at(stage);
                    continue;
                }
                Some(Dead::Clash(stage)) => {
                    let label = self.stages[stage].label.clone();
                    self.stats.record_conflict(&label);
                    self.advance_at(stage);
                    continue;
                }
                None => self.advance_at(choice.len() - 1),
            }

            if self.dedupe && !self.seen.insert(self.signature(&choice)) {
                self.stats.duplicates_removed += 1;
                continue;
            }

            self.stats.accepted += 1;
            return Some(self.build(&choice));
        }
        None
    }
}
