//! Staged expansion: course by course onto a seed record.
//!
//! # Algorithm
//!
//! Depth-first search over an explicit worklist. A frame holds the grid
//! and consumed slot codes after `depth` stages. Popping a frame at full
//! depth emits a record; otherwise every offering of the next stage is
//! overlaid onto the frame's grid and each placement pushes a child frame.
//! Children are pushed in reverse so records come out in offering order,
//! the same order as nested loops over the stages.
//!
//! Records sharing a prefix of stages share the untouched rows of their
//! grids; no emitted record observes another's writes.
//!
//! # Complexity
//! Worst case the product of per-stage offering counts. The worklist holds
//! at most the sum of per-stage offering counts.

use tracing::{debug, info, warn};

use super::{union_slots, GenerationStats, Stage};
use crate::error::Result;
use crate::models::{TimetableGrid, TimetableRecord};
use crate::overlay::{OverlayEngine, OverlayOutcome};

/// Staged expansion over a fixed list of stages.
///
/// # Example
/// ```
/// use u_timetable::expansion::{Stage, StagedExpansion};
/// use u_timetable::index::SlotMappingIndex;
/// use u_timetable::models::{Course, GridLayout, TimetableRecord};
/// use u_timetable::normalize::Normalizer;
/// use u_timetable::overlay::OverlayEngine;
///
/// let index = SlotMappingIndex::build(&GridLayout::standard());
/// let normalizer = Normalizer::new(&index);
/// let stages = vec![
///     Stage::from_course(&Course::new("PHY1008").with_offering("A1+TA1").with_offering("B1+TB1"), &normalizer),
///     Stage::from_course(&Course::new("ENG1011").with_offering("C1+TC1"), &normalizer),
/// ];
///
/// let expansion = StagedExpansion::new(OverlayEngine::new(&index), &stages);
/// let records: Vec<TimetableRecord> = expansion.expand(TimetableRecord::new(1, "ECE")).collect();
/// assert_eq!(records.len(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StagedExpansion<'a> {
    engine: OverlayEngine<'a>,
    stages: &'a [Stage],
}

impl<'a> StagedExpansion<'a> {
    /// Creates an expansion over `stages`, applied in order.
    pub fn new(engine: OverlayEngine<'a>, stages: &'a [Stage]) -> Self {
        Self { engine, stages }
    }

    /// The stages.
    pub fn stages(&self) -> &'a [Stage] {
        self.stages
    }

    /// An empty seed carrying the first stage's semester and degree.
    pub fn empty_seed(&self) -> TimetableRecord {
        match self.stages.first() {
            Some(stage) => TimetableRecord::new(stage.semester, stage.degree.clone()),
            None => TimetableRecord::default(),
        }
    }

    /// Lazily expands `seed` through every stage.
    ///
    /// The seed's semester and degree are carried into every record, and
    /// its slot codes are normalized into the consumed-code union. With no
    /// stages the seed itself is the only record.
    pub fn expand(&self, seed: TimetableRecord) -> Expand<'a> {
        let mut slots: Vec<String> = Vec::with_capacity(seed.all_slots.len());
        for raw in &seed.all_slots {
            let code = self.engine.index().normalize(raw);
            if !code.is_empty() && !slots.contains(&code) {
                slots.push(code);
            }
        }

        Expand {
            engine: self.engine,
            stages: self.stages,
            semester: seed.semester,
            degree: seed.degree,
            stack: vec![Frame {
                depth: 0,
                grid: seed.grid,
                slots,
            }],
            stats: GenerationStats {
                bases_processed: 1,
                ..Default::default()
            },
        }
    }

    /// Lazily expands every base record in turn.
    ///
    /// Bases that failed to load (`Err`) are logged, counted in
    /// [`GenerationStats::malformed_bases`] and skipped; the run continues.
    pub fn expand_all<I>(&self, bases: I) -> ExpandAll<'a, I::IntoIter>
    where
        I: IntoIterator<Item = Result<TimetableRecord>>,
    {
        ExpandAll {
            expansion: *self,
            bases: bases.into_iter(),
            current: None,
            stats: GenerationStats::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct Frame {
    depth: usize,
    grid: TimetableGrid,
    slots: Vec<String>,
}

/// Iterator over the records of one seed. See [`StagedExpansion::expand`].
#[derive(Debug, Clone)]
pub struct Expand<'a> {
    engine: OverlayEngine<'a>,
    stages: &'a [Stage],
    semester: u32,
    degree: String,
    stack: Vec<Frame>,
    stats: GenerationStats,
}

impl Expand<'_> {
    /// Counters so far.
    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Drains the iterator, returning every record and the final counters.
    pub fn collect_with_stats(mut self) -> (Vec<TimetableRecord>, GenerationStats) {
        let records: Vec<TimetableRecord> = self.by_ref().collect();
        (records, self.stats)
    }
}

impl Iterator for Expand<'_> {
    type Item = TimetableRecord;

    fn next(&mut self) -> Option<TimetableRecord> {
        while let Some(frame) = self.stack.pop() {
            let Some(stage) = self.stages.get(frame.depth) else {
                self.stats.accepted += 1;
                return Some(TimetableRecord {
                    semester: self.semester,
                    degree: self.degree.clone(),
                    grid: frame.grid,
                    all_slots: frame.slots,
                });
            };

            for offering in stage.offerings.iter().rev() {
                match self
                    .engine
                    .try_overlay(&frame.grid, &offering.codes, &stage.label)
                {
                    Ok(OverlayOutcome::Placed(grid)) => self.stack.push(Frame {
                        depth: frame.depth + 1,
                        grid,
                        slots: union_slots(&frame.slots, &offering.codes),
                    }),
                    Ok(OverlayOutcome::Conflict { cells }) => {
                        debug!(
                            stage = %stage.label,
                            offering = %offering.signature,
                            conflicts = cells.len(),
                            "offering rejected"
                        );
                        self.stats.record_conflict(&stage.label);
                    }
                    Err(err) => {
                        debug!(stage = %stage.label, error = %err, "offering rejected");
                        self.stats.unknown_code_rejections += 1;
                    }
                }
            }
        }
        None
    }
}

/// Iterator over the records of many seeds. See [`StagedExpansion::expand_all`].
#[derive(Debug)]
pub struct ExpandAll<'a, I> {
    expansion: StagedExpansion<'a>,
    bases: I,
    current: Option<Expand<'a>>,
    stats: GenerationStats,
}

impl<I> ExpandAll<'_, I> {
    /// Counters so far, including the base currently being expanded.
    pub fn stats(&self) -> GenerationStats {
        let mut stats = self.stats.clone();
        if let Some(current) = &self.current {
            stats.merge(current.stats());
        }
        stats
    }
}

impl<I> ExpandAll<'_, I>
where
    I: Iterator<Item = Result<TimetableRecord>>,
{
    /// Drains the iterator, returning every record and the final counters.
    pub fn collect_with_stats(mut self) -> (Vec<TimetableRecord>, GenerationStats) {
        let records: Vec<TimetableRecord> = self.by_ref().collect();
        let stats = self.stats();
        info!(
            bases = stats.bases_processed,
            skipped = stats.malformed_bases,
            accepted = stats.accepted,
            rejected = stats.rejected(),
            "expansion finished"
        );
        (records, stats)
    }
}

impl<I> Iterator for ExpandAll<'_, I>
where
    I: Iterator<Item = Result<TimetableRecord>>,
{
    type Item = TimetableRecord;

    fn next(&mut self) -> Option<TimetableRecord> {
        loop {
            if let Some(current) = &mut self.current {
                if let Some(record) = current.next() {
                    return Some(record);
                }
            }
            if let Some(done) = self.current.take() {
                self.stats.merge(done.stats());
            }

            match self.bases.next()? {
                Ok(base) => self.current = Some(self.expansion.expand(base)),
                Err(err) => {
                    warn!(error = %err, "skipping unreadable base record");
                    self.stats.malformed_bases += 1;
                }
            }
        }
    }
}

/// Adds one course to a single base record.
///
/// Equivalent to a one-stage [`StagedExpansion`]: every offering of
/// `stage` that fits `base` yields one record.
pub fn augment(engine: OverlayEngine<'_>, base: TimetableRecord, stage: &Stage) -> Vec<TimetableRecord> {
    StagedExpansion::new(engine, std::slice::from_ref(stage))
        .expand(base)
        .collect()
}
