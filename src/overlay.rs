//! Grid overlay engine.
//!
//! Stamps a course label into the cells reachable from an offering's slot
//! codes. Overlay is check-then-write: the target cells are computed and
//! checked first, and the new grid is only produced when every target is
//! empty. A conflict therefore never leaks a partial write, and the input
//! grid is never modified.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::UnknownCodePolicy;
use crate::error::{Result, TimetableError};
use crate::index::SlotMappingIndex;
use crate::models::{CellPosition, TimetableGrid};

/// Result of a single overlay attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayOutcome {
    /// Every target cell was empty; this is the new grid.
    Placed(TimetableGrid),
    /// At least one target cell was already filled.
    Conflict {
        /// The filled target cells.
        cells: Vec<CellPosition>,
    },
}

impl OverlayOutcome {
    /// Whether the overlay succeeded.
    pub fn is_placed(&self) -> bool {
        matches!(self, OverlayOutcome::Placed(_))
    }

    /// The new grid, if placed.
    pub fn into_grid(self) -> Option<TimetableGrid> {
        match self {
            OverlayOutcome::Placed(grid) => Some(grid),
            OverlayOutcome::Conflict { .. } => None,
        }
    }
}

/// Overlay primitives bound to a slot mapping index.
///
/// Cheap to copy; holds only a reference to the index and the policy.
///
/// # Example
/// ```
/// use u_timetable::index::SlotMappingIndex;
/// use u_timetable::models::{GridLayout, TimetableGrid};
/// use u_timetable::overlay::OverlayEngine;
///
/// let index = SlotMappingIndex::build(&GridLayout::standard());
/// let engine = OverlayEngine::new(&index);
///
/// let grid = engine
///     .try_overlay(&TimetableGrid::empty(), &["A1", "TA1"], "STS1009")
///     .unwrap()
///     .into_grid()
///     .unwrap();
/// assert_eq!(grid.filled_count(), 4);
///
/// // TA1 is already taken.
/// assert!(!engine.fits(&grid, &["TA1"]).unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OverlayEngine<'a> {
    index: &'a SlotMappingIndex,
    policy: UnknownCodePolicy,
}

impl<'a> OverlayEngine<'a> {
    /// Creates an engine with [`UnknownCodePolicy::Ignore`].
    pub fn new(index: &'a SlotMappingIndex) -> Self {
        Self {
            index,
            policy: UnknownCodePolicy::Ignore,
        }
    }

    /// Sets the unknown-code policy.
    pub fn with_policy(mut self, policy: UnknownCodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying index.
    pub fn index(&self) -> &'a SlotMappingIndex {
        self.index
    }

    /// The active unknown-code policy.
    pub fn policy(&self) -> UnknownCodePolicy {
        self.policy
    }

    /// Union of the cells reachable from `codes`.
    ///
    /// Codes with no index entry contribute nothing, regardless of policy.
    pub fn occupied_cells<S: AsRef<str>>(&self, codes: &[S]) -> BTreeSet<CellPosition> {
        codes
            .iter()
            .filter_map(|c| self.index.positions(c.as_ref()))
            .flatten()
            .copied()
            .collect()
    }

    /// Applies the unknown-code policy to `codes`.
    ///
    /// Under `Reject` the first unmapped code is returned as an error;
    /// under `Ignore` unmapped codes are skipped (logged at debug level).
    pub fn check_codes<S: AsRef<str>>(&self, codes: &[S]) -> Result<()> {
        let unknown = self.index.unknown_codes(codes);
        let Some(first) = unknown.first() else {
            return Ok(());
        };
        match self.policy {
            UnknownCodePolicy::Reject => Err(TimetableError::UnknownSlotCode {
                code: first.clone(),
            }),
            UnknownCodePolicy::Ignore => {
                debug!(codes = ?unknown, "slot codes missing from index; treated as always free");
                Ok(())
            }
        }
    }

    /// Whether every cell reachable from `codes` is empty in `grid`.
    pub fn fits<S: AsRef<str>>(&self, grid: &TimetableGrid, codes: &[S]) -> Result<bool> {
        self.check_codes(codes)?;
        Ok(self
            .occupied_cells(codes)
            .into_iter()
            .all(|pos| grid.is_empty_at(pos)))
    }

    /// Attempts to stamp `label` into the cells of `codes`.
    ///
    /// Returns `Ok(Placed(new_grid))` when every target is empty, and
    /// `Ok(Conflict { .. })` otherwise. `grid` is never modified. The new
    /// grid shares storage with `grid` for untouched days only.
    ///
    /// # Errors
    /// [`TimetableError::UnknownSlotCode`] under [`UnknownCodePolicy::Reject`].
    pub fn try_overlay<S: AsRef<str>>(
        &self,
        grid: &TimetableGrid,
        codes: &[S],
        label: &str,
    ) -> Result<OverlayOutcome> {
        self.check_codes(codes)?;
        let targets = self.occupied_cells(codes);

        let conflicts: Vec<CellPosition> = targets
            .iter()
            .copied()
            .filter(|&pos| !grid.is_empty_at(pos))
            .collect();
        if !conflicts.is_empty() {
            return Ok(OverlayOutcome::Conflict { cells: conflicts });
        }

        let mut next = grid.clone();
        for pos in targets {
            next.set_if_empty(pos, label);
        }
        Ok(OverlayOutcome::Placed(next))
    }

    /// Renders a grid listing, per cell, every code of `codes` mapped to it.
    ///
    /// Cells reached by several codes read `"A1, L10"` in the order
    /// the codes were given. Used to display a record's `allSlots`.
    pub fn render_slots<S: AsRef<str>>(&self, codes: &[S]) -> TimetableGrid {
        let mut grid = TimetableGrid::empty();
        for code in codes {
            let code = self.index.normalize(code.as_ref());
            if let Some(positions) = self.index.positions(&code) {
                for &pos in positions {
                    grid.append(pos, &code);
                }
            }
        }
        grid
    }
}
