//! Timetable grid (per-candidate cell assignment).
//!
//! A grid maps each day to thirteen cells; a cell is either empty (`""`)
//! or holds exactly one course label. Grids are cheap to clone: each day
//! row is reference-counted and only the rows touched by a write are
//! copied (copy-on-write), so staged overlays can hold many sibling grids
//! without copying the whole week each time.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::course::has_suffix_ignore_case;
use super::{CellPosition, Day, COLUMNS_PER_DAY};
use crate::error::{Result, TimetableError};

/// A weekly grid of course labels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<String>>")]
pub struct TimetableGrid {
    rows: [Arc<Vec<String>>; 6],
}

impl Default for TimetableGrid {
    fn default() -> Self {
        Self::empty()
    }
}

impl TimetableGrid {
    /// Creates a grid with every cell empty.
    pub fn empty() -> Self {
        let row = Arc::new(vec![String::new(); COLUMNS_PER_DAY]);
        Self {
            rows: std::array::from_fn(|_| Arc::clone(&row)),
        }
    }

    /// Parses a stored grid (`{"Monday": [..13 strings..], ...}`).
    ///
    /// Syntax errors surface as [`TimetableError::InvalidJson`]; a
    /// well-formed object with the wrong shape as
    /// [`TimetableError::MalformedGrid`].
    pub fn from_json(json: &str) -> Result<Self> {
        let map: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::try_from(map)
    }

    /// Parses a grid stored either as a JSON object or as a JSON string
    /// containing that object.
    ///
    /// The value is already JSON, so anything that is not a day map of
    /// string rows is reported as [`TimetableError::MalformedGrid`].
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let map: BTreeMap<String, Vec<String>> = match value {
            serde_json::Value::String(text) => serde_json::from_str(&text),
            other => serde_json::from_value(other),
        }
        .map_err(|err| TimetableError::malformed(format!("grid is not a day map: {err}")))?;
        Self::try_from(map)
    }

    /// Serializes to the stored JSON shape.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Cells of a day in column order; `""` marks an empty cell.
    pub fn row(&self, day: Day) -> &[String] {
        &self.rows[day.index()]
    }

    /// Label at a position, or `None` if the cell is empty or out of range.
    pub fn label_at(&self, pos: CellPosition) -> Option<&str> {
        self.rows[pos.day.index()]
            .get(pos.column)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Whether the cell is empty. Whitespace-only cells count as empty.
    #[inline]
    pub fn is_empty_at(&self, pos: CellPosition) -> bool {
        self.label_at(pos).is_none()
    }

    /// Writes `label` into `pos` only if the cell is empty.
    ///
    /// Returns `true` if the cell was written. Only the touched day row
    /// is copied when it is shared with another grid.
    pub fn set_if_empty(&mut self, pos: CellPosition, label: &str) -> bool {
        if pos.column >= COLUMNS_PER_DAY || !self.is_empty_at(pos) {
            return false;
        }
        Arc::make_mut(&mut self.rows[pos.day.index()])[pos.column] = label.to_string();
        true
    }

    /// Appends `code` to a cell, joining multiple entries with `", "`.
    pub(crate) fn append(&mut self, pos: CellPosition, code: &str) {
        if pos.column >= COLUMNS_PER_DAY {
            return;
        }
        let cell = &mut Arc::make_mut(&mut self.rows[pos.day.index()])[pos.column];
        if !cell.is_empty() {
            cell.push_str(", ");
        }
        cell.push_str(code);
    }

    /// Iterates over every position with its label (or `None`).
    pub fn cells(&self) -> impl Iterator<Item = (CellPosition, Option<&str>)> + '_ {
        Day::ALL.into_iter().flat_map(move |day| {
            (0..COLUMNS_PER_DAY).map(move |column| {
                let pos = CellPosition::new(day, column);
                (pos, self.label_at(pos))
            })
        })
    }

    /// Positions of all non-empty cells.
    pub fn occupied_cells(&self) -> BTreeSet<CellPosition> {
        self.cells()
            .filter_map(|(pos, label)| label.map(|_| pos))
            .collect()
    }

    /// Number of non-empty cells.
    pub fn filled_count(&self) -> usize {
        self.cells().filter(|(_, label)| label.is_some()).count()
    }

    /// Distinct labels present in the grid.
    pub fn labels(&self) -> BTreeSet<&str> {
        self.cells().filter_map(|(_, label)| label).collect()
    }

    /// Whether any cell holds exactly `label` (case-insensitive, whole cell).
    ///
    /// Whole-cell matching keeps `CSE2005` distinct from `CSE2005L`.
    pub fn contains_label(&self, label: &str) -> bool {
        let label = label.trim();
        self.cells()
            .any(|(_, cell)| cell.is_some_and(|c| c.eq_ignore_ascii_case(label)))
    }

    /// Whether any cell holds a label ending with `suffix` (e.g. a lab course).
    pub fn has_label_with_suffix(&self, suffix: &str) -> bool {
        self.cells()
            .any(|(_, cell)| cell.is_some_and(|c| has_suffix_ignore_case(c, suffix)))
    }

    /// Whether this grid shares the storage of `day` with `other`.
    pub fn shares_row_with(&self, other: &TimetableGrid, day: Day) -> bool {
        Arc::ptr_eq(&self.rows[day.index()], &other.rows[day.index()])
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for TimetableGrid {
    type Error = TimetableError;

    fn try_from(map: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut grid = TimetableGrid::empty();
        let mut seen = BTreeSet::new();

        for (name, cells) in map {
            let day = Day::from_name(&name)
                .ok_or_else(|| TimetableError::malformed(format!("unknown day '{name}'")))?;
            if !seen.insert(day) {
                return Err(TimetableError::malformed(format!("duplicate day '{name}'")));
            }
            if cells.len() != COLUMNS_PER_DAY {
                return Err(TimetableError::malformed(format!(
                    "{day} has {} cells, expected {COLUMNS_PER_DAY}",
                    cells.len()
                )));
            }
            grid.rows[day.index()] = Arc::new(cells);
        }

        if let Some(missing) = Day::ALL.into_iter().find(|d| !seen.contains(d)) {
            return Err(TimetableError::malformed(format!("missing day {missing}")));
        }
        Ok(grid)
    }
}

impl Serialize for TimetableGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Day::ALL.len()))?;
        for day in Day::ALL {
            map.serialize_entry(day.name(), self.row(day))?;
        }
        map.end()
    }
}
