//! Timetable record (generation output).
//!
//! A record is one accepted combination: the filled grid plus the set of
//! every slot code consumed by the courses overlaid on it. Records are
//! append-only output; the engine never mutates a record after emitting it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::TimetableGrid;
use crate::error::{Result, TimetableError};

/// An accepted timetable.
///
/// Stored records may carry `grid` either as a day map or as a JSON string
/// holding that map; both load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredRecord")]
pub struct TimetableRecord {
    /// Semester the timetable belongs to.
    pub semester: u32,
    /// Degree programme.
    pub degree: String,
    /// The filled weekly grid.
    pub grid: TimetableGrid,
    /// Union of consumed slot codes, without duplicates, in first-seen order.
    pub all_slots: Vec<String>,
}

/// Wire shape of a stored record, before the grid is decoded.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    semester: u32,
    degree: String,
    grid: serde_json::Value,
    all_slots: Vec<String>,
}

impl TryFrom<StoredRecord> for TimetableRecord {
    type Error = TimetableError;

    fn try_from(stored: StoredRecord) -> Result<Self> {
        Ok(Self {
            semester: stored.semester,
            degree: stored.degree,
            grid: TimetableGrid::from_value(stored.grid)?,
            all_slots: stored.all_slots,
        })
    }
}

impl TimetableRecord {
    /// Creates a record with an empty grid and no slots.
    pub fn new(semester: u32, degree: impl Into<String>) -> Self {
        Self {
            semester,
            degree: degree.into(),
            grid: TimetableGrid::empty(),
            all_slots: Vec::new(),
        }
    }

    /// Sets the grid.
    pub fn with_grid(mut self, grid: TimetableGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Sets the consumed slot codes (duplicates are dropped).
    pub fn with_slots<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.all_slots.clear();
        for slot in slots {
            let slot = slot.into();
            if !self.all_slots.contains(&slot) {
                self.all_slots.push(slot);
            }
        }
        self
    }

    /// Parses a stored record.
    ///
    /// # Errors
    /// [`TimetableError::InvalidJson`] if the document is not a record;
    /// [`TimetableError::MalformedGrid`] if only its grid is unusable.
    pub fn from_json(json: &str) -> Result<Self> {
        let stored: StoredRecord = serde_json::from_str(json)?;
        Self::try_from(stored)
    }

    /// Serializes to the stored JSON shape (`semester`, `degree`, `grid`, `allSlots`).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Consumed slot codes as a set.
    pub fn slot_set(&self) -> BTreeSet<&str> {
        self.all_slots.iter().map(String::as_str).collect()
    }

    /// Whether the grid carries `course` as a whole-cell label.
    pub fn has_course(&self, course: &str) -> bool {
        self.grid.contains_label(course)
    }

    /// Whether every label in `courses` is present.
    pub fn has_all_courses<S: AsRef<str>>(&self, courses: &[S]) -> bool {
        courses.iter().all(|c| self.has_course(c.as_ref()))
    }
}
