//! Course and slot-combination model.
//!
//! A course is offered through one or more slot combinations. Each
//! combination is a compound slot code such as `"A1+TA1"` taught by a
//! particular faculty member in a particular venue. Combinations sharing
//! the same codes are interchangeable for grid-occupancy purposes.

use serde::{Deserialize, Serialize};

/// Separator between slot codes inside a compound slot code.
pub const COMBO_SEPARATOR: char = '+';

/// Default suffix distinguishing lab courses (`ENG2001L`) from theory (`ENG2001`).
pub const DEFAULT_LAB_SUFFIX: &str = "L";

/// One concrete offering of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCombination {
    /// Offering identifier (unique within the catalog).
    pub id: u64,
    /// Compound slot code, e.g. `"A1+TA1"`.
    pub slot_code: String,
    /// Teaching venue.
    #[serde(default)]
    pub venue: String,
    /// Teaching faculty member.
    #[serde(default)]
    pub faculty: String,
}

impl SlotCombination {
    /// Creates an offering with no venue or faculty.
    pub fn new(id: u64, slot_code: impl Into<String>) -> Self {
        Self {
            id,
            slot_code: slot_code.into(),
            venue: String::new(),
            faculty: String::new(),
        }
    }

    /// Sets the venue.
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = venue.into();
        self
    }

    /// Sets the faculty member.
    pub fn with_faculty(mut self, faculty: impl Into<String>) -> Self {
        self.faculty = faculty.into();
        self
    }

    /// Individual slot codes, trimmed, as written.
    pub fn codes(&self) -> Vec<&str> {
        split_codes(&self.slot_code)
    }
}

/// Splits a compound slot code on `+`, dropping blank parts.
pub fn split_codes(compound: &str) -> Vec<&str> {
    compound
        .split(COMBO_SEPARATOR)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

/// A course with its alternative offerings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique course code; also the label stamped into grid cells.
    pub code: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Semester the course belongs to.
    pub semester: u32,
    /// Degree programme.
    #[serde(default)]
    pub degree: String,
    /// Alternative offerings, in catalog order.
    #[serde(default, alias = "slotCombos")]
    pub slot_combinations: Vec<SlotCombination>,
}

impl Course {
    /// Creates a course with no offerings.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            semester: 0,
            degree: String::new(),
            slot_combinations: Vec::new(),
        }
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the semester.
    pub fn with_semester(mut self, semester: u32) -> Self {
        self.semester = semester;
        self
    }

    /// Sets the degree programme.
    pub fn with_degree(mut self, degree: impl Into<String>) -> Self {
        self.degree = degree.into();
        self
    }

    /// Adds a fully specified offering.
    pub fn with_combination(mut self, combination: SlotCombination) -> Self {
        self.slot_combinations.push(combination);
        self
    }

    /// Adds an offering by compound slot code, numbering it sequentially.
    pub fn with_offering(mut self, slot_code: impl Into<String>) -> Self {
        let id = self.slot_combinations.len() as u64 + 1;
        self.slot_combinations
            .push(SlotCombination::new(id, slot_code));
        self
    }

    /// Whether this is a lab course (code ends with `suffix`, ignoring case).
    pub fn is_lab(&self, suffix: &str) -> bool {
        has_suffix_ignore_case(&self.code, suffix)
    }

    /// Number of offerings.
    pub fn offering_count(&self) -> usize {
        self.slot_combinations.len()
    }
}

pub(crate) fn has_suffix_ignore_case(value: &str, suffix: &str) -> bool {
    let value = value.trim();
    !suffix.is_empty()
        && value.len() >= suffix.len()
        && value.is_char_boundary(value.len() - suffix.len())
        && value[value.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
