//! Input validation for timetable generation.
//!
//! Checks structural integrity of the course catalog and the grid layout
//! before generation. Detects:
//! - Duplicate course codes
//! - Courses without offerings, offerings without codes
//! - Slot codes the layout never maps
//! - Course codes that would be confused with one another
//! - Layout rows of the wrong length, missing days, inconsistent lunch
//!
//! Validation is advisory: the generator runs on unvalidated input, with
//! unknown codes handled per [`UnknownCodePolicy`](crate::config::UnknownCodePolicy).

use std::collections::{BTreeSet, HashSet};

use crate::index::SlotMappingIndex;
use crate::models::{split_codes, Course, Day, GridLayout, COLUMNS_PER_DAY};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two courses share a code.
    DuplicateCourseCode,
    /// A course has no slot combinations.
    EmptyCourse,
    /// A slot combination lists no codes.
    EmptySlotCode,
    /// A slot code has no cell in the layout.
    UnknownSlotCode,
    /// One course code extends another by something other than the lab suffix.
    AmbiguousLabel,
    /// A day row does not have the expected number of columns.
    WrongColumnCount,
    /// A day has no row.
    MissingDay,
    /// Non-schedulable columns differ between days.
    InconsistentLunch,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a course catalog against a slot mapping index.
///
/// Checks:
/// 1. No duplicate course codes (case-insensitive)
/// 2. Every course has at least one slot combination
/// 3. Every slot combination lists at least one code
/// 4. Every slot code is mapped by the index
/// 5. No course code is a prefix of another unless the remainder is
///    exactly `lab_suffix`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(
    courses: &[Course],
    index: &SlotMappingIndex,
    lab_suffix: &str,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut codes = HashSet::new();
    for course in courses {
        if !codes.insert(course.code.to_ascii_uppercase()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateCourseCode,
                format!("Duplicate course code: {}", course.code),
            ));
        }

        if course.slot_combinations.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCourse,
                format!("Course '{}' has no slot combinations", course.code),
            ));
        }

        let mut unknown = BTreeSet::new();
        for combo in &course.slot_combinations {
            let parts = split_codes(&combo.slot_code);
            if parts.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::EmptySlotCode,
                    format!(
                        "Course '{}' slot combination {} has no slot codes",
                        course.code, combo.id
                    ),
                ));
            }
            unknown.extend(index.unknown_codes(&parts));
        }
        for code in unknown {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownSlotCode,
                format!("Course '{}' uses unmapped slot code '{code}'", course.code),
            ));
        }
    }

    errors.extend(ambiguous_labels(courses, lab_suffix));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Finds course codes that extend another course code by anything other
/// than the lab suffix.
fn ambiguous_labels(courses: &[Course], lab_suffix: &str) -> Vec<ValidationError> {
    let suffix = lab_suffix.to_ascii_uppercase();
    let mut codes: Vec<String> = courses.iter().map(|c| c.code.to_ascii_uppercase()).collect();
    codes.sort_unstable();
    codes.dedup();

    let mut errors = Vec::new();
    for (i, short) in codes.iter().enumerate() {
        // Sorted order puts every extension of `short` right after it.
        for long in codes[i + 1..].iter().take_while(|c| c.starts_with(short.as_str())) {
            if long[short.len()..] != suffix {
                errors.push(ValidationError::new(
                    ValidationErrorKind::AmbiguousLabel,
                    format!("Course code '{long}' extends '{short}'"),
                ));
            }
        }
    }
    errors
}

/// Validates a grid layout.
///
/// Checks:
/// 1. Every day of the week has a row
/// 2. Every row has [`COLUMNS_PER_DAY`] cells
/// 3. Non-schedulable columns are the same on every day
pub fn validate_layout(layout: &GridLayout) -> ValidationResult {
    let mut errors = Vec::new();

    let defined: HashSet<Day> = layout.rows().map(|(day, _)| day).collect();
    for day in Day::ALL {
        if !defined.contains(&day) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingDay,
                format!("Layout has no row for {day}"),
            ));
        }
    }

    let mut lunch: Option<(Day, Vec<usize>)> = None;
    for (day, row) in layout.rows() {
        if row.len() != COLUMNS_PER_DAY {
            errors.push(ValidationError::new(
                ValidationErrorKind::WrongColumnCount,
                format!("{day} has {} columns, expected {COLUMNS_PER_DAY}", row.len()),
            ));
        }

        let columns: Vec<usize> = row
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_schedulable())
            .map(|(column, _)| column)
            .collect();
        match &lunch {
            None => lunch = Some((day, columns)),
            Some((first, expected)) if *expected != columns => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InconsistentLunch,
                    format!("{day} breaks at {columns:?}, {first} at {expected:?}"),
                ));
            }
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
