//! Error taxonomy for timetable generation.
//!
//! Overlay conflicts are not errors: they are the normal branch-rejection
//! outcome of [`OverlayEngine::try_overlay`](crate::overlay::OverlayEngine::try_overlay)
//! and are reported as [`OverlayOutcome::Conflict`](crate::overlay::OverlayOutcome::Conflict).
//! The variants here cover the failures that invalidate a base record,
//! a branch, or a whole generation run.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors raised by the timetable engine.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// A supplied grid has the wrong shape (missing day, unknown day,
    /// wrong column count). Local to the base record that carried it.
    #[error("malformed grid: {reason}")]
    MalformedGrid {
        /// What was wrong with the grid.
        reason: String,
    },

    /// A slot code has no entry in the slot mapping index.
    ///
    /// Only raised under [`UnknownCodePolicy::Reject`](crate::config::UnknownCodePolicy::Reject).
    #[error("unknown slot code '{code}'")]
    UnknownSlotCode {
        /// The normalized code that could not be resolved.
        code: String,
    },

    /// A required course is absent from the catalog. Fatal for the run.
    #[error("course '{code}' not found in catalog")]
    CourseNotFound {
        /// The requested course code.
        code: String,
    },

    /// A stored grid, record, catalog or config could not be decoded.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl TimetableError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedGrid {
            reason: reason.into(),
        }
    }

    /// Whether this error only invalidates the current base record or branch,
    /// as opposed to the whole generation run.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MalformedGrid { .. } | Self::UnknownSlotCode { .. } | Self::InvalidJson(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = TimetableError::malformed("Monday has 12 columns");
        assert_eq!(e.to_string(), "malformed grid: Monday has 12 columns");

        let e = TimetableError::CourseNotFound {
            code: "CSE2005".into(),
        };
        assert_eq!(e.to_string(), "course 'CSE2005' not found in catalog");
    }

    #[test]
    fn test_locality() {
        assert!(TimetableError::malformed("x").is_local());
        assert!(TimetableError::UnknownSlotCode { code: "Z9".into() }.is_local());
        assert!(!TimetableError::CourseNotFound { code: "X".into() }.is_local());

        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(TimetableError::from(json_err).is_local());
    }
}
