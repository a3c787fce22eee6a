//! Timetable domain models.
//!
//! Plain data types for the weekly layout, the course catalog, and the
//! generated timetables. Algorithms live in sibling modules.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | Meaning |
//! |-------------|------------|---------|
//! | GridLayout | Slot chart | Which slot codes sit in which period |
//! | Course | Course | A subject that must appear in the timetable |
//! | SlotCombination | Section | One offering (codes + faculty + venue) |
//! | TimetableGrid | Timetable | Course label per period |
//! | TimetableRecord | Generated timetable | Grid + consumed slot codes |

mod course;
mod grid;
mod layout;
mod record;

pub use course::{split_codes, Course, SlotCombination, COMBO_SEPARATOR, DEFAULT_LAB_SUFFIX};
pub use grid::TimetableGrid;
pub use layout::{
    CellDescriptor, CellPosition, Day, GridLayout, ALTERNATIVE_SEPARATOR, COLUMNS_PER_DAY, LUNCH,
};
pub use record::TimetableRecord;

pub(crate) use course::has_suffix_ignore_case;
pub(crate) use layout::normalize_with;
