//! Weekly timetable generation for a slot-grid university schedule.
//!
//! Courses are offered in several alternative slot combinations
//! (`"A1+TA1"`), each slot code mapping to fixed cells of a six-day,
//! thirteen-period week. This crate enumerates every clash-free way to
//! pick one offering per course and emits the filled grids.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `GridLayout`, `Course`, `SlotCombination`,
//!   `TimetableGrid`, `TimetableRecord`
//! - **`index`**: Slot code → cell positions, derived from a layout
//! - **`normalize`**: Canonical signatures and offering deduplication
//! - **`overlay`**: Conflict-checked placement of a course onto a grid
//! - **`expansion`**: Staged expansion, augmentation, global pairing
//! - **`generator`**: Catalog-driven facade over the expansion drivers
//! - **`scan`**: Presence scans, completeness filtering, sampling
//! - **`validation`**: Catalog and layout integrity checks
//! - **`config`**, **`error`**, **`catalog`**
//!
//! # Logging
//!
//! Emits `tracing` events (rejections at `debug`, run summaries at `info`,
//! skipped inputs at `warn`). No subscriber is installed.
//!
//! # Example
//!
//! ```
//! use u_timetable::catalog::Catalog;
//! use u_timetable::generator::Generator;
//! use u_timetable::index::SlotMappingIndex;
//! use u_timetable::models::{Course, GridLayout};
//!
//! let index = SlotMappingIndex::build(&GridLayout::standard());
//! let catalog = Catalog::new(vec![
//!     Course::new("MAT1002").with_offering("A1+TA1"),
//!     Course::new("ECE1003").with_offering("B1+TB1").with_offering("a1+ta1"),
//! ]);
//!
//! let (records, _) = Generator::new(&catalog, &index)
//!     .generate(&["MAT1002", "ECE1003"])
//!     .unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].all_slots, vec!["A1", "TA1", "B1", "TB1"]);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod expansion;
pub mod generator;
pub mod index;
pub mod models;
pub mod normalize;
pub mod overlay;
pub mod scan;
pub mod validation;

pub use error::{Result, TimetableError};
