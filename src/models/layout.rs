//! Weekly grid layout.
//!
//! The layout is the canonical weekly structure: six teaching days with
//! thirteen periods each. Every cell lists the slot codes that may occupy
//! it (a theory slot and a lab slot frequently share a period), or is the
//! non-schedulable lunch break.
//!
//! The layout is immutable once built and is the sole input to
//! [`SlotMappingIndex::build`](crate::index::SlotMappingIndex::build).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of periods (columns) per day.
pub const COLUMNS_PER_DAY: usize = 13;

/// Separator between alternative codes inside one layout cell.
pub const ALTERNATIVE_SEPARATOR: char = '/';

/// Normalized sentinel for the non-schedulable column.
pub const LUNCH: &str = "LUNCH";

/// Display labels for the thirteen columns.
const TIME_LABELS: [&str; COLUMNS_PER_DAY] = [
    "08:00-08:50",
    "09:00-09:50",
    "10:00-10:50",
    "11:00-11:50",
    "12:00-12:50",
    "13:00-13:50",
    "Lunch",
    "14:00-14:50",
    "15:00-15:50",
    "16:00-16:50",
    "17:00-17:50",
    "18:00-18:50",
    "19:00-19:30",
];

/// A teaching day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// All days in week order.
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Position of the day within the week (Monday = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day name as used in stored grids ("Monday", ...).
    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }

    /// Parses a day name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Day> {
        let name = name.trim();
        Day::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A (day, column) coordinate in the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPosition {
    /// Day of the week.
    pub day: Day,
    /// Zero-based column index (< [`COLUMNS_PER_DAY`]).
    pub column: usize,
}

impl CellPosition {
    /// Creates a position.
    pub fn new(day: Day, column: usize) -> Self {
        Self { day, column }
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day, self.column)
    }
}

/// Content of one layout cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellDescriptor {
    /// Alternative slot codes that share this period (raw spelling).
    Slots(Vec<String>),
    /// Lunch break; never receives a course.
    NonSchedulable,
}

impl CellDescriptor {
    /// Parses a `/`-delimited cell such as `"B1/L8/SC2"` or `"Lunch"`.
    ///
    /// Empty parts are dropped. A cell whose only codes are the lunch
    /// sentinel becomes [`CellDescriptor::NonSchedulable`].
    pub fn parse(raw: &str) -> Self {
        let codes: Vec<String> = raw
            .split(ALTERNATIVE_SEPARATOR)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect();

        if !codes.is_empty() && codes.iter().all(|c| c.eq_ignore_ascii_case(LUNCH)) {
            CellDescriptor::NonSchedulable
        } else {
            CellDescriptor::Slots(codes)
        }
    }

    /// Codes listed in this cell (empty for lunch).
    pub fn codes(&self) -> &[String] {
        match self {
            CellDescriptor::Slots(codes) => codes,
            CellDescriptor::NonSchedulable => &[],
        }
    }

    /// Whether a course may ever be placed in this cell.
    pub fn is_schedulable(&self) -> bool {
        matches!(self, CellDescriptor::Slots(_))
    }
}

/// The weekly grid layout: day → 13 cell descriptors, plus code aliases.
///
/// # Example
/// ```
/// use u_timetable::models::{CellDescriptor, Day, GridLayout};
///
/// let layout = GridLayout::standard();
/// assert_eq!(layout.row(Day::Monday)[6], CellDescriptor::NonSchedulable);
/// assert_eq!(layout.normalize_code(" tddi "), "TDD1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    rows: BTreeMap<Day, Vec<CellDescriptor>>,
    /// Normalized alias → normalized canonical code.
    aliases: BTreeMap<String, String>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::empty()
    }
}

impl GridLayout {
    /// Creates a layout where every cell is schedulable but lists no codes.
    pub fn empty() -> Self {
        let rows = Day::ALL
            .into_iter()
            .map(|d| (d, vec![CellDescriptor::Slots(Vec::new()); COLUMNS_PER_DAY]))
            .collect();
        Self {
            rows,
            aliases: BTreeMap::new(),
        }
    }

    /// The standard six-day, thirteen-period layout with lunch at column 6.
    ///
    /// Tuesday's first period is historically spelled `TDDI`; it is kept
    /// verbatim and aliased to `TDD1`.
    pub fn standard() -> Self {
        const ROWS: [(Day, [&str; COLUMNS_PER_DAY]); 6] = [
            (
                Day::Monday,
                [
                    "L1", "TA1/L2", "TB1/L3", "E1/L4", "E1/L5", "L6", "Lunch", "TA2/L37",
                    "TB2/L38", "E2/L39", "E2/L40", "L41", "L42",
                ],
            ),
            (
                Day::Tuesday,
                [
                    "TDDI/L7", "B1/L8/SC2", "G1/L9/TE1", "A1/L10/SF2", "F1/L11", "L12", "Lunch",
                    "B2/L43/SC1", "G2/L44/TE2", "A2/L45/SF1", "F2/L46", "TFF2/L47", "L48",
                ],
            ),
            (
                Day::Wednesday,
                [
                    "TEE1/L13", "G1/L14/TF1", "A1/L15/SE2", "C1/L16", "B1/L17/SD2", "L18",
                    "Lunch", "G2/L49/TF2", "A2/L50/SE1", "C2/L51", "B2/L52/SD1", "TDD2/L53",
                    "L54",
                ],
            ),
            (
                Day::Thursday,
                [
                    "TG1/L19", "C1/L20", "D1/L21", "A1/L22/SB2", "F1/L23", "L24", "Lunch",
                    "C2/L55", "D2/L56", "A2/L57/SB1", "F2/L58", "TEE2/L59", "L60",
                ],
            ),
            (
                Day::Friday,
                [
                    "TFF1/L25", "B1/L26/SA2", "TC1/L27", "E1/L28", "D1/L29", "L30", "Lunch",
                    "B2/L61/SA1", "TC2/L62", "E2/L63", "D2/L64", "TG2/L65", "L66",
                ],
            ),
            (
                Day::Saturday,
                [
                    "L31", "G1/L32/TD1", "D1/L33", "F1/L34", "C1/L35", "L36", "Lunch",
                    "G2/L67/TD2", "D2/L68", "F2/L69", "C2/L70", "L71", "L72",
                ],
            ),
        ];

        ROWS.iter()
            .fold(Self::empty(), |layout, (day, cells)| layout.with_row(*day, cells))
            .with_alias("TDDI", "TDD1")
    }

    /// Replaces a full day row.
    ///
    /// # Panics
    /// Panics if `cells` does not contain exactly [`COLUMNS_PER_DAY`] entries.
    pub fn with_row(mut self, day: Day, cells: &[&str]) -> Self {
        assert_eq!(
            cells.len(),
            COLUMNS_PER_DAY,
            "{day} row must have {COLUMNS_PER_DAY} cells"
        );
        self.rows
            .insert(day, cells.iter().map(|c| CellDescriptor::parse(c)).collect());
        self
    }

    /// Replaces a single cell.
    ///
    /// # Panics
    /// Panics if `column >= COLUMNS_PER_DAY`.
    pub fn with_cell(mut self, day: Day, column: usize, raw: &str) -> Self {
        assert!(
            column < COLUMNS_PER_DAY,
            "column {column} out of range for {day}"
        );
        let row = self
            .rows
            .entry(day)
            .or_insert_with(|| vec![CellDescriptor::Slots(Vec::new()); COLUMNS_PER_DAY]);
        row[column] = CellDescriptor::parse(raw);
        self
    }

    /// Marks `column` as non-schedulable on every day.
    pub fn with_lunch_column(self, column: usize) -> Self {
        Day::ALL
            .into_iter()
            .fold(self, |layout, day| layout.with_cell(day, column, "Lunch"))
    }

    /// Registers an alternate spelling for a slot code.
    pub fn with_alias(mut self, alias: &str, canonical: &str) -> Self {
        self.aliases
            .insert(alias.trim().to_ascii_uppercase(), canonical.trim().to_ascii_uppercase());
        self
    }

    /// Cells of a day, in column order. Empty if the day is not defined.
    pub fn row(&self, day: Day) -> &[CellDescriptor] {
        self.rows.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over defined days and their rows, in week order.
    pub fn rows(&self) -> impl Iterator<Item = (Day, &[CellDescriptor])> {
        self.rows.iter().map(|(d, r)| (*d, r.as_slice()))
    }

    /// Normalizes a slot code: trim, uppercase, resolve aliases.
    pub fn normalize_code(&self, raw: &str) -> String {
        normalize_with(&self.aliases, raw)
    }

    /// Registered aliases (normalized alias → normalized canonical).
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Column display labels ("08:00-08:50", ..., "Lunch", ...).
    pub fn time_labels() -> &'static [&'static str] {
        &TIME_LABELS
    }
}

/// Shared normalization used by the layout and the slot mapping index.
pub(crate) fn normalize_with(aliases: &BTreeMap<String, String>, raw: &str) -> String {
    let upper = raw.trim().to_ascii_uppercase();
    match aliases.get(&upper) {
        Some(canonical) => canonical.clone(),
        None => upper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parse() {
        assert_eq!(
            CellDescriptor::parse("B1/L8/SC2"),
            CellDescriptor::Slots(vec!["B1".into(), "L8".into(), "SC2".into()])
        );
        assert_eq!(CellDescriptor::parse("Lunch"), CellDescriptor::NonSchedulable);
        assert_eq!(CellDescriptor::parse(" lunch "), CellDescriptor::NonSchedulable);
        assert_eq!(CellDescriptor::parse(""), CellDescriptor::Slots(vec![]));
        assert_eq!(
            CellDescriptor::parse("TA1 / "),
            CellDescriptor::Slots(vec!["TA1".into()])
        );
    }

    #[test]
    fn test_standard_shape() {
        let layout = GridLayout::standard();
        for day in Day::ALL {
            let row = layout.row(day);
            assert_eq!(row.len(), COLUMNS_PER_DAY);
            assert!(!row[6].is_schedulable(), "{day} lunch");
            assert_eq!(row.iter().filter(|c| !c.is_schedulable()).count(), 1);
        }
        assert_eq!(layout.row(Day::Tuesday)[0].codes(), ["TDDI", "L7"]);
    }

    #[test]
    fn test_normalize_code() {
        let layout = GridLayout::standard();
        assert_eq!(layout.normalize_code("ta1"), "TA1");
        assert_eq!(layout.normalize_code(" TddI"), "TDD1");
        assert_eq!(layout.normalize_code("TDD1"), "TDD1");
    }

    #[test]
    fn test_with_cell_and_lunch() {
        let layout = GridLayout::empty()
            .with_cell(Day::Monday, 1, "TA1/L2")
            .with_lunch_column(6);
        assert_eq!(layout.row(Day::Monday)[1].codes(), ["TA1", "L2"]);
        assert!(!layout.row(Day::Saturday)[6].is_schedulable());
        assert!(layout.row(Day::Saturday)[5].is_schedulable());
    }

    #[test]
    #[should_panic(expected = "column 13 out of range for Tuesday")]
    fn test_with_cell_rejects_out_of_range_column() {
        let _ = GridLayout::empty().with_cell(Day::Tuesday, COLUMNS_PER_DAY, "A1");
    }

    #[test]
    fn test_day_names() {
        assert_eq!(Day::from_name("wednesday"), Some(Day::Wednesday));
        assert_eq!(Day::from_name("Sunday"), None);
        assert_eq!(Day::Friday.index(), 4);
        assert_eq!(CellPosition::new(Day::Monday, 3).to_string(), "Monday-3");
    }

    #[test]
    fn test_time_labels() {
        let labels = GridLayout::time_labels();
        assert_eq!(labels.len(), COLUMNS_PER_DAY);
        assert_eq!(labels[6], "Lunch");
    }
}
