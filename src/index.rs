//! Slot mapping index.
//!
//! Derived once from a [`GridLayout`]: maps every normalized slot code to
//! the ordered list of cells it occupies. A code may repeat across the
//! week (several positions) and a cell may be reachable through several
//! alternative codes.
//!
//! The index is an ordinary immutable value. Build it during start-up and
//! pass it by reference to the overlay engine and the expansion drivers;
//! it is `Send + Sync`, so concurrent readers need no locking.
//!
//! # Complexity
//! Build: O(days × columns × codes per cell). Lookup: O(1) average.

use std::collections::{BTreeMap, HashMap};

use crate::models::{normalize_with, CellPosition, GridLayout, LUNCH};

/// Normalized slot code → cells it occupies.
#[derive(Debug, Clone, Default)]
pub struct SlotMappingIndex {
    positions: HashMap<String, Vec<CellPosition>>,
    aliases: BTreeMap<String, String>,
}

impl SlotMappingIndex {
    /// Builds the index from a layout.
    ///
    /// # Algorithm
    /// For each day and column, normalize every alternative code in the
    /// cell and append the position to that code's list, skipping the
    /// lunch sentinel. Positions are appended in (day, column) order.
    pub fn build(layout: &GridLayout) -> Self {
        let mut positions: HashMap<String, Vec<CellPosition>> = HashMap::new();

        for (day, row) in layout.rows() {
            for (column, cell) in row.iter().enumerate() {
                for raw in cell.codes() {
                    let code = layout.normalize_code(raw);
                    if code.is_empty() || code == LUNCH {
                        continue;
                    }
                    let list = positions.entry(code).or_default();
                    let pos = CellPosition::new(day, column);
                    if !list.contains(&pos) {
                        list.push(pos);
                    }
                }
            }
        }

        Self {
            positions,
            aliases: layout.aliases().clone(),
        }
    }

    /// Normalizes a code the same way the index keys were normalized.
    pub fn normalize(&self, raw: &str) -> String {
        normalize_with(&self.aliases, raw)
    }

    /// Positions occupied by `code` (any spelling), or `None` if unmapped.
    pub fn positions(&self, code: &str) -> Option<&[CellPosition]> {
        self.positions.get(&self.normalize(code)).map(Vec::as_slice)
    }

    /// Whether `code` is mapped to at least one cell.
    pub fn contains(&self, code: &str) -> bool {
        self.positions(code).is_some()
    }

    /// All indexed codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.positions.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Codes in `codes` that have no index entry (normalized).
    pub fn unknown_codes<S: AsRef<str>>(&self, codes: &[S]) -> Vec<String> {
        codes
            .iter()
            .map(|c| self.normalize(c.as_ref()))
            .filter(|c| !self.positions.contains_key(c))
            .collect()
    }

    /// Number of indexed codes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl From<&GridLayout> for SlotMappingIndex {
    fn from(layout: &GridLayout) -> Self {
        Self::build(layout)
    }
}
