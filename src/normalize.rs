//! Slot combination normalizer.
//!
//! Courses list many offerings that differ only by faculty or venue. For
//! grid occupancy those are interchangeable, so the normalizer collapses
//! offerings with the same canonical signature (normalized codes, sorted,
//! joined by `+`) into a single [`Offering`], keeping first-seen order.
//!
//! Unlike a plain dedup, every collapsed offering is retained in
//! [`Offering::variants`], so callers can still answer "which sections
//! produce this footprint?".
//!
//! An optional [`ComboFilter`] removes offerings before canonicalization,
//! e.g. [`TheoryOnly`] to drop lab variants.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::index::SlotMappingIndex;
use crate::models::{has_suffix_ignore_case, split_codes, SlotCombination, COMBO_SEPARATOR};

/// Canonical, order-independent signature of an offering's codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalSlotSet(String);

impl CanonicalSlotSet {
    /// Builds a signature from already-normalized codes.
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Self {
        let mut sorted: Vec<&str> = codes.iter().map(AsRef::as_ref).collect();
        sorted.sort_unstable();
        sorted.dedup();
        let separator = COMBO_SEPARATOR.to_string();
        Self(sorted.join(separator.as_str()))
    }

    /// The signature text, e.g. `"A1+TA1"`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalSlotSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A distinct occupancy footprint of a course and the offerings producing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    /// Canonical signature.
    pub signature: CanonicalSlotSet,
    /// Normalized codes in the representative's listed order.
    pub codes: Vec<String>,
    /// Offerings sharing this signature; the first is the representative.
    pub variants: Vec<SlotCombination>,
}

impl Offering {
    /// The first-seen offering with this footprint.
    ///
    /// `None` only for hand-built offerings with no variants; [`Normalizer::dedupe`]
    /// never produces one.
    pub fn representative(&self) -> Option<&SlotCombination> {
        self.variants.first()
    }
}

/// A caller-supplied predicate deciding which offerings are considered.
pub trait ComboFilter: Send + Sync + Debug {
    /// Filter name, for logging.
    fn name(&self) -> &'static str;

    /// Whether `combo` should be kept.
    fn accept(&self, combo: &SlotCombination) -> bool;
}

/// Keeps only theory offerings: drops any offering with a slot code
/// ending in the lab suffix.
#[derive(Debug, Clone)]
pub struct TheoryOnly {
    suffix: String,
}

impl TheoryOnly {
    /// Creates the filter for a lab suffix such as `"L"`.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl ComboFilter for TheoryOnly {
    fn name(&self) -> &'static str {
        "theory-only"
    }

    fn accept(&self, combo: &SlotCombination) -> bool {
        !combo
            .codes()
            .iter()
            .any(|c| has_suffix_ignore_case(c, &self.suffix))
    }
}

/// Adapts a closure into a [`ComboFilter`].
pub struct PredicateFilter<F> {
    name: &'static str,
    predicate: F,
}

impl<F> PredicateFilter<F>
where
    F: Fn(&SlotCombination) -> bool + Send + Sync,
{
    /// Wraps `predicate` under `name`.
    pub fn new(name: &'static str, predicate: F) -> Self {
        Self { name, predicate }
    }
}

impl<F> Debug for PredicateFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFilter")
            .field("name", &self.name)
            .finish()
    }
}

impl<F> ComboFilter for PredicateFilter<F>
where
    F: Fn(&SlotCombination) -> bool + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn accept(&self, combo: &SlotCombination) -> bool {
        (self.predicate)(combo)
    }
}

/// Canonicalizes and deduplicates a course's offerings.
///
/// # Example
/// ```
/// use u_timetable::index::SlotMappingIndex;
/// use u_timetable::models::{GridLayout, SlotCombination};
/// use u_timetable::normalize::Normalizer;
///
/// let index = SlotMappingIndex::build(&GridLayout::standard());
/// let offerings = Normalizer::new(&index).dedupe(&[
///     SlotCombination::new(1, "A1+TA1").with_faculty("Mani"),
///     SlotCombination::new(2, "ta1+a1").with_faculty("Mamatha"),
///     SlotCombination::new(3, "B1+TB1"),
/// ]);
/// assert_eq!(offerings.len(), 2);
/// assert_eq!(offerings[0].variants.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Normalizer<'a> {
    index: &'a SlotMappingIndex,
    filters: Vec<Arc<dyn ComboFilter>>,
}

impl<'a> Normalizer<'a> {
    /// Creates a normalizer with no filters.
    pub fn new(index: &'a SlotMappingIndex) -> Self {
        Self {
            index,
            filters: Vec::new(),
        }
    }

    /// Adds a filter; an offering is kept only if every filter accepts it.
    pub fn with_filter<F: ComboFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Normalized codes of an offering, in listed order.
    pub fn codes(&self, combo: &SlotCombination) -> Vec<String> {
        split_codes(&combo.slot_code)
            .into_iter()
            .map(|c| self.index.normalize(c))
            .collect()
    }

    /// Canonical signature of an offering.
    pub fn signature(&self, combo: &SlotCombination) -> CanonicalSlotSet {
        CanonicalSlotSet::from_codes(&self.codes(combo))
    }

    /// Whether every filter accepts `combo`.
    pub fn accepts(&self, combo: &SlotCombination) -> bool {
        self.filters.iter().all(|f| f.accept(combo))
    }

    /// Filters, canonicalizes and deduplicates `combos`, preserving
    /// first-seen order. Offerings with no codes are dropped.
    pub fn dedupe(&self, combos: &[SlotCombination]) -> Vec<Offering> {
        let mut offerings: Vec<Offering> = Vec::new();
        let mut slot_of: HashMap<CanonicalSlotSet, usize> = HashMap::new();

        for combo in combos.iter().filter(|c| self.accepts(c)) {
            let codes = self.codes(combo);
            if codes.is_empty() {
                continue;
            }
            let signature = CanonicalSlotSet::from_codes(&codes);
            match slot_of.get(&signature) {
                Some(&i) => offerings[i].variants.push(combo.clone()),
                None => {
                    slot_of.insert(signature.clone(), offerings.len());
                    offerings.push(Offering {
                        signature,
                        codes,
                        variants: vec![combo.clone()],
                    });
                }
            }
        }
        offerings
    }
}
