//! Timetable generator facade.
//!
//! Wires a [`Catalog`], a [`SlotMappingIndex`] and a [`GeneratorConfig`]
//! into the expansion drivers. Course codes are resolved up front, so a
//! missing course fails the whole run before any record is produced;
//! everything after that is local and only shows up in
//! [`GenerationStats`].
//!
//! # Runs
//!
//! | Method | Driver | Seed |
//! |--------|--------|------|
//! | [`Generator::generate`] | staged | empty grid |
//! | [`Generator::augment`] | staged | each base record |
//! | [`Generator::lab_timetables`] | global pairing | none |

use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::{GeneratorConfig, UnknownCodePolicy};
use crate::error::Result;
use crate::expansion::{GenerationStats, GlobalPairing, Stage, StagedExpansion};
use crate::index::SlotMappingIndex;
use crate::models::{Course, TimetableRecord};
use crate::normalize::{Normalizer, TheoryOnly};
use crate::overlay::OverlayEngine;

/// Generation entry point.
///
/// # Example
///
/// ```
/// use u_timetable::catalog::Catalog;
/// use u_timetable::generator::Generator;
/// use u_timetable::index::SlotMappingIndex;
/// use u_timetable::models::{Course, GridLayout};
///
/// let index = SlotMappingIndex::build(&GridLayout::standard());
/// let catalog = Catalog::new(vec![
///     Course::new("PHY1008").with_semester(1).with_degree("ECE")
///         .with_offering("A1+TA1").with_offering("B1+TB1"),
///     Course::new("STS1009").with_offering("A1+TA1").with_offering("C1+TC1"),
/// ]);
///
/// let (records, stats) = Generator::new(&catalog, &index)
///     .generate(&["PHY1008", "STS1009"])
///     .unwrap();
/// // (A1, A1) collides; three combinations remain.
/// assert_eq!(records.len(), 3);
/// assert_eq!(stats.conflicts, 1);
/// assert_eq!(records[0].degree, "ECE");
/// ```
#[derive(Debug, Clone)]
pub struct Generator<'a> {
    catalog: &'a Catalog,
    index: &'a SlotMappingIndex,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a generator with the default configuration.
    pub fn new(catalog: &'a Catalog, index: &'a SlotMappingIndex) -> Self {
        Self {
            catalog,
            index,
            config: GeneratorConfig::default(),
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Overlay engine with the configured unknown-code policy.
    pub fn engine(&self) -> OverlayEngine<'a> {
        OverlayEngine::new(self.index).with_policy(self.config.unknown_code_policy)
    }

    fn normalizer(&self, theory_only: bool) -> Normalizer<'a> {
        let normalizer = Normalizer::new(self.index);
        if theory_only {
            normalizer.with_filter(TheoryOnly::new(self.config.lab_suffix.clone()))
        } else {
            normalizer
        }
    }

    fn stage_for(&self, course: &Course, normalizer: &Normalizer<'_>) -> Stage {
        let stage = Stage::from_course(course, normalizer);

        let mut unknown: Vec<String> = Vec::new();
        for offering in &stage.offerings {
            for code in self.index.unknown_codes(&offering.codes) {
                if !unknown.contains(&code) {
                    unknown.push(code);
                }
            }
        }
        if !unknown.is_empty() {
            match self.config.unknown_code_policy {
                UnknownCodePolicy::Ignore => warn!(
                    course = %course.code,
                    codes = ?unknown,
                    "slot codes missing from index; treated as always free"
                ),
                UnknownCodePolicy::Reject => warn!(
                    course = %course.code,
                    codes = ?unknown,
                    "slot codes missing from index; offerings using them are rejected"
                ),
            }
        }
        if stage.is_empty() {
            warn!(course = %course.code, "course has no usable offerings");
        }
        stage
    }

    /// Resolves `codes` into stages, in the given order.
    ///
    /// # Errors
    /// [`CourseNotFound`](crate::error::TimetableError::CourseNotFound) for
    /// the first code missing from the catalog.
    pub fn stages<S: AsRef<str>>(&self, codes: &[S]) -> Result<Vec<Stage>> {
        let normalizer = self.normalizer(self.config.theory_only);
        Ok(self
            .catalog
            .get_all(codes)?
            .into_iter()
            .map(|course| self.stage_for(course, &normalizer))
            .collect())
    }

    /// Generates every timetable containing one offering of each course,
    /// staged in the given order onto an empty grid.
    ///
    /// Semester and degree come from the first course. With no codes the
    /// empty seed is the only record.
    pub fn generate<S: AsRef<str>>(
        &self,
        codes: &[S],
    ) -> Result<(Vec<TimetableRecord>, GenerationStats)> {
        let stages = self.stages(codes)?;
        let expansion = StagedExpansion::new(self.engine(), &stages);
        let (records, stats) = expansion.expand(expansion.empty_seed()).collect_with_stats();
        info!(
            courses = stages.len(),
            accepted = stats.accepted,
            rejected = stats.rejected(),
            "generation finished"
        );
        Ok((records, stats))
    }

    /// Extends every base record with one offering of each course.
    ///
    /// Unreadable bases (`Err` items) are skipped and counted.
    pub fn augment<I, S>(
        &self,
        bases: I,
        codes: &[S],
    ) -> Result<(Vec<TimetableRecord>, GenerationStats)>
    where
        I: IntoIterator<Item = Result<TimetableRecord>>,
        S: AsRef<str>,
    {
        let stages = self.stages(codes)?;
        let expansion = StagedExpansion::new(self.engine(), &stages);
        Ok(expansion.expand_all(bases).collect_with_stats())
    }

    /// [`augment`](Self::augment) over stored JSON documents.
    pub fn augment_json<'j, I, S>(
        &self,
        documents: I,
        codes: &[S],
    ) -> Result<(Vec<TimetableRecord>, GenerationStats)>
    where
        I: IntoIterator<Item = &'j str>,
        S: AsRef<str>,
    {
        self.augment(documents.into_iter().map(TimetableRecord::from_json), codes)
    }

    /// Every clash-free combination of one offering per lab course.
    ///
    /// Lab courses are the catalog entries whose code ends with the
    /// configured lab suffix, in catalog order. The theory-only filter
    /// does not apply here.
    pub fn lab_timetables(&self) -> (Vec<TimetableRecord>, GenerationStats) {
        let normalizer = self.normalizer(false);
        let stages: Vec<Stage> = self
            .catalog
            .lab_courses(&self.config.lab_suffix)
            .into_iter()
            .map(|course| self.stage_for(course, &normalizer))
            .collect();
        if stages.is_empty() {
            warn!(suffix = %self.config.lab_suffix, "no lab courses in catalog");
        }

        GlobalPairing::new(self.engine(), &stages)
            .with_dedupe(self.config.dedupe_results)
            .iter()
            .collect_with_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimetableError;
    use crate::models::GridLayout;

    fn sample_index() -> SlotMappingIndex {
        SlotMappingIndex::build(&GridLayout::standard())
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            Course::new("PHY1008")
                .with_semester(1)
                .with_degree("ECE")
                .with_offering("A1+TA1")
                .with_offering("a1+ta1")
                .with_offering("B1+TB1"),
            Course::new("ENG1011")
                .with_offering("C2+TC2")
                .with_offering("D2+TDD2")
                .with_offering("E2+TE2L"),
            Course::new("PHY1008L").with_offering("L1+L2").with_offering("L3+L4"),
            Course::new("ENG1011L").with_offering("L1+L2").with_offering("L5+L6"),
        ])
    }

    #[test]
    fn test_generate() {
        let index = sample_index();
        let catalog = sample_catalog();
        let (records, stats) = Generator::new(&catalog, &index)
            .generate(&["PHY1008", "ENG1011"])
            .unwrap();
        // 2 distinct PHY footprints × 3 ENG footprints.
        assert_eq!(records.len(), 6);
        assert_eq!(stats.accepted, 6);
        assert!(records.iter().all(|r| r.semester == 1));
    }

    #[test]
    fn test_theory_only() {
        let index = sample_index();
        let catalog = sample_catalog();
        let config = GeneratorConfig::new().with_theory_only(true);
        let (records, _) = Generator::new(&catalog, &index)
            .with_config(config)
            .generate(&["PHY1008", "ENG1011"])
            .unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_course_not_found_is_fatal() {
        let index = sample_index();
        let catalog = sample_catalog();
        let err = Generator::new(&catalog, &index)
            .generate(&["PHY1008", "CSE2005"])
            .unwrap_err();
        assert!(matches!(err, TimetableError::CourseNotFound { ref code } if code == "CSE2005"));
        assert!(!err.is_local());
    }

    #[test]
    fn test_augment_json_skips_malformed() {
        let index = sample_index();
        let catalog = sample_catalog();
        let generator = Generator::new(&catalog, &index);
        let (bases, _) = generator.generate(&["PHY1008"]).unwrap();
        let good = bases[0].to_json().unwrap();
        let docs = [good.as_str(), r#"{"semester": 1, "grid": {"Monday": []}}"#, "not json"];

        let (records, stats) = generator.augment_json(docs, &["ENG1011"]).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(stats.bases_processed, 1);
        assert_eq!(stats.malformed_bases, 2);
        assert!(records.iter().all(|r| r.has_all_courses(&["PHY1008", "ENG1011"])));
    }

    #[test]
    fn test_augment_json_accepts_stringified_grid() {
        let index = sample_index();
        let catalog = sample_catalog();
        let generator = Generator::new(&catalog, &index);
        let (bases, _) = generator.generate(&["PHY1008"]).unwrap();
        let base = &bases[0];
        let doc = serde_json::json!({
            "semester": base.semester,
            "degree": base.degree,
            "grid": base.grid.to_json().unwrap(),
            "allSlots": base.all_slots,
        })
        .to_string();
        let bad_grid = r#"{"semester": 1, "degree": "ECE", "grid": "oops", "allSlots": []}"#;

        let (records, stats) = generator
            .augment_json([doc.as_str(), bad_grid], &["ENG1011"])
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(stats.bases_processed, 1);
        assert_eq!(stats.malformed_bases, 1);
        assert!(records.iter().all(|r| r.has_all_courses(&["PHY1008", "ENG1011"])));
    }

    #[test]
    fn test_lab_timetables() {
        let index = sample_index();
        let catalog = sample_catalog();
        let (records, stats) = Generator::new(&catalog, &index).lab_timetables();
        assert_eq!(records.len(), 3);
        assert_eq!(stats.conflicts, 1);
        assert!(records
            .iter()
            .all(|r| r.has_all_courses(&["PHY1008L", "ENG1011L"])));
    }

    #[test]
    fn test_reject_policy() {
        let index = sample_index();
        let catalog = Catalog::new(vec![Course::new("CSE2005")
            .with_offering("A1+TA1")
            .with_offering("Q7+TB1")]);
        let config = GeneratorConfig::new().with_unknown_code_policy(UnknownCodePolicy::Reject);
        let (records, stats) = Generator::new(&catalog, &index)
            .with_config(config)
            .generate(&["CSE2005"])
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(stats.unknown_code_rejections, 1);
    }
}
