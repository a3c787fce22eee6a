//! Property tests for overlay and expansion.

use std::collections::BTreeSet;

use proptest::prelude::*;

use u_timetable::expansion::{GlobalPairing, Stage, StagedExpansion};
use u_timetable::index::SlotMappingIndex;
use u_timetable::models::{Course, GridLayout, TimetableGrid, TimetableRecord};
use u_timetable::normalize::Normalizer;
use u_timetable::overlay::{OverlayEngine, OverlayOutcome};

/// A compound of one to three lab codes from `L1`..`L8`.
///
/// Lab codes each map to exactly one cell of the standard layout, so a
/// footprint identifies its codes.
fn arb_offering() -> impl Strategy<Value = String> {
    prop::collection::btree_set(1u8..=8, 1..=3).prop_map(|codes| {
        codes
            .iter()
            .map(|c| format!("L{c}"))
            .collect::<Vec<_>>()
            .join("+")
    })
}

/// Courses, each a list of offerings.
fn arb_courses() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(arb_offering(), 1..4), 1..5)
}

/// Courses together with a permutation of their indices.
fn arb_courses_and_order() -> impl Strategy<Value = (Vec<Vec<String>>, Vec<usize>)> {
    arb_courses().prop_flat_map(|courses| {
        let order: Vec<usize> = (0..courses.len()).collect();
        (Just(courses), Just(order).prop_shuffle())
    })
}

fn stages(index: &SlotMappingIndex, courses: &[Vec<String>], order: &[usize]) -> Vec<Stage> {
    let normalizer = Normalizer::new(index);
    order
        .iter()
        .map(|&i| {
            let course = courses[i]
                .iter()
                .fold(Course::new(format!("LAB{i}L")), |c, o| c.with_offering(o.as_str()));
            Stage::from_course(&course, &normalizer)
        })
        .collect()
}

fn grids(records: &[TimetableRecord]) -> BTreeSet<String> {
    records.iter().map(|r| r.grid.to_json().unwrap()).collect()
}

proptest! {
    #[test]
    fn prop_pairing_order_independent((courses, order) in arb_courses_and_order()) {
        let index = SlotMappingIndex::build(&GridLayout::standard());
        let engine = OverlayEngine::new(&index);

        let natural: Vec<usize> = (0..courses.len()).collect();
        let forward = stages(&index, &courses, &natural);
        let shuffled = stages(&index, &courses, &order);

        let a: Vec<_> = GlobalPairing::new(engine, &forward).iter().collect();
        let b: Vec<_> = GlobalPairing::new(engine, &shuffled).iter().collect();
        prop_assert_eq!(a.len(), b.len());
        prop_assert_eq!(grids(&a), grids(&b));
    }

    #[test]
    fn prop_staged_matches_pairing(courses in arb_courses()) {
        let index = SlotMappingIndex::build(&GridLayout::standard());
        let engine = OverlayEngine::new(&index);
        let order: Vec<usize> = (0..courses.len()).collect();
        let stages = stages(&index, &courses, &order);

        let staged: Vec<_> = StagedExpansion::new(engine, &stages)
            .expand(TimetableRecord::default())
            .collect();
        let paired: Vec<_> = GlobalPairing::new(engine, &stages)
            .with_dedupe(false)
            .iter()
            .collect();
        prop_assert_eq!(staged.len(), paired.len());
        prop_assert_eq!(grids(&staged), grids(&paired));
    }

    #[test]
    fn prop_all_slots_is_union_of_stages(courses in arb_courses()) {
        let index = SlotMappingIndex::build(&GridLayout::standard());
        let engine = OverlayEngine::new(&index);
        let order: Vec<usize> = (0..courses.len()).collect();
        let stages = stages(&index, &courses, &order);

        for record in StagedExpansion::new(engine, &stages).expand(TimetableRecord::default()) {
            let slots: BTreeSet<&str> = record.all_slots.iter().map(String::as_str).collect();
            prop_assert_eq!(slots.len(), record.all_slots.len());

            let mut expected: BTreeSet<String> = BTreeSet::new();
            for stage in &stages {
                let cells: BTreeSet<_> = record
                    .grid
                    .cells()
                    .filter(|(_, label)| *label == Some(stage.label.as_str()))
                    .map(|(pos, _)| pos)
                    .collect();
                let chosen = stage
                    .offerings
                    .iter()
                    .find(|o| engine.occupied_cells(&o.codes) == cells);
                prop_assert!(chosen.is_some());
                if let Some(offering) = chosen {
                    expected.extend(offering.codes.iter().cloned());
                }
            }
            let expected: BTreeSet<&str> = expected.iter().map(String::as_str).collect();
            prop_assert_eq!(slots, expected);
        }
    }

    #[test]
    fn prop_overlay_is_check_then_write(first in arb_offering(), second in arb_offering()) {
        let index = SlotMappingIndex::build(&GridLayout::standard());
        let engine = OverlayEngine::new(&index);
        let first: Vec<&str> = first.split('+').collect();
        let second: Vec<&str> = second.split('+').collect();

        let grid = engine
            .try_overlay(&TimetableGrid::empty(), &first, "A")
            .unwrap()
            .into_grid()
            .unwrap();
        prop_assert_eq!(grid.occupied_cells(), engine.occupied_cells(&first));

        let before = grid.clone();
        match engine.try_overlay(&grid, &second, "B").unwrap() {
            OverlayOutcome::Placed(next) => {
                let b_cells = engine.occupied_cells(&second);
                prop_assert!(b_cells.iter().all(|&p| next.label_at(p) == Some("B")));
                prop_assert_eq!(next.filled_count(), grid.filled_count() + b_cells.len());
            }
            OverlayOutcome::Conflict { cells } => {
                prop_assert!(!cells.is_empty());
                prop_assert_eq!(&grid, &before);
            }
        }
        prop_assert_eq!(grid, before);
    }
}
