//! End-to-end scenarios on the public API.

use u_timetable::catalog::Catalog;
use u_timetable::config::GeneratorConfig;
use u_timetable::expansion::{Stage, StagedExpansion};
use u_timetable::generator::Generator;
use u_timetable::index::SlotMappingIndex;
use u_timetable::models::{
    CellPosition, Course, Day, GridLayout, SlotCombination, TimetableGrid, TimetableRecord,
};
use u_timetable::normalize::Normalizer;
use u_timetable::overlay::{OverlayEngine, OverlayOutcome};
use u_timetable::scan::{retain_complete, scan_records};
use u_timetable::validation::{validate_catalog, validate_layout};
use u_timetable::TimetableError;

fn monday_layout() -> GridLayout {
    GridLayout::empty()
        .with_cell(Day::Monday, 1, "TA1/L2")
        .with_cell(Day::Monday, 2, "TB1/L3")
        .with_lunch_column(6)
}

#[test]
fn test_standard_index_round_trip() {
    let layout = GridLayout::standard();
    let index = SlotMappingIndex::build(&layout);

    // Every code in the layout is indexed at its cell.
    for (day, row) in layout.rows() {
        for (column, cell) in row.iter().enumerate() {
            for code in cell.codes() {
                let positions = index.positions(code).unwrap();
                assert!(positions.contains(&CellPosition::new(day, column)), "{code}");
            }
        }
    }

    // Every indexed position traces back to its code.
    for code in index.codes() {
        for pos in index.positions(code).unwrap() {
            let cell = &layout.row(pos.day)[pos.column];
            assert!(
                cell.codes().iter().any(|c| layout.normalize_code(c) == code),
                "{code} at {pos}"
            );
        }
    }

    assert!(!index.contains("LUNCH"));
    assert!(validate_layout(&layout).is_ok());
}

#[test]
fn test_overlay_then_conflict() {
    let index = SlotMappingIndex::build(&monday_layout());
    let engine = OverlayEngine::new(&index);

    let grid = engine
        .try_overlay(&TimetableGrid::empty(), &["TA1", "TB1"], "X")
        .unwrap()
        .into_grid()
        .unwrap();
    assert_eq!(grid.row(Day::Monday)[1], "X");
    assert_eq!(grid.row(Day::Monday)[2], "X");

    let outcome = engine.try_overlay(&grid, &["L2"], "Y").unwrap();
    assert!(matches!(outcome, OverlayOutcome::Conflict { .. }));

    let normalizer = Normalizer::new(&index);
    let stages = vec![
        Stage::from_course(&Course::new("X").with_offering("TA1+TB1"), &normalizer),
        Stage::from_course(&Course::new("Y").with_offering("L2"), &normalizer),
    ];
    let records: Vec<_> = StagedExpansion::new(engine, &stages)
        .expand(TimetableRecord::default())
        .collect();
    assert!(records.is_empty());
}

#[test]
fn test_case_variants_share_one_offering() {
    let index = SlotMappingIndex::build(&GridLayout::standard());
    let offerings = Normalizer::new(&index).dedupe(&[
        SlotCombination::new(1, "A1+TA1"),
        SlotCombination::new(2, "a1+ta1"),
    ]);
    assert_eq!(offerings.len(), 1);
}

#[test]
fn test_two_by_three_cross_product() {
    let index = SlotMappingIndex::build(&GridLayout::standard());
    let catalog = Catalog::new(vec![
        Course::new("MAT1002")
            .with_offering("A1+TA1")
            .with_offering("B1+TB1"),
        Course::new("ECE1003")
            .with_offering("C2+TC2")
            .with_offering("D2+TDD2")
            .with_offering("F2+TFF2"),
    ]);

    let (records, stats) = Generator::new(&catalog, &index)
        .generate(&["MAT1002", "ECE1003"])
        .unwrap();
    assert_eq!(records.len(), 6);
    assert_eq!(stats.conflicts, 0);
    for r in &records {
        assert!(r.has_all_courses(&["MAT1002", "ECE1003"]));
        assert_eq!(r.all_slots.len(), 4);
    }
}

#[test]
fn test_missing_course_aborts_run() {
    let index = SlotMappingIndex::build(&GridLayout::standard());
    let catalog = Catalog::new(vec![Course::new("MAT1002").with_offering("A1+TA1")]);

    let err = Generator::new(&catalog, &index)
        .generate(&["MAT1002", "PHY1008"])
        .unwrap_err();
    assert!(matches!(err, TimetableError::CourseNotFound { .. }));
}

#[test]
fn test_dataset_pipeline() {
    let index = SlotMappingIndex::build(&GridLayout::standard());
    let catalog = Catalog::from_json(
        r#"[
            {"code": "MAT1002", "semester": 2, "degree": "ECE",
             "slotCombos": [{"id": 1, "slotCode": "A1+TA1"}, {"id": 2, "slotCode": "B1+TB1"}]},
            {"code": "ENG1011", "semester": 2, "degree": "ECE",
             "slotCombos": [{"id": 1, "slotCode": "TA1+A1", "faculty": "Mani"},
                            {"id": 2, "slotCode": "C1+TC1"}]},
            {"code": "ENG1011L", "semester": 2, "degree": "ECE",
             "slotCombos": [{"id": 1, "slotCode": "L31+L32"}]}
        ]"#,
    )
    .unwrap();
    assert!(validate_catalog(catalog.courses(), &index, "L").is_ok());

    let generator = Generator::new(&catalog, &index).with_config(GeneratorConfig::new());
    let (theory, _) = generator.generate(&["MAT1002", "ENG1011"]).unwrap();
    // (A1, A1) collides.
    assert_eq!(theory.len(), 3);

    // Persist and reload, with one corrupted document.
    let mut documents: Vec<String> = theory.iter().map(|r| r.to_json().unwrap()).collect();
    documents.push(r#"{"semester": 2, "degree": "ECE", "grid": "oops", "allSlots": []}"#.into());

    let (mut full, stats) = generator
        .augment_json(documents.iter().map(String::as_str), &["ENG1011L"])
        .unwrap();
    assert_eq!(full.len(), 3);
    assert_eq!(stats.malformed_bases, 1);

    let report = scan_records(&full, &["MAT1002", "ENG1011"], "ENG1011L");
    assert_eq!(report.eligible, 3);
    assert_eq!(report.with_target, 3);

    assert_eq!(retain_complete(&mut full, &["MAT1002", "ENG1011"], Some("L")), 0);
}
