//! Integration tests for creditviz-data crate.
//!
//! These tests read the bundled workbook fixture end to end.

use creditviz_common::{CreditVizError, Record, RegionSummary};
use creditviz_data::{LoaderOptions, SheetLoader, SummaryPipeline};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_load_projects_sheet() {
    let records = SheetLoader::default()
        .load(fixture("registry_sample.xlsx"))
        .unwrap();

    assert_eq!(
        records,
        vec![
            Record::new("Africa", "Kenya", Some(100.0), Some(50.0)),
            Record::new("Africa", "Uganda", Some(200.0), Some(0.0)),
            Record::new("Asia", "India", Some(300.0), Some(100.0)),
            Record::new("Asia", "China", Some(1000.0), None),
            Record::new("Europe", "Turkey", None, None),
        ]
    );
}

#[test]
fn test_pipeline_over_workbook() {
    let aggregation = SummaryPipeline::default()
        .run_file(fixture("registry_sample.xlsx"))
        .unwrap();

    assert_eq!(aggregation.kept, 3);
    assert_eq!(aggregation.dropped, 2);

    let mut africa = RegionSummary::new("Africa", 300.0, 50.0);
    africa.top_issued = Some("Uganda, Kenya".to_string());
    africa.top_remaining = Some("Kenya, Uganda".to_string());
    let mut asia = RegionSummary::new("Asia", 300.0, 100.0);
    asia.top_issued = Some("China, India".to_string());
    asia.top_remaining = Some("India".to_string());

    assert_eq!(aggregation.summaries, vec![africa, asia]);
}

#[test]
fn test_missing_sheet() {
    let loader = SheetLoader::new(LoaderOptions {
        sheet: "Projects".to_string(),
        ..LoaderOptions::default()
    });

    match loader.load(fixture("registry_sample.xlsx")) {
        Err(CreditVizError::SheetNotFound { sheet, available }) => {
            assert_eq!(sheet, "Projects");
            assert_eq!(available, vec!["README", "PROJECTS"]);
        }
        other => panic!("expected SheetNotFound, got {other:?}"),
    }
}

#[test]
fn test_unknown_column_name() {
    let mut options = LoaderOptions::default();
    options.columns.remaining = "Total Credits Buffered".to_string();

    match SheetLoader::new(options).load(fixture("registry_sample.xlsx")) {
        Err(CreditVizError::SchemaMismatch { missing, found }) => {
            assert_eq!(missing, vec!["Total Credits Buffered"]);
            assert!(found.contains(&"Region".to_string()));
            assert!(!found.contains(&"Notes".to_string()));
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn test_wrong_skip_rows() {
    let loader = SheetLoader::new(LoaderOptions {
        skip_rows: 1,
        ..LoaderOptions::default()
    });
    let result = loader.load(fixture("registry_sample.xlsx"));
    assert!(matches!(result, Err(CreditVizError::SchemaMismatch { .. })));
}

#[test]
fn test_unreadable_sources() {
    let loader = SheetLoader::default();

    let missing = loader.load(fixture("no_such_file.xlsx"));
    assert!(matches!(missing, Err(CreditVizError::SourceNotFound { .. })));

    let corrupt = loader.load(fixture("not_a_workbook.xlsx"));
    assert!(matches!(corrupt, Err(CreditVizError::SourceNotFound { .. })));
}

#[test]
fn test_summaries_export_as_json() {
    let aggregation = SummaryPipeline::default()
        .run_file(fixture("registry_sample.xlsx"))
        .unwrap();

    let json = serde_json::to_string(&aggregation.summaries).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["region"], "Africa");
    assert_eq!(value[0]["top_issued"], "Uganda, Kenya");
    assert_eq!(value[1]["issued"], 300.0);

    let restored: Vec<RegionSummary> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, aggregation.summaries);
}
