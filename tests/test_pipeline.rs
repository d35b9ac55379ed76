//! Integration tests: loading, preprocessing, and feature selection

use keiba_predictor::data::{RaceDataLoader, RACE_RESULT_COLUMNS, RESULT_FILES};
use keiba_predictor::features::{FeatureSelector, DEFAULT_FEATURE_COLUMNS};
use keiba_predictor::preprocessing::Preprocessor;
use polars::prelude::*;
use std::io::Write;

/// Write one raw result CSV with the generic header the exports carry,
/// one integer cell per column per row.
fn write_result_csv(dir: &std::path::Path, file_name: &str, rows: usize) {
    let mut file = std::fs::File::create(dir.join(file_name)).unwrap();

    let header: Vec<String> = (0..RACE_RESULT_COLUMNS.len())
        .map(|i| format!("c{}", i))
        .collect();
    writeln!(file, "{}", header.join(",")).unwrap();

    for row in 0..rows {
        let cells: Vec<String> = (0..RACE_RESULT_COLUMNS.len())
            .map(|col| format!("{}", row * 100 + col))
            .collect();
        writeln!(file, "{}", cells.join(",")).unwrap();
    }
}

#[test]
fn test_loader_combines_five_files_with_schema() {
    let dir = tempfile::tempdir().unwrap();
    for file_name in RESULT_FILES {
        write_result_csv(dir.path(), file_name, 1);
    }

    let df = RaceDataLoader::new().load(dir.path()).unwrap();

    assert_eq!(df.height(), 5);
    assert_eq!(df.width(), 65);
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, RACE_RESULT_COLUMNS.to_vec());
}

#[test]
fn test_loader_row_count_is_sum_of_files() {
    let dir = tempfile::tempdir().unwrap();
    let sizes = [3usize, 1, 4, 2, 5];
    for (file_name, rows) in RESULT_FILES.iter().zip(sizes) {
        write_result_csv(dir.path(), file_name, rows);
    }

    let df = RaceDataLoader::new().load(dir.path()).unwrap();
    assert_eq!(df.height(), sizes.iter().sum::<usize>());
}

#[test]
fn test_loader_missing_file_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    // Only the first four files exist
    for file_name in &RESULT_FILES[..4] {
        write_result_csv(dir.path(), file_name, 1);
    }

    assert!(RaceDataLoader::new().load(dir.path()).is_err());
}

#[test]
fn test_preprocess_drops_label_missing_keeps_sentinel_rows() {
    let df = df!(
        "Final Position" => &[None, Some(2i64), Some(3)],
        "Jockey" => &[Some("Take"), None, Some("Ando")],
        "Age" => &[4i64, 5, 6]
    )
    .unwrap();

    let mut pre = Preprocessor::new("Final Position");
    let result = pre.fit_transform(&df).unwrap();

    // Row 0 lost its label; row 1's missing jockey re-encodes via the
    // sentinel category and survives.
    assert_eq!(result.height(), 2);
    for column in result.get_columns() {
        assert_eq!(column.null_count(), 0);
        assert!(column.dtype().is_primitive_numeric());
    }
}

#[test]
fn test_preprocess_drops_rows_with_missing_numerics() {
    let df = df!(
        "Final Position" => &[1i64, 2, 3],
        "Win Odds(100Yen)" => &[Some(2.5f64), None, Some(8.0)]
    )
    .unwrap();

    let mut pre = Preprocessor::new("Final Position");
    let result = pre.fit_transform(&df).unwrap();
    assert_eq!(result.height(), 2);
}

#[test]
fn test_full_preprocess_then_select_keeps_row_alignment() {
    let dir = tempfile::tempdir().unwrap();
    for file_name in RESULT_FILES {
        write_result_csv(dir.path(), file_name, 4);
    }

    let raw = RaceDataLoader::new().load(dir.path()).unwrap();
    let mut pre = Preprocessor::new("Final Position");
    let processed = pre.fit_transform(&raw).unwrap();

    let selector = FeatureSelector::default();
    let features = selector.select(&processed).unwrap();

    assert_eq!(features.height(), processed.height());
    assert_eq!(features.width(), DEFAULT_FEATURE_COLUMNS.len());
    let names: Vec<String> = features
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, DEFAULT_FEATURE_COLUMNS.to_vec());
}

#[test]
fn test_selector_on_empty_frame() {
    let df = df!(
        "a" => &Vec::<i64>::new(),
        "b" => &Vec::<f64>::new()
    )
    .unwrap();

    let selector = FeatureSelector::new(["b".to_string(), "a".to_string()]);
    let result = selector.select(&df).unwrap();

    assert_eq!(result.height(), 0);
    let names: Vec<String> = result
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, vec!["b", "a"]);
}
