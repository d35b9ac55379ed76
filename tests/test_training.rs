//! Integration tests: cross-validated gradient boosting end-to-end

use keiba_predictor::config::PipelineConfig;
use keiba_predictor::preprocessing::Preprocessor;
use keiba_predictor::training::{train_cv, GbmParams, KFold, RegressionMetrics};
use ndarray::{Array1, Array2};
use polars::prelude::*;

fn synthetic_race_frame(n: usize) -> DataFrame {
    let positions: Vec<i64> = (0..n).map(|i| (i % 8) as i64 + 1).collect();
    let odds: Vec<f64> = (0..n).map(|i| 1.5 + (i % 8) as f64 * 2.0).collect();
    let weights: Vec<i64> = (0..n).map(|i| 440 + (i % 10) as i64 * 4).collect();
    let jockeys: Vec<&str> = (0..n)
        .map(|i| ["Take", "Ando", "Fukunaga", "Iwata"][i % 4])
        .collect();

    df!(
        "Final Position" => positions,
        "Win Odds(100Yen)" => odds,
        "Horse Weight" => weights,
        "Jockey" => jockeys
    )
    .unwrap()
}

#[test]
fn test_cross_validated_training_from_dataframe() {
    let df = synthetic_race_frame(80);

    let mut pre = Preprocessor::new("Final Position");
    let processed = pre.fit_transform(&df).unwrap();
    assert_eq!(processed.height(), 80);

    let features = processed
        .select(["Win Odds(100Yen)", "Horse Weight", "Jockey"])
        .unwrap();
    let x = features
        .to_ndarray::<Float64Type>(IndexOrder::C)
        .unwrap();
    let y: Array1<f64> = processed
        .column("Final Position")
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect();

    let splits = KFold::new(5, 71).split(x.nrows()).unwrap();
    let params = GbmParams {
        n_estimators: 20,
        max_depth: 3,
        ..Default::default()
    };

    let outcome = train_cv(&x, &y, &splits, &params, 0).unwrap();

    assert_eq!(outcome.oof_predictions.len(), 80);
    assert!(outcome.oof_predictions.iter().all(|p| !p.is_nan()));

    // Odds track position in this synthetic set, so the model must beat
    // the constant-mean baseline.
    let y_mean = y.mean().unwrap();
    let baseline = RegressionMetrics::compute(&y, &Array1::from_elem(y.len(), y_mean));
    assert!(outcome.overall_rmse < baseline.rmse);
}

#[test]
fn test_ten_rows_five_folds_covers_every_slot() {
    let x = Array2::from_shape_vec((10, 1), (0..10).map(|i| i as f64).collect()).unwrap();
    let y: Array1<f64> = (0..10).map(|i| i as f64 * 2.0).collect();

    let splits = KFold::new(5, 71).split(10).unwrap();
    for split in &splits {
        assert_eq!(split.valid_indices.len(), 2);
    }

    let params = GbmParams {
        n_estimators: 5,
        max_depth: 2,
        min_samples_leaf: 1,
        ..Default::default()
    };
    let outcome = train_cv(&x, &y, &splits, &params, 0).unwrap();

    assert_eq!(outcome.oof_predictions.len(), 10);
    for p in outcome.oof_predictions.iter() {
        assert!(!p.is_nan(), "out-of-fold slot never written");
    }
}

#[test]
fn test_fold_rmse_matches_manual_aggregate() {
    let x = Array2::from_shape_vec((30, 1), (0..30).map(|i| i as f64).collect()).unwrap();
    let y: Array1<f64> = (0..30).map(|i| i as f64).collect();

    let splits = KFold::new(5, 71).split(30).unwrap();
    let params = GbmParams {
        n_estimators: 10,
        max_depth: 2,
        ..Default::default()
    };
    let outcome = train_cv(&x, &y, &splits, &params, 0).unwrap();

    let manual = RegressionMetrics::compute(&y, &outcome.oof_predictions);
    assert!((manual.rmse - outcome.overall_rmse).abs() < 1e-12);
    assert_eq!(outcome.fold_rmse.len(), 5);
}

#[test]
fn test_default_config_describes_original_run() {
    let config = PipelineConfig::default();
    assert_eq!(config.cv_folds, 5);
    assert_eq!(config.seed, 71);
    assert_eq!(config.label_column, "Final Position");
    // Empty hyperparameter mapping means library defaults
    let from_empty: GbmParams = serde_json::from_str("{}").unwrap();
    assert_eq!(from_empty.n_estimators, config.gbm.n_estimators);
}
