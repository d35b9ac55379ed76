//! Cross-validated training with out-of-fold predictions

use ndarray::{Array1, Array2, Axis};
use tracing::info;

use super::cross_validation::CvSplit;
use super::gradient_boosting::{GbmParams, GbmRegressor};
use super::metrics::rmse;
use crate::error::{KeibaError, Result};
use crate::utils::Timer;

/// Result of a cross-validated training run
pub struct CvOutcome {
    /// One out-of-fold prediction per input row
    pub oof_predictions: Array1<f64>,
    /// One fitted model per fold
    pub models: Vec<GbmRegressor>,
    /// Validation RMSE per fold
    pub fold_rmse: Vec<f64>,
    /// RMSE of the full out-of-fold vector against the labels
    pub overall_rmse: f64,
}

/// Train one regressor per fold and collect out-of-fold predictions.
///
/// Each model is fitted fresh on the fold's training subset and predicts the
/// fold's validation subset; predictions land in a shared buffer at the
/// validation indices. The buffer starts as NaN so an index never covered by
/// a validation fold is detectable instead of silently reading as zero.
///
/// Any fold error aborts the whole run.
pub fn train_cv(
    x: &Array2<f64>,
    y: &Array1<f64>,
    splits: &[CvSplit],
    params: &GbmParams,
    log_every: usize,
) -> Result<CvOutcome> {
    if x.nrows() != y.len() {
        return Err(KeibaError::ShapeError {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }

    let mut oof_predictions = Array1::from_elem(y.len(), f64::NAN);
    let mut models = Vec::with_capacity(splits.len());
    let mut fold_rmse = Vec::with_capacity(splits.len());

    for split in splits {
        let x_train = x.select(Axis(0), &split.train_indices);
        let y_train: Array1<f64> =
            Array1::from_vec(split.train_indices.iter().map(|&i| y[i]).collect());
        let x_valid = x.select(Axis(0), &split.valid_indices);
        let y_valid: Array1<f64> =
            Array1::from_vec(split.valid_indices.iter().map(|&i| y[i]).collect());

        let timer = Timer::start(format!("fit fold={}", split.fold_idx));
        let mut model = GbmRegressor::new(params.clone());
        model.fit_with_eval(&x_train, &y_train, Some((&x_valid, &y_valid)), log_every)?;
        timer.stop();

        let predictions = model.predict(&x_valid)?;
        for (pos, &idx) in split.valid_indices.iter().enumerate() {
            oof_predictions[idx] = predictions[pos];
        }

        let score = rmse(&y_valid, &predictions);
        info!("fold {} RMSE: {:.4}", split.fold_idx, score);
        fold_rmse.push(score);
        models.push(model);
    }

    let overall_rmse = rmse(y, &oof_predictions);
    info!("finished | whole RMSE: {:.4}", overall_rmse);

    Ok(CvOutcome {
        oof_predictions,
        models,
        fold_rmse,
        overall_rmse,
    })
}
