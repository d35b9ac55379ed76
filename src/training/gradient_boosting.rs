//! Gradient boosted regression trees
//!
//! Squared-error boosting: each round fits a regression tree to the current
//! residuals on a row/column subsample and adds its shrunken predictions.

use ndarray::{Array1, Array2, Axis};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::decision_tree::RegressionTree;
use super::metrics::rmse;
use crate::error::{KeibaError, Result};

/// Boosting hyperparameters.
///
/// Deserializable from JSON so a run can supply an arbitrary (possibly
/// empty) parameter mapping; missing fields fall back to these defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GbmParams {
    /// Number of boosting rounds (trees)
    pub n_estimators: usize,
    /// Learning rate (shrinkage)
    pub learning_rate: f64,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples per leaf
    pub min_samples_leaf: usize,
    /// Row subsample ratio per tree
    pub subsample: f64,
    /// Column subsample ratio per tree
    pub colsample_bytree: f64,
    /// Random seed
    pub random_state: Option<u64>,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 6,
            min_samples_leaf: 1,
            subsample: 0.8,
            colsample_bytree: 0.8,
            random_state: Some(42),
        }
    }
}

/// Gradient boosted regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbmRegressor {
    params: GbmParams,
    trees: Vec<RegressionTree>,
    col_indices_per_tree: Vec<Vec<usize>>,
    initial_prediction: f64,
    feature_importances: Vec<f64>,
    is_fitted: bool,
}

impl GbmRegressor {
    pub fn new(params: GbmParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
            col_indices_per_tree: Vec::new(),
            initial_prediction: 0.0,
            feature_importances: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit on the full data, no round logging
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.fit_with_eval(x, y, None, 0)
    }

    /// Fit, logging train/eval RMSE every `log_every` rounds.
    ///
    /// `log_every == 0` disables round logging entirely.
    pub fn fit_with_eval(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        eval_set: Option<(&Array2<f64>, &Array1<f64>)>,
        log_every: usize,
    ) -> Result<()> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(KeibaError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(KeibaError::TrainingError(
                "cannot train on an empty matrix".to_string(),
            ));
        }

        // Baseline is the target mean
        self.initial_prediction = y.mean().unwrap_or(0.0);
        let mut predictions = Array1::from_elem(n_samples, self.initial_prediction);

        let mut eval_predictions = eval_set
            .map(|(x_eval, _)| Array1::from_elem(x_eval.nrows(), self.initial_prediction));

        let mut rng = match self.params.random_state {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        self.trees = Vec::with_capacity(self.params.n_estimators);
        self.col_indices_per_tree = Vec::with_capacity(self.params.n_estimators);
        self.feature_importances = vec![0.0; n_features];

        for round in 0..self.params.n_estimators {
            let residuals: Array1<f64> = y
                .iter()
                .zip(predictions.iter())
                .map(|(yi, pi)| yi - pi)
                .collect();

            let row_indices = self.sample_indices(n_samples, self.params.subsample, &mut rng);
            let col_indices =
                self.sample_indices(n_features, self.params.colsample_bytree, &mut rng);

            let (x_sub, r_sub) = Self::take_subset(x, &residuals, &row_indices, &col_indices);

            let mut tree = RegressionTree::new()
                .with_max_depth(self.params.max_depth)
                .with_min_samples_leaf(self.params.min_samples_leaf);
            tree.fit(&x_sub, &r_sub)?;

            // Update running predictions on all rows, not just the subsample
            let x_cols = x.select(Axis(1), &col_indices);
            let tree_pred = tree.predict(&x_cols)?;
            for i in 0..n_samples {
                predictions[i] += self.params.learning_rate * tree_pred[i];
            }

            if let (Some((x_eval, _)), Some(eval_preds)) = (eval_set, eval_predictions.as_mut()) {
                let x_eval_cols = x_eval.select(Axis(1), &col_indices);
                let eval_tree_pred = tree.predict(&x_eval_cols)?;
                for i in 0..eval_preds.len() {
                    eval_preds[i] += self.params.learning_rate * eval_tree_pred[i];
                }
            }

            if log_every > 0 && (round + 1) % log_every == 0 {
                let train_rmse = rmse(y, &predictions);
                match (eval_set, eval_predictions.as_ref()) {
                    (Some((_, y_eval)), Some(eval_preds)) => {
                        info!(
                            "round {:>4}: train rmse {:.4}, eval rmse {:.4}",
                            round + 1,
                            train_rmse,
                            rmse(y_eval, eval_preds)
                        );
                    }
                    _ => info!("round {:>4}: train rmse {:.4}", round + 1, train_rmse),
                }
            }

            if let Some(tree_importance) = tree.feature_importances() {
                for (j, &col_idx) in col_indices.iter().enumerate() {
                    self.feature_importances[col_idx] += tree_importance[j];
                }
            }

            self.trees.push(tree);
            self.col_indices_per_tree.push(col_indices);
        }

        let total: f64 = self.feature_importances.iter().sum();
        if total > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= total;
            }
        }

        self.is_fitted = true;
        Ok(())
    }

    /// Predict for a batch of rows
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(KeibaError::ModelNotFitted);
        }

        let n = x.nrows();
        let mut predictions = Array1::from_elem(n, self.initial_prediction);

        for (tree, col_indices) in self.trees.iter().zip(self.col_indices_per_tree.iter()) {
            let x_sub = x.select(Axis(1), col_indices);
            let tree_pred = tree.predict(&x_sub)?;
            for i in 0..n {
                predictions[i] += self.params.learning_rate * tree_pred[i];
            }
        }

        Ok(predictions)
    }

    /// Aggregated impurity-based feature importances
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// Number of fitted trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn sample_indices(
        &self,
        n: usize,
        ratio: f64,
        rng: &mut Xoshiro256PlusPlus,
    ) -> Vec<usize> {
        let sample_size = ((n as f64) * ratio).ceil().max(1.0) as usize;
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);
        indices.truncate(sample_size.min(n));
        indices.sort_unstable();
        indices
    }

    fn take_subset(
        x: &Array2<f64>,
        y: &Array1<f64>,
        row_indices: &[usize],
        col_indices: &[usize],
    ) -> (Array2<f64>, Array1<f64>) {
        let x_rows = x.select(Axis(0), row_indices);
        let x_sub = x_rows.select(Axis(1), col_indices);
        let y_sub: Array1<f64> = Array1::from_vec(row_indices.iter().map(|&i| y[i]).collect());
        (x_sub, y_sub)
    }
}
