//! Run configuration
//!
//! Everything the upstream notebook hardcoded is configuration here, with
//! defaults reproducing the original run exactly: label `"Final Position"`,
//! 5 shuffled folds seeded with 71, default boosting parameters, evaluation
//! logging every 100 rounds.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::features::DEFAULT_FEATURE_COLUMNS;
use crate::training::GbmParams;

/// Full pipeline configuration, loadable from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Target column name
    pub label_column: String,
    /// Feature allow-list, in projection order
    pub feature_columns: Vec<String>,
    /// Number of cross-validation folds
    pub cv_folds: usize,
    /// Shuffle seed for the fold split
    pub seed: u64,
    /// Boosting hyperparameters
    pub gbm: GbmParams,
    /// Log train/eval RMSE every N boosting rounds (0 = silent)
    pub log_every: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label_column: "Final Position".to_string(),
            feature_columns: DEFAULT_FEATURE_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            cv_folds: 5,
            seed: 71,
            gbm: GbmParams::default(),
            log_every: 100,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file; absent fields keep defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }
}
