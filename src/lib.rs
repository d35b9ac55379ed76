//! Keiba Predictor - Horse racing finishing-position prediction
//!
//! Batch pipeline that loads historical race result CSVs, encodes them into
//! numeric feature matrices, and trains a gradient-boosted regressor on the
//! final finishing position, evaluated with k-fold cross-validation.
//!
//! # Modules
//!
//! - [`data`] - Loading the fixed-schema race result files
//! - [`preprocessing`] - Label filtering, categorical encoding, null dropping
//! - [`features`] - Projection onto the pre-race feature allow-list
//! - [`training`] - Gradient boosting, k-fold splitting, cross-validated
//!   training and regression metrics
//! - [`visualization`] - Predicted-vs-actual scatter plot
//! - [`cli`] - Command-line interface
//! - [`utils`] - Stage timing

// Core error handling
pub mod error;

// Run configuration
pub mod config;

// Pipeline stages
pub mod data;
pub mod preprocessing;
pub mod features;
pub mod training;
pub mod visualization;

// Services
pub mod cli;

// Utilities
pub mod utils;

pub use error::{KeibaError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{KeibaError, Result};

    pub use crate::config::PipelineConfig;
    pub use crate::data::{RaceDataLoader, RACE_RESULT_COLUMNS, RESULT_FILES};
    pub use crate::features::{FeatureSelector, DEFAULT_FEATURE_COLUMNS};
    pub use crate::preprocessing::{LabelEncoder, Preprocessor, MISSING_SENTINEL};
    pub use crate::training::{
        train_cv, CvOutcome, CvSplit, GbmParams, GbmRegressor, KFold, RegressionMetrics,
    };
    pub use crate::utils::Timer;
}
