//! Model training: gradient boosting, cross-validation, metrics

mod cross_validation;
mod decision_tree;
mod gradient_boosting;
mod metrics;
mod trainer;

pub use cross_validation::{CvSplit, KFold};
pub use decision_tree::RegressionTree;
pub use gradient_boosting::{GbmParams, GbmRegressor};
pub use metrics::{rmse, RegressionMetrics};
pub use trainer::{train_cv, CvOutcome};
