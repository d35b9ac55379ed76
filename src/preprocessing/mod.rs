//! Data preprocessing: categorical encoding and null handling

mod encoder;
mod pipeline;

pub use encoder::{LabelEncoder, MISSING_SENTINEL};
pub use pipeline::Preprocessor;
