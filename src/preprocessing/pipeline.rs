//! Preprocessing pipeline: label filter, categorical encoding, null dropping

use polars::prelude::*;
use tracing::info;

use super::encoder::LabelEncoder;
use crate::error::{KeibaError, Result};

/// Preprocessor producing a fully numeric, null-free table.
///
/// Stages, in order:
/// 1. drop rows whose label is null,
/// 2. label-encode every string column (nulls folded into the sentinel),
/// 3. drop any row still containing a null.
///
/// Row count never increases across stages.
pub struct Preprocessor {
    label_column: String,
    encoder: LabelEncoder,
}

impl Preprocessor {
    /// Create a preprocessor for the given label column
    pub fn new(label_column: impl Into<String>) -> Self {
        Self {
            label_column: label_column.into(),
            encoder: LabelEncoder::new(),
        }
    }

    /// Use a pre-fitted vocabulary instead of fitting per run.
    ///
    /// Categories absent from the vocabulary encode to null and the rows
    /// carrying them are dropped in stage 3.
    pub fn with_encoder(mut self, encoder: LabelEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Label column name
    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    /// The encoder, including any vocabulary fitted during the last run
    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    /// Run the full preprocessing pass
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        let label = df
            .column(&self.label_column)
            .map_err(|_| KeibaError::FeatureNotFound(self.label_column.clone()))?;

        // Stage 1: rows with a missing label carry no training signal
        let labeled = df.filter(&label.as_materialized_series().is_not_null())?;
        if labeled.height() < df.height() {
            info!(
                "dropped {} rows with missing '{}'",
                df.height() - labeled.height(),
                self.label_column
            );
        }

        // Stage 2: encode every string column
        let string_columns: Vec<String> = labeled
            .get_columns()
            .iter()
            .filter(|c| c.dtype() == &DataType::String)
            .map(|c| c.name().to_string())
            .collect();

        let encoded = if string_columns.is_empty() {
            labeled
        } else if self.encoder.is_fitted() {
            // A reused vocabulary must cover every string column, or the
            // output would leak unencoded strings past stage 3.
            for name in &string_columns {
                if self.encoder.vocabulary(name).is_none() {
                    return Err(KeibaError::PreprocessingError(format!(
                        "vocabulary has no mapping for column '{}'",
                        name
                    )));
                }
            }
            self.encoder.transform(&labeled)?
        } else {
            let column_refs: Vec<&str> = string_columns.iter().map(String::as_str).collect();
            self.encoder.fit_transform(&labeled, &column_refs)?
        };

        // Stage 3: drop rows still carrying nulls in any column
        let result = Self::drop_null_rows(&encoded)?;
        if result.height() < encoded.height() {
            info!(
                "dropped {} rows with remaining missing values",
                encoded.height() - result.height()
            );
        }

        Ok(result)
    }

    fn drop_null_rows(df: &DataFrame) -> Result<DataFrame> {
        let mut mask = BooleanChunked::full("keep".into(), true, df.height());
        for column in df.get_columns() {
            if column.null_count() > 0 {
                mask = &mask & &column.as_materialized_series().is_not_null();
            }
        }
        Ok(df.filter(&mask)?)
    }

    /// Per-column null counts, for diagnostics before training
    pub fn null_report(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .filter(|c| c.null_count() > 0)
            .map(|c| (c.name().to_string(), c.null_count()))
            .collect()
    }
}
