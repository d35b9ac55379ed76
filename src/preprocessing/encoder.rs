//! Label encoding for categorical columns
//!
//! Each distinct string maps to a dense integer code assigned in order of
//! first appearance. Nulls are folded into the sentinel category before
//! encoding, so a missing value receives a regular code instead of
//! surviving as a null.
//!
//! Codes are only stable within one fitted vocabulary. To keep encodings
//! reproducible across separate runs, the fitted vocabulary can be persisted
//! with [`LabelEncoder::save`] and reused via [`LabelEncoder::load`].

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{KeibaError, Result};

/// Category substituted for missing string values before encoding.
pub const MISSING_SENTINEL: &str = "N";

/// Categorical label encoder with per-column vocabularies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    // Maps column name -> (category -> integer code)
    mappings: HashMap<String, HashMap<String, usize>>,
    is_fitted: bool,
}

impl LabelEncoder {
    /// Create a new, unfitted encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the encoder carries a fitted vocabulary
    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Fit a vocabulary for each of `columns`
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| KeibaError::FeatureNotFound(col_name.to_string()))?;
            let series = column.as_materialized_series();

            let mapping = Self::build_mapping(series)?;
            self.mappings.insert(col_name.to_string(), mapping);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Encode every fitted column of `df` to integer codes.
    ///
    /// A category absent from the vocabulary encodes to null; the caller
    /// decides whether such rows are dropped.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(KeibaError::ModelNotFitted);
        }

        let mut result = df.clone();

        for (col_name, mapping) in &self.mappings {
            if let Ok(column) = df.column(col_name) {
                let ca = column
                    .as_materialized_series()
                    .str()
                    .map_err(|e| KeibaError::PreprocessingError(e.to_string()))?;

                let values: Vec<Option<i64>> = ca
                    .into_iter()
                    .map(|v| {
                        let category = v.unwrap_or(MISSING_SENTINEL);
                        mapping.get(category).map(|&code| code as i64)
                    })
                    .collect();

                let encoded = Series::new(col_name.as_str().into(), values);
                result.with_column(encoded)?;
            }
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Vocabulary for one column, if fitted
    pub fn vocabulary(&self, column: &str) -> Option<&HashMap<String, usize>> {
        self.mappings.get(column)
    }

    /// Persist the fitted vocabularies as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load previously persisted vocabularies
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let encoder: Self = serde_json::from_reader(BufReader::new(file))?;
        Ok(encoder)
    }

    fn build_mapping(series: &Series) -> Result<HashMap<String, usize>> {
        let ca = series
            .str()
            .map_err(|e| KeibaError::PreprocessingError(e.to_string()))?;

        let mut mapping = HashMap::new();
        let mut next_code = 0usize;
        for val in ca.into_iter() {
            let category = val.unwrap_or(MISSING_SENTINEL);
            if !mapping.contains_key(category) {
                mapping.insert(category.to_string(), next_code);
                next_code += 1;
            }
        }

        Ok(mapping)
    }
}
