//! Feature selection over the pre-race allow-list

use polars::prelude::*;

use crate::error::{KeibaError, Result};

/// Default feature allow-list: attributes treated as known before post time.
///
/// Reproduces the upstream notebook's set verbatim, including `FP Note` and
/// `Margin`, which are arguably settled only during the race. The list is
/// configuration data (see [`crate::config::PipelineConfig`]); overriding it
/// is the supported way to exclude those columns.
pub const DEFAULT_FEATURE_COLUMNS: [&str; 36] = [
    "Race PP ID",
    "Race ID",
    "Race Day",
    "Race Meeting Number",
    "Racecourse Code",
    "Racecourse Name",
    "N-th Racing Day",
    "Race Condition",
    "Race Number",
    "Race Name",
    "Listed and Graded Races",
    "Steeplechase Category",
    "Turf and Dirt Category",
    "Turf and Dirt Category2",
    "Clockwise, Anti-clockwise and Straight Course Category",
    "Inner Circle, Outer Circle and Tasuki Course Category",
    "Distance(m)",
    "Weather",
    "Track Condition1",
    "Post Time",
    "FP Note",
    "Bracket Number",
    "Post Position",
    "Horse Name",
    "Sex",
    "Age",
    "Weight(Kg)",
    "Jockey",
    "Margin",
    "Win Odds(100Yen)",
    "Win Fav",
    "Horse Weight",
    "Horse Weight Gain and Loss",
    "East, West, Foreign Country and Local Category",
    "Trainer",
    "Owner",
];

/// Projects a table onto a fixed, ordered feature allow-list
#[derive(Debug, Clone)]
pub struct FeatureSelector {
    columns: Vec<String>,
}

impl Default for FeatureSelector {
    fn default() -> Self {
        Self::new(DEFAULT_FEATURE_COLUMNS.iter().map(|s| s.to_string()))
    }
}

impl FeatureSelector {
    /// Create a selector over the given columns, in that order
    pub fn new(columns: impl IntoIterator<Item = String>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
        }
    }

    /// The selected column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Project `df` onto the allow-list.
    ///
    /// Row count is unchanged; values are untouched. An absent column is a
    /// hard error.
    pub fn select(&self, df: &DataFrame) -> Result<DataFrame> {
        for name in &self.columns {
            if df.column(name).is_err() {
                return Err(KeibaError::FeatureNotFound(name.clone()));
            }
        }
        Ok(df.select(self.columns.iter().map(|s| s.as_str()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allow_list_is_subset_of_schema() {
        use crate::data::RACE_RESULT_COLUMNS;
        for name in DEFAULT_FEATURE_COLUMNS {
            assert!(
                RACE_RESULT_COLUMNS.contains(&name),
                "{} not in result schema",
                name
            );
        }
    }

    #[test]
    fn test_select_restricts_and_reorders() {
        let df = df!(
            "b" => &[1i64, 2],
            "a" => &[3i64, 4],
            "c" => &[5i64, 6]
        )
        .unwrap();

        let selector = FeatureSelector::new(["a".to_string(), "b".to_string()]);
        let result = selector.select(&df).unwrap();

        let names: Vec<String> = result
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(result.height(), 2);
    }

    #[test]
    fn test_select_empty_table() {
        let df = df!(
            "a" => &Vec::<i64>::new(),
            "b" => &Vec::<i64>::new()
        )
        .unwrap();

        let selector = FeatureSelector::new(["a".to_string(), "b".to_string()]);
        let result = selector.select(&df).unwrap();
        assert_eq!(result.height(), 0);
        assert_eq!(result.width(), 2);
    }

    #[test]
    fn test_missing_column_errors() {
        let df = df!("a" => &[1i64]).unwrap();
        let selector = FeatureSelector::new(["a".to_string(), "missing".to_string()]);
        assert!(matches!(
            selector.select(&df),
            Err(KeibaError::FeatureNotFound(name)) if name == "missing"
        ));
    }
}
