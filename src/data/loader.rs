//! Loading of the fixed-period race result CSV files
//!
//! The raw exports ship as five period files with an identical column layout.
//! They are read in period order, row-concatenated, and the combined frame is
//! positionally renamed to [`RACE_RESULT_COLUMNS`].

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::error::Result;

/// The five period files, in the order they are concatenated.
pub const RESULT_FILES: [&str; 5] = [
    "1986-1992_race_result.csv",
    "1993-1999_race_result.csv",
    "2000-2005_race_result.csv",
    "2006-2009_race_result.csv",
    "2010-2013_race_result.csv",
];

/// Column names assigned positionally to the combined result table.
pub const RACE_RESULT_COLUMNS: [&str; 65] = [
    "Race PP ID",
    "Race ID",
    "Race Day",
    "Race Meeting Number",
    "Racecourse Code",
    "Racecourse Name",
    "N-th Racing Day",
    "Race Condition",
    "Race Symbol/Drawing",
    "Race Symbol/Age",
    "Race Symbol/Mare",
    "Race Symbol/Sire",
    "Race Symbol/Special Weight",
    "Race Symbol/Mixed",
    "Race Symbol/Handicap",
    "Race Symbol/Drawing2",
    "Race Symbol/Market",
    "Race Symbol/Fixed Weight",
    "Race Symbol/Stallion",
    "Race Symbol/Kanto Distributed Horses",
    "Race Symbol/Specified",
    "Race Symbol/Kasai Distributed Horses",
    "Race Symbol/Horses from Kyushu",
    "Race Symbol/Apprentice",
    "Race Symbol/Gelding",
    "Race Symbol/International",
    "Race Symbol/Specified2",
    "Race Symbol/Special Specified",
    "Race Number",
    "Graded Races N-th Time",
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
    "Track Condition2",
    "Post Time",
    "Final Position",
    "FP Note",
    "Bracket Number",
    "Post Position",
    "Horse Name",
    "Sex",
    "Age",
    "Weight(Kg)",
    "Jockey",
    "Total Time(1/10s)",
    "Margin",
    "Position 1st Corner",
    "Position 2nd Corner",
    "Position 3rd Corner",
    "Position 4th Corner",
    "Time of Last 3 Furlongs (600m)",
    "Win Odds(100Yen)",
    "Win Fav",
    "Horse Weight",
    "Horse Weight Gain and Loss",
    "East, West, Foreign Country and Local Category",
    "Trainer",
    "Owner",
];

/// Loader for the combined race result table
pub struct RaceDataLoader {
    /// Rows used to infer column dtypes
    infer_schema_length: Option<usize>,
}

impl Default for RaceDataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceDataLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(1000),
        }
    }

    /// Set the schema inference window
    pub fn with_infer_schema_length(mut self, n: Option<usize>) -> Self {
        self.infer_schema_length = n;
        self
    }

    /// Load and concatenate the five period files from `data_dir`.
    ///
    /// Any missing or malformed file propagates the underlying error; no
    /// retry, no partial result. The rename is positional, so the source
    /// files must share the 65-column layout.
    pub fn load(&self, data_dir: impl AsRef<Path>) -> Result<DataFrame> {
        let data_dir = data_dir.as_ref();

        let mut combined: Option<DataFrame> = None;
        for file_name in RESULT_FILES {
            let df = self.read_csv(&data_dir.join(file_name))?;
            info!("loaded {}: {} rows", file_name, df.height());
            combined = Some(match combined {
                Some(acc) => acc.vstack(&df)?,
                None => df,
            });
        }

        // RESULT_FILES is non-empty, so combined is always set here
        let mut combined = combined.ok_or_else(|| {
            crate::error::KeibaError::DataError("no result files configured".to_string())
        })?;

        combined.set_column_names(RACE_RESULT_COLUMNS)?;

        info!(
            "combined race results: {} rows x {} cols",
            combined.height(),
            combined.width()
        );
        Ok(combined)
    }

    fn read_csv(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path)?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .into_reader_with_file_handle(file)
            .finish()?;

        Ok(df)
    }
}
