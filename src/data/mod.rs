//! Race result data loading

mod loader;

pub use loader::{RaceDataLoader, RACE_RESULT_COLUMNS, RESULT_FILES};
