// Macroeconomic indicator series
//
// Module structure:
// - series  Indicator catalogue (country x measure), observations, date ranges
// - source  TimeSeriesSource trait with in-memory and CSV implementations
// - frame   Annual resampling and polars frames, including the merged table
// - error   DataError

pub mod error;
pub mod frame;
pub mod series;
pub mod source;

pub use error::{DataError, Result};
pub use frame::{
    MERGED_FIRST_YEAR, MERGED_LAST_YEAR, YEAR_COLUMN, annual_points, indicator_frame,
    merged_frame,
};
pub use series::{Country, DateRange, Indicator, Measure, Observation, Provider};
pub use source::{CsvSource, InMemorySource, TimeSeriesSource};
