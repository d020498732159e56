//! Data layer error types.

use thiserror::Error;

use super::series::Indicator;

#[derive(Debug, Error)]
pub enum DataError {
    /// The source could not produce the series.
    #[error("{source_name} failed to fetch {indicator}: {reason}")]
    SourceFailed {
        source_name: String,
        indicator: Indicator,
        reason: String,
    },

    /// The source has nothing registered for this indicator.
    #[error("{source_name} has no data for {indicator}")]
    UnknownIndicator {
        source_name: String,
        indicator: Indicator,
    },

    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, DataError>;
