//! Time series sources.
//!
//! Fetching from the statistical agencies themselves is left to callers: a
//! source only has to hand back `(period, value)` pairs for an indicator.
//! Two sources ship with the crate, an in-memory map for fixtures and a
//! directory of CSV downloads.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::warn;

use super::error::{DataError, Result};
use super::series::{DateRange, Indicator, Observation};

/// Anything that can produce observations for an indicator.
pub trait TimeSeriesSource {
    /// Source name, used in error messages.
    fn name(&self) -> &str;

    /// Observations within `range`, ordered by period.
    fn fetch(&self, indicator: Indicator, range: &DateRange) -> Result<Vec<Observation>>;
}

// ============================================================================
// In-memory source
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<Indicator, Vec<Observation>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, indicator: Indicator, mut observations: Vec<Observation>) {
        observations.sort_by_key(|o| o.period);
        self.series.insert(indicator, observations);
    }

    pub fn with_series(mut self, indicator: Indicator, observations: Vec<Observation>) -> Self {
        self.insert(indicator, observations);
        self
    }
}

impl TimeSeriesSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, indicator: Indicator, range: &DateRange) -> Result<Vec<Observation>> {
        let observations = self
            .series
            .get(&indicator)
            .ok_or_else(|| DataError::UnknownIndicator {
                source_name: self.name().to_string(),
                indicator,
            })?;
        Ok(observations
            .iter()
            .filter(|o| range.contains(o.period))
            .copied()
            .collect())
    }
}

// ============================================================================
// CSV directory source
// ============================================================================

/// Reads `{dir}/{series_code}.csv` files as downloaded from the providers.
///
/// FRED downloads are `DATE,VALUE` with the period first and the value
/// second. Statistics Denmark exports are `;`-delimited with a leading `TYPE`
/// column, so when the header names `TID` and `INDHOLD` those two columns are
/// used instead, and decimal commas are accepted. Periods are `YYYY-MM-DD` or a
/// bare `YYYY`. Blank, `.` and `..` cells are missing values; anything else
/// that does not parse is logged and treated as missing.
#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, indicator: Indicator) -> PathBuf {
        self.dir.join(format!("{}.csv", indicator.series_code()))
    }
}

impl TimeSeriesSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, indicator: Indicator, range: &DateRange) -> Result<Vec<Observation>> {
        let path = self.path_for(indicator);
        if !path.exists() {
            return Err(DataError::UnknownIndicator {
                source_name: format!("csv:{}", self.dir.display()),
                indicator,
            });
        }
        let file = std::fs::File::open(&path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut observations = read_observations(file, &path)?;
        observations.retain(|o| range.contains(o.period));
        observations.sort_by_key(|o| o.period);
        Ok(observations)
    }
}

/// Target of the warnings emitted while reading CSV files.
pub const CSV_LOG_TARGET: &str = "csv_source";

const STATBANK_PERIOD: &str = "TID";
const STATBANK_VALUE: &str = "INDHOLD";

fn read_observations<R: Read>(mut rdr: R, path: &Path) -> Result<Vec<Observation>> {
    let mut text = String::new();
    rdr.read_to_string(&mut text).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let text = text.trim_start_matches('\u{feff}');

    let header = text.lines().next().unwrap_or_default();
    let delimiter = if header.contains(';') { b';' } else { b',' };

    let csv_error = |source| DataError::Csv {
        path: path.display().to_string(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(csv_error)?;
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let (period_col, value_col) = match (column(STATBANK_PERIOD), column(STATBANK_VALUE)) {
        (Some(period), Some(value)) => (period, value),
        _ => (0, 1),
    };

    let mut observations = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let (Some(period), Some(raw)) = (record.get(period_col), record.get(value_col)) else {
            warn!(target: CSV_LOG_TARGET, path = %path.display(), "skipping short row: {:?}", record);
            continue;
        };
        let raw = if delimiter == b';' {
            raw.replace(',', ".")
        } else {
            raw.to_string()
        };
        let value = parse_value(&raw);
        if value.is_none() && !is_missing_marker(&raw) {
            warn!(
                target: CSV_LOG_TARGET,
                path = %path.display(),
                period,
                cell = raw.as_str(),
                "unparsable value treated as missing"
            );
        }
        observations.push(Observation {
            period: parse_period(period)?,
            value,
        });
    }
    Ok(observations)
}

/// `YYYY-MM-DD`, or `YYYY` meaning January 1st of that year.
pub fn parse_period(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    raw.parse::<i32>()
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .ok_or_else(|| DataError::InvalidDate(raw.to_string()))
}

/// Blank, `.` (FRED) and `..` (statbank) all mark a missing value.
pub fn is_missing_marker(raw: &str) -> bool {
    matches!(raw.trim(), "" | "." | "..")
}

/// Coerce a cell to a number, `None` when it is missing or malformed.
pub fn parse_value(raw: &str) -> Option<f64> {
    if is_missing_marker(raw) {
        return None;
    }
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
