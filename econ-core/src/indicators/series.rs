use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Indicators - Which series exist and where they come from
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    Us,
    Denmark,
    Japan,
}

impl Country {
    /// Suffix used in merged column names.
    pub fn suffix(&self) -> &'static str {
        match self {
            Country::Us => "US",
            Country::Denmark => "DK",
            Country::Japan => "JPN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measure {
    /// Annual consumer price inflation, percent.
    Inflation,
    /// Unemployment rate, percent.
    Unemployment,
}

impl Measure {
    pub fn label(&self) -> &'static str {
        match self {
            Measure::Inflation => "Inflation",
            Measure::Unemployment => "Unemployment",
        }
    }
}

/// Statistical agency that publishes a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// Federal Reserve Economic Data.
    Fred,
    /// Statistics Denmark (statbank tables).
    StatisticsDenmark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Indicator {
    pub country: Country,
    pub measure: Measure,
}

impl Indicator {
    /// Every indicator, in the order they are merged.
    pub const ALL: [Indicator; 6] = [
        Indicator::new(Country::Us, Measure::Inflation),
        Indicator::new(Country::Us, Measure::Unemployment),
        Indicator::new(Country::Denmark, Measure::Inflation),
        Indicator::new(Country::Denmark, Measure::Unemployment),
        Indicator::new(Country::Japan, Measure::Inflation),
        Indicator::new(Country::Japan, Measure::Unemployment),
    ];

    pub const fn new(country: Country, measure: Measure) -> Self {
        Self { country, measure }
    }

    pub fn provider(&self) -> Provider {
        match (self.country, self.measure) {
            (Country::Denmark, Measure::Inflation) => Provider::StatisticsDenmark,
            _ => Provider::Fred,
        }
    }

    /// Provider-side identifier: FRED series id or statbank table id.
    ///
    /// Danish unemployment comes from FRED rather than Statistics Denmark
    /// because the FRED series goes further back.
    pub fn series_code(&self) -> &'static str {
        match (self.country, self.measure) {
            (Country::Us, Measure::Inflation) => "FPCPITOTLZGUSA",
            (Country::Us, Measure::Unemployment) => "UNRATE",
            (Country::Denmark, Measure::Inflation) => "PRIS9",
            (Country::Denmark, Measure::Unemployment) => "LRUN74TTDKA156S",
            (Country::Japan, Measure::Inflation) => "FPCPITOTLZGJPN",
            (Country::Japan, Measure::Unemployment) => "LRHUTTTTJPA156S",
        }
    }

    /// Column name in indicator and merged frames, e.g. `Inflation_US`.
    pub fn column_name(&self) -> String {
        format!("{}_{}", self.measure.label(), self.country.suffix())
    }

    /// Whether the series is sampled at each year start instead of keyed by
    /// the year of every observation. US unemployment is monthly.
    pub fn resample_annual(&self) -> bool {
        matches!(
            (self.country, self.measure),
            (Country::Us, Measure::Unemployment) | (Country::Japan, Measure::Unemployment)
        )
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

// ============================================================================
// Observations
// ============================================================================

/// One `(period, value)` pair. `None` marks a missing or unparsable value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub period: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(period: NaiveDate, value: Option<f64>) -> Self {
        Self { period, value }
    }
}

/// Inclusive range of periods requested from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MAX),
        }
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names() {
        let names: Vec<_> = Indicator::ALL.iter().map(|i| i.column_name()).collect();
        assert_eq!(
            names,
            vec![
                "Inflation_US",
                "Unemployment_US",
                "Inflation_DK",
                "Unemployment_DK",
                "Inflation_JPN",
                "Unemployment_JPN",
            ]
        );
    }

    #[test]
    fn only_danish_inflation_uses_statbank() {
        for indicator in Indicator::ALL {
            let expected = if indicator == Indicator::new(Country::Denmark, Measure::Inflation) {
                Provider::StatisticsDenmark
            } else {
                Provider::Fred
            };
            assert_eq!(indicator.provider(), expected, "{indicator}");
        }
    }

    #[test]
    fn series_codes_are_distinct() {
        let mut codes: Vec<_> = Indicator::ALL.iter().map(|i| i.series_code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 6);
    }

    #[test]
    fn default_range_bounds() {
        let range = DateRange::default();
        assert!(range.contains(NaiveDate::from_ymd_opt(1960, 6, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));
    }
}
