//! Merged indicator table built from fixture sources.

use std::path::PathBuf;

use chrono::NaiveDate;
use polars::prelude::*;

use econ_core::indicators::{MERGED_FIRST_YEAR, MERGED_LAST_YEAR, YEAR_COLUMN};
use econ_core::{
    Country, CsvSource, DateRange, InMemorySource, Indicator, Measure, Observation,
    indicator_frame, merged_frame, phillips_curve,
};

// === FIXTURES ===

const US_INFLATION: Indicator = Indicator::new(Country::Us, Measure::Inflation);
const US_UNEMPLOYMENT: Indicator = Indicator::new(Country::Us, Measure::Unemployment);
const DK_INFLATION: Indicator = Indicator::new(Country::Denmark, Measure::Inflation);
const DK_UNEMPLOYMENT: Indicator = Indicator::new(Country::Denmark, Measure::Unemployment);
const JPN_INFLATION: Indicator = Indicator::new(Country::Japan, Measure::Inflation);
const JPN_UNEMPLOYMENT: Indicator = Indicator::new(Country::Japan, Measure::Unemployment);

fn jan1(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap()
}

fn annual(years: impl Iterator<Item = i32>, value: impl Fn(i32) -> Option<f64>) -> Vec<Observation> {
    years.map(|y| Observation::new(jan1(y), value(y))).collect()
}

/// Monthly series whose value encodes the month: `year - 1900 + month / 100`.
fn monthly(first: i32, last: i32) -> Vec<Observation> {
    (first..=last)
        .flat_map(|y| {
            (1..=12).map(move |m| {
                Observation::new(
                    NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
                    Some((y - 1900) as f64 + m as f64 / 100.0),
                )
            })
        })
        .collect()
}

fn fixture_source() -> InMemorySource {
    InMemorySource::new()
        .with_series(US_INFLATION, annual(1950..=2023, |y| Some(2.0 + (y % 7) as f64)))
        .with_series(US_UNEMPLOYMENT, monthly(1948, 2023))
        .with_series(
            DK_INFLATION,
            annual(1980..=2023, |y| if y == 1990 { None } else { Some(1.5) }),
        )
        .with_series(
            DK_UNEMPLOYMENT,
            annual((1955..=2022).filter(|y| !(1965..=1969).contains(y)), |y| {
                Some(y as f64 / 1000.0)
            }),
        )
        .with_series(JPN_INFLATION, annual(1961..=2022, |_| Some(0.5)))
        .with_series(JPN_UNEMPLOYMENT, annual(1955..=2023, |_| Some(2.5)))
}

// === HELPERS ===

fn years(df: &DataFrame) -> Vec<i32> {
    df.column(YEAR_COLUMN)
        .unwrap()
        .i32()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

fn value_at(df: &DataFrame, column: &str, year: i32) -> Option<f64> {
    let row = years(df).iter().position(|&y| y == year)?;
    df.column(column).unwrap().f64().unwrap().get(row)
}

fn assert_value(df: &DataFrame, column: &str, year: i32, expected: f64) {
    let actual = value_at(df, column, year).unwrap_or(f64::NAN);
    assert!(
        (actual - expected).abs() < 1e-9,
        "{column}[{year}] = {actual}, expected {expected}"
    );
}

// === TESTS ===

#[test]
fn indicator_frame_resamples_monthly_unemployment() {
    let source = fixture_source();
    let df = indicator_frame(&source, US_UNEMPLOYMENT, &DateRange::default()).unwrap();

    assert_eq!(df.height(), 2023 - 1948 + 1);
    assert_value(&df, "Unemployment_US", 1948, 48.01);
    assert_value(&df, "Unemployment_US", 2000, 100.01);
}

#[test]
fn indicator_frame_respects_date_range() {
    let source = fixture_source();
    let range = DateRange::new(jan1(2000), jan1(2010));
    let df = indicator_frame(&source, US_INFLATION, &range).unwrap();
    assert_eq!(years(&df), (2000..=2010).collect::<Vec<_>>());
}

#[test]
fn merged_frame_spans_sixty_three_years() {
    let source = fixture_source();
    let df = merged_frame(&source, &DateRange::default()).unwrap();

    let expected_years: Vec<i32> = (MERGED_FIRST_YEAR..=MERGED_LAST_YEAR).collect();
    assert_eq!(years(&df), expected_years);
    assert_eq!(df.height(), 63);

    let mut names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    names.sort();
    let mut expected: Vec<String> = Indicator::ALL.iter().map(|i| i.column_name()).collect();
    expected.push(YEAR_COLUMN.to_string());
    expected.sort();
    assert_eq!(names, expected);
}

#[test]
fn merged_frame_coalesces_the_join_key() {
    let source = fixture_source();
    let df = merged_frame(&source, &DateRange::default()).unwrap();

    let year_columns = df
        .get_column_names()
        .iter()
        .filter(|n| n.starts_with(YEAR_COLUMN))
        .count();
    assert_eq!(year_columns, 1, "columns: {:?}", df.get_column_names());
    assert_eq!(df.width(), Indicator::ALL.len() + 1);
    assert_eq!(df.column(YEAR_COLUMN).unwrap().null_count(), 0);
}

#[test]
fn merged_frame_keeps_gaps_as_nulls() {
    let source = fixture_source();
    let df = merged_frame(&source, &DateRange::default()).unwrap();

    // Danish inflation starts in 1980 and skips 1990
    assert_eq!(value_at(&df, "Inflation_DK", 1979), None);
    assert_eq!(value_at(&df, "Inflation_DK", 1980), Some(1.5));
    assert_eq!(value_at(&df, "Inflation_DK", 1990), None);

    // Danish unemployment has no rows for 1965-1969
    for year in 1965..=1969 {
        assert_eq!(value_at(&df, "Unemployment_DK", year), None, "{year}");
    }
    assert_value(&df, "Unemployment_DK", 1970, 1.97);

    // Japanese inflation starts in 1961
    assert_eq!(value_at(&df, "Inflation_JPN", 1960), None);
    assert_eq!(value_at(&df, "Inflation_JPN", 1961), Some(0.5));

    assert_value(&df, "Unemployment_US", 1975, 75.01);
}

#[test]
fn merged_frame_fails_when_a_series_is_missing() {
    let source = InMemorySource::new().with_series(US_INFLATION, annual(1960..=1970, |_| Some(1.0)));
    assert!(merged_frame(&source, &DateRange::default()).is_err());
}

#[test]
fn phillips_curve_through_merged_frame() {
    // Inflation falls exponentially with unemployment in this fixture.
    let source = InMemorySource::new()
        .with_series(
            US_INFLATION,
            annual(1960..=2022, |y| {
                let u = 3.0 + (y % 8) as f64;
                Some(12.0 * (-0.3 * u).exp())
            }),
        )
        .with_series(
            US_UNEMPLOYMENT,
            annual(1960..=2022, |y| Some(3.0 + (y % 8) as f64)),
        )
        .with_series(DK_INFLATION, annual(1960..=2022, |_| None))
        .with_series(DK_UNEMPLOYMENT, annual(1960..=2022, |_| None))
        .with_series(JPN_INFLATION, annual(1960..=2022, |_| None))
        .with_series(JPN_UNEMPLOYMENT, annual(1960..=2022, |_| None));

    let df = merged_frame(&source, &DateRange::default()).unwrap();
    let curve = phillips_curve(&df, "Unemployment_US", "Inflation_US").unwrap();

    assert!((curve.fit.a - 12.0).abs() < 1e-6, "a = {}", curve.fit.a);
    assert!((curve.fit.b + 0.3).abs() < 1e-6, "b = {}", curve.fit.b);
    assert_eq!(curve.x.first().copied(), Some(2.0));
    assert_eq!(curve.x.last().copied(), Some(11.0));
}

// === CSV SOURCE ===

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("econ-core-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn write(&self, file: &str, contents: &str) {
        std::fs::write(self.0.join(file), contents).unwrap();
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn fred_csv(code: &str, rows: impl Iterator<Item = (String, String)>) -> String {
    let mut out = format!("observation_date,{code}\n");
    for (date, value) in rows {
        out.push_str(&format!("{date},{value}\n"));
    }
    out
}

#[test]
fn csv_directory_feeds_the_merge() {
    let dir = TempDir::new("merge");

    let annual_rows = |first: i32, last: i32, value: &'static str| {
        (first..=last).map(move |y| (format!("{y}-01-01"), value.to_string()))
    };

    dir.write(
        "FPCPITOTLZGUSA.csv",
        &fred_csv("FPCPITOTLZGUSA", annual_rows(1960, 2022, "3.1")),
    );
    dir.write(
        "UNRATE.csv",
        &fred_csv(
            "UNRATE",
            (1959..=2022).flat_map(|y| {
                [
                    (format!("{y}-01-01"), "5.0".to_string()),
                    (format!("{y}-07-01"), ".".to_string()),
                ]
            }),
        ),
    );
    dir.write(
        "PRIS9.csv",
        &(1960..=2022).fold("TID,INDHOLD\n".to_string(), |mut acc, y| {
            let value = if y == 2000 { ".." } else { "2.2" };
            acc.push_str(&format!("{y},{value}\n"));
            acc
        }),
    );
    dir.write(
        "LRUN74TTDKA156S.csv",
        &fred_csv("LRUN74TTDKA156S", annual_rows(1960, 2022, "4.4")),
    );
    dir.write(
        "FPCPITOTLZGJPN.csv",
        &fred_csv("FPCPITOTLZGJPN", annual_rows(1960, 2022, "")),
    );
    dir.write(
        "LRHUTTTTJPA156S.csv",
        &fred_csv("LRHUTTTTJPA156S", annual_rows(1960, 2022, "2.0")),
    );

    let source = CsvSource::new(&dir.0);
    let df = merged_frame(&source, &DateRange::default()).unwrap();

    assert_eq!(df.height(), 63);
    assert_eq!(value_at(&df, "Inflation_US", 1999), Some(3.1));
    assert_eq!(value_at(&df, "Unemployment_US", 1999), Some(5.0));
    assert_eq!(value_at(&df, "Inflation_DK", 1999), Some(2.2));
    assert_eq!(value_at(&df, "Inflation_DK", 2000), None);
    assert_eq!(value_at(&df, "Inflation_JPN", 1999), None);
    assert_eq!(value_at(&df, "Unemployment_JPN", 2022), Some(2.0));
}
