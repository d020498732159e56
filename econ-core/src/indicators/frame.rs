use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

use super::error::Result;
use super::series::{DateRange, Indicator, Observation};
use super::source::TimeSeriesSource;

// === CONSTANTS ===

pub const YEAR_COLUMN: &str = "Year";
/// Earlier years are mostly missing for at least one country.
pub const MERGED_FIRST_YEAR: i32 = 1960;
/// Later years are mostly missing for at least one country.
pub const MERGED_LAST_YEAR: i32 = 2022;

// === ANNUAL POINTS ===

/// Reduce observations to `(year, value)` pairs.
///
/// With `resample`, take one point per January 1st between the first and last
/// observation: the value observed on exactly that day, or `None` when there
/// is none. Without it, each observation is keyed by the year of its period.
///
/// Unlike pandas `resample('AS').asfreq()`, a series that starts mid-year
/// gets no leading null row for that year; the first point is the next
/// January 1st.
pub fn annual_points(observations: &[Observation], resample: bool) -> Vec<(i32, Option<f64>)> {
    if !resample {
        return observations
            .iter()
            .map(|o| (o.period.year(), o.value))
            .collect();
    }

    let (Some(first), Some(last)) = (
        observations.iter().map(|o| o.period).min(),
        observations.iter().map(|o| o.period).max(),
    ) else {
        return Vec::new();
    };

    let by_date: HashMap<NaiveDate, Option<f64>> =
        observations.iter().map(|o| (o.period, o.value)).collect();

    let start_year = if first.ordinal() == 1 {
        first.year()
    } else {
        first.year() + 1
    };

    (start_year..=last.year())
        .filter_map(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .map(|jan1| (jan1.year(), by_date.get(&jan1).copied().flatten()))
        .collect()
}

// === FRAMES ===

/// Two-column frame: `Year` and the indicator's column.
pub fn indicator_frame(
    source: &dyn TimeSeriesSource,
    indicator: Indicator,
    range: &DateRange,
) -> Result<DataFrame> {
    let observations = source.fetch(indicator, range)?;
    let points = annual_points(&observations, indicator.resample_annual());

    tracing::debug!(
        source = source.name(),
        indicator = %indicator,
        observations = observations.len(),
        years = points.len(),
        "fetched indicator"
    );

    let years: Vec<i32> = points.iter().map(|(y, _)| *y).collect();
    let values: Vec<Option<f64>> = points.iter().map(|(_, v)| *v).collect();

    let df = DataFrame::new(vec![
        Column::new(YEAR_COLUMN.into(), years),
        Column::new(indicator.column_name().into(), values),
    ])?;
    Ok(df)
}

/// All six indicators outer-joined on `Year`, restricted to
/// `MERGED_FIRST_YEAR..=MERGED_LAST_YEAR` and sorted by year.
pub fn merged_frame(source: &dyn TimeSeriesSource, range: &DateRange) -> Result<DataFrame> {
    let mut merged: Option<LazyFrame> = None;

    for indicator in Indicator::ALL {
        let frame = indicator_frame(source, indicator, range)?.lazy();
        merged = Some(match merged {
            None => frame,
            Some(acc) => acc.join(
                frame,
                [col(YEAR_COLUMN)],
                [col(YEAR_COLUMN)],
                JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
            ),
        });
    }

    let Some(merged) = merged else {
        return Ok(DataFrame::empty());
    };

    let df = merged
        .filter(
            col(YEAR_COLUMN)
                .gt_eq(lit(MERGED_FIRST_YEAR))
                .and(col(YEAR_COLUMN).lt_eq(lit(MERGED_LAST_YEAR))),
        )
        .sort([YEAR_COLUMN], Default::default())
        .collect()?;
    Ok(df)
}
