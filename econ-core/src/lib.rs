// Economics course toolkit
//
// Module structure:
// - economy/     Two-good, two-agent exchange economy and the clearing-price grid search
// - indicators/  Inflation/unemployment series for US, Denmark and Japan, merged into one annual frame
// - fit          Exponential trend line through a scatter (Phillips curve)
// - types        Shared value types (bundles, excess demand, clearing results)
// - wasm         Browser bindings for the exchange economy

pub mod economy;
pub mod fit;
pub mod indicators;
pub mod types;
pub mod wasm;

#[cfg(feature = "instrument")]
pub use instrument;

pub use economy::{
    EconomyParams, ExchangeEconomy, PRICE_GRID_MAX, PRICE_GRID_MIN, PRICE_GRID_STEPS, PriceGrid,
};
pub use fit::{ExponentialFit, FitError, FitOptions, FittedCurve, phillips_curve};
pub use indicators::{
    Country, CsvSource, DataError, DateRange, InMemorySource, Indicator, Measure, Observation,
    TimeSeriesSource, indicator_frame, merged_frame,
};
pub use types::{Bundle, ExcessDemand, GridSample, MarketClearing, Price, Quantity};
