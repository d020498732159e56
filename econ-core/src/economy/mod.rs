// Exchange economy module
//
// Module structure:
// - params    Preference/endowment parameters and the closed-form price
// - exchange  Demand, excess demand and the grid-search clearing price
// - search    Price grid configuration and the magnitude argmin

pub mod exchange;
pub mod params;
pub mod search;

pub use exchange::ExchangeEconomy;
pub use params::EconomyParams;
pub use search::{PRICE_GRID_MAX, PRICE_GRID_MIN, PRICE_GRID_STEPS, PriceGrid, argmin_abs};
