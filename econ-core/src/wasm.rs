use wasm_bindgen::prelude::*;

use crate::economy::{EconomyParams, ExchangeEconomy, PriceGrid};
use crate::types::{Bundle, ExcessDemand, MarketClearing};

// ============================================================================
// WASM API - Exchange economy
// ============================================================================

#[wasm_bindgen]
pub struct Economy {
    inner: ExchangeEconomy,
}

impl Default for Economy {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Economy {
    /// Economy with the default parameters.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // Better panic messages in browser console
        console_error_panic_hook::set_once();

        Self {
            inner: ExchangeEconomy::new(),
        }
    }

    #[wasm_bindgen]
    pub fn with_params(params: EconomyParams) -> Self {
        console_error_panic_hook::set_once();
        Self {
            inner: ExchangeEconomy::with_params(params),
        }
    }

    /// Parse parameters from JSON, e.g. `{"alpha": 0.5, "w1a": 0.6}`.
    /// Omitted fields keep their defaults.
    #[wasm_bindgen]
    pub fn from_params_json(json: &str) -> Result<Economy, JsError> {
        let params = EconomyParams::from_json(json)?;
        Ok(Self::with_params(params))
    }

    #[wasm_bindgen]
    pub fn params(&self) -> EconomyParams {
        *self.inner.params()
    }

    #[wasm_bindgen]
    pub fn utility_a(&self, x1: f64, x2: f64) -> f64 {
        self.inner.utility_a(x1, x2)
    }

    #[wasm_bindgen]
    pub fn utility_b(&self, x1: f64, x2: f64) -> f64 {
        self.inner.utility_b(x1, x2)
    }

    #[wasm_bindgen]
    pub fn demand_a(&self, p1: f64) -> Bundle {
        self.inner.demand_a(p1)
    }

    #[wasm_bindgen]
    pub fn demand_b(&self, p1: f64) -> Bundle {
        self.inner.demand_b(p1)
    }

    #[wasm_bindgen]
    pub fn check_market_clearing(&self, p1: f64) -> ExcessDemand {
        self.inner.check_market_clearing(p1)
    }

    #[wasm_bindgen]
    pub fn find_market_clearing(&self) -> MarketClearing {
        self.inner.find_market_clearing()
    }

    #[wasm_bindgen]
    pub fn find_market_clearing_on(&self, grid: PriceGrid) -> MarketClearing {
        self.inner.find_market_clearing_on(&grid)
    }

    /// Good-1 excess demand at every default grid price, for charting.
    #[wasm_bindgen]
    pub fn excess_demand_scan(&self) -> js_sys::Float64Array {
        let eps1: Vec<f64> = self
            .inner
            .scan(&PriceGrid::default())
            .iter()
            .map(|s| s.excess.eps1)
            .collect();
        js_sys::Float64Array::from(eps1.as_slice())
    }

    /// Default grid prices, aligned with `excess_demand_scan`.
    #[wasm_bindgen]
    pub fn grid_prices(&self) -> js_sys::Float64Array {
        let prices: Vec<f64> = PriceGrid::default().prices().collect();
        js_sys::Float64Array::from(prices.as_slice())
    }

    /// Every evaluated grid sample (`index`, `price`, `excess`) as JS objects.
    #[wasm_bindgen]
    pub fn price_scan(&self, grid: PriceGrid) -> Result<JsValue, JsError> {
        let samples = self.inner.scan(&grid);
        Ok(serde_wasm_bindgen::to_value(&samples)?)
    }
}
