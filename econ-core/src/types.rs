use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

// === CORE TYPES ===

/// Price of good 1 in units of good 2 (the numeraire).
pub type Price = f64;
pub type Quantity = f64;

// ============================================================================
// Bundles - What an agent chooses to consume
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Bundle {
    pub x1: Quantity, // good 1
    pub x2: Quantity, // good 2 (numeraire)
}

impl Bundle {
    pub fn new(x1: Quantity, x2: Quantity) -> Self {
        Self { x1, x2 }
    }

    /// Market value of the bundle at prices `(p1, 1)`.
    pub fn value_at(&self, p1: Price) -> f64 {
        p1 * self.x1 + self.x2
    }
}

impl From<Bundle> for (Quantity, Quantity) {
    fn from(b: Bundle) -> Self {
        (b.x1, b.x2)
    }
}

// ============================================================================
// Market clearing results
// ============================================================================

/// Aggregate excess demand for both goods at one price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct ExcessDemand {
    pub eps1: f64,
    pub eps2: f64,
}

impl From<ExcessDemand> for (f64, f64) {
    fn from(e: ExcessDemand) -> Self {
        (e.eps1, e.eps2)
    }
}

/// One evaluated candidate of the price grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct GridSample {
    pub index: usize,
    pub price: Price,
    pub excess: ExcessDemand,
}

/// Selected grid price and the allocations both agents demand there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct MarketClearing {
    pub price: Price,
    pub agent_a: Bundle,
    pub agent_b: Bundle,
}

impl MarketClearing {
    /// Flat `(price, x1A, x2A, x1B, x2B)` tuple.
    pub fn to_tuple(&self) -> (Price, Quantity, Quantity, Quantity, Quantity) {
        (
            self.price,
            self.agent_a.x1,
            self.agent_a.x2,
            self.agent_b.x1,
            self.agent_b.x2,
        )
    }
}
