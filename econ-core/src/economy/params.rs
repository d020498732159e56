use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

/// Preference and endowment parameters of the two-agent exchange economy.
///
/// Agent B's endowment is never stored: it is whatever agent A does not own,
/// so each good's total endowment is exactly one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct EconomyParams {
    /// Cobb-Douglas exponent on good 1 for agent A, in (0, 1).
    pub alpha: f64,
    /// Cobb-Douglas exponent on good 1 for agent B, in (0, 1).
    pub beta: f64,
    /// Agent A's endowment of good 1.
    pub w1a: f64,
    /// Agent A's endowment of good 2.
    pub w2a: f64,
}

impl Default for EconomyParams {
    fn default() -> Self {
        Self {
            alpha: 1.0 / 3.0,
            beta: 2.0 / 3.0,
            w1a: 0.8,
            w2a: 0.3,
        }
    }
}

impl EconomyParams {
    pub fn new(alpha: f64, beta: f64, w1a: f64, w2a: f64) -> Self {
        Self {
            alpha,
            beta,
            w1a,
            w2a,
        }
    }

    /// Parse a parameter set from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn w1b(&self) -> f64 {
        1.0 - self.w1a
    }

    pub fn w2b(&self) -> f64 {
        1.0 - self.w2a
    }

    /// Closed-form market-clearing price for Cobb-Douglas demands:
    /// `(alpha*w2a + beta*w2b) / (1 - alpha*w1a - beta*w1b)`.
    pub fn analytic_equilibrium_price(&self) -> f64 {
        let numerator = self.alpha * self.w2a + self.beta * self.w2b();
        let denominator = 1.0 - self.alpha * self.w1a - self.beta * self.w1b();
        numerator / denominator
    }
}
