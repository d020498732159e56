use crate::types::{Bundle, ExcessDemand, GridSample, MarketClearing, Price};

use super::params::EconomyParams;
use super::search::{PriceGrid, argmin_abs};

/// Two-good, two-agent pure exchange economy with Cobb-Douglas preferences.
///
/// Good 2 is the numeraire. Everything here is a pure function of the fixed
/// parameters and a price; nothing is cached. Degenerate inputs (zero price,
/// exponents at 0 or 1, empty endowments) are not guarded and come back as
/// non-finite numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExchangeEconomy {
    params: EconomyParams,
}

impl ExchangeEconomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: EconomyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EconomyParams {
        &self.params
    }

    pub fn endowment_a(&self) -> Bundle {
        Bundle::new(self.params.w1a, self.params.w2a)
    }

    pub fn endowment_b(&self) -> Bundle {
        Bundle::new(self.params.w1b(), self.params.w2b())
    }

    // === UTILITY ===

    pub fn utility_a(&self, x1: f64, x2: f64) -> f64 {
        cobb_douglas(self.params.alpha, x1, x2)
    }

    pub fn utility_b(&self, x1: f64, x2: f64) -> f64 {
        cobb_douglas(self.params.beta, x1, x2)
    }

    // === DEMAND ===

    /// Agent A's utility-maximizing bundle at prices `(p1, 1)`.
    pub fn demand_a(&self, p1: Price) -> Bundle {
        cobb_douglas_demand(self.params.alpha, self.endowment_a(), p1)
    }

    /// Agent B's utility-maximizing bundle at prices `(p1, 1)`.
    pub fn demand_b(&self, p1: Price) -> Bundle {
        cobb_douglas_demand(self.params.beta, self.endowment_b(), p1)
    }

    // === MARKET CLEARING ===

    /// Aggregate excess demand for both goods. Both components are computed
    /// from the demands; neither is inferred from Walras's law.
    pub fn check_market_clearing(&self, p1: Price) -> ExcessDemand {
        let a = self.demand_a(p1);
        let b = self.demand_b(p1);
        let w1a = self.params.w1a;
        let w2a = self.params.w2a;

        ExcessDemand {
            eps1: (a.x1 - w1a) + (b.x1 - (1.0 - w1a)),
            eps2: (a.x2 - w2a) + (b.x2 - (1.0 - w2a)),
        }
    }

    /// Excess demand at every point of `grid`, in ascending price order.
    pub fn scan(&self, grid: &PriceGrid) -> Vec<GridSample> {
        grid.prices()
            .enumerate()
            .map(|(index, price)| {
                let excess = self.check_market_clearing(price);

                #[cfg(feature = "instrument")]
                tracing::info!(
                    target: "price_scan",
                    index = index,
                    price = price,
                    eps1 = excess.eps1,
                    eps2 = excess.eps2,
                );

                GridSample {
                    index,
                    price,
                    excess,
                }
            })
            .collect()
    }

    /// Approximate market-clearing price on the default grid.
    pub fn find_market_clearing(&self) -> MarketClearing {
        self.find_market_clearing_on(&PriceGrid::default())
    }

    /// Grid price whose good-1 excess demand is closest to zero, with both
    /// agents' demands at that price. Not a root-finder: the answer is only
    /// as fine as the grid, and an equilibrium outside the grid yields the
    /// nearest boundary sample.
    pub fn find_market_clearing_on(&self, grid: &PriceGrid) -> MarketClearing {
        let samples = self.scan(grid);
        let best = argmin_abs(samples.iter().map(|s| s.excess.eps1)).unwrap_or(0);
        let price = samples
            .get(best)
            .map(|s| s.price)
            .unwrap_or_else(|| grid.price_at(0));

        let agent_a = self.demand_a(price);
        let agent_b = self.demand_b(price);

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "market_clearing",
            index = best,
            price = price,
            x1a = agent_a.x1,
            x2a = agent_a.x2,
            x1b = agent_b.x1,
            x2b = agent_b.x2,
        );

        tracing::debug!(price, index = best, "market clearing price selected");

        MarketClearing {
            price,
            agent_a,
            agent_b,
        }
    }
}

fn cobb_douglas(share: f64, x1: f64, x2: f64) -> f64 {
    x1.powf(share) * x2.powf(1.0 - share)
}

/// Spend `share` of wealth on good 1 and the rest on good 2.
fn cobb_douglas_demand(share: f64, endowment: Bundle, p1: Price) -> Bundle {
    let income = endowment.value_at(p1);
    Bundle {
        x1: share * income / p1,
        x2: (1.0 - share) * income,
    }
}
