use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::types::Price;

// === CONSTANTS ===

pub const PRICE_GRID_MIN: Price = 0.5;
pub const PRICE_GRID_MAX: Price = 2.5;
pub const PRICE_GRID_STEPS: usize = 500;

// === PRICE GRID ===

/// Equally spaced candidate prices `min, min + step, ..., max` (`steps + 1` points).
///
/// The default interval is tuned to the default economy. It is not derived
/// from the parameters, so an equilibrium outside it resolves to a boundary
/// sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct PriceGrid {
    pub min: Price,
    pub max: Price,
    pub steps: usize,
}

impl Default for PriceGrid {
    fn default() -> Self {
        Self {
            min: PRICE_GRID_MIN,
            max: PRICE_GRID_MAX,
            steps: PRICE_GRID_STEPS,
        }
    }
}

impl PriceGrid {
    pub fn new(min: Price, max: Price, steps: usize) -> Self {
        Self { min, max, steps }
    }

    pub fn len(&self) -> usize {
        self.steps + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn step(&self) -> Price {
        if self.steps == 0 {
            return 0.0;
        }
        (self.max - self.min) / self.steps as f64
    }

    /// Price of grid point `i`. Computed from the bounds each time rather than
    /// by accumulating steps, so the last point is exactly `max`.
    pub fn price_at(&self, i: usize) -> Price {
        if self.steps == 0 {
            return self.min;
        }
        self.min + (self.max - self.min) * (i as f64) / (self.steps as f64)
    }

    pub fn prices(&self) -> impl Iterator<Item = Price> + '_ {
        (0..self.len()).map(|i| self.price_at(i))
    }
}

// === ARGMIN ===

/// Index of the value with the smallest magnitude.
///
/// Left-to-right scan with a strict comparison: ties keep the earliest index.
/// A NaN wins over any number and the first NaN is kept, matching the usual
/// array `argmin` semantics. Returns `None` for an empty input.
pub fn argmin_abs<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        let magnitude = v.abs();
        let replace = match best {
            None => true,
            Some((_, b)) if b.is_nan() => false,
            Some((_, b)) => magnitude.is_nan() || magnitude < b,
        };
        if replace {
            best = Some((i, magnitude));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_shape() {
        let grid = PriceGrid::default();
        assert_eq!(grid.len(), 501);
        assert!((grid.step() - 0.004).abs() < 1e-15);
        assert_eq!(grid.price_at(0), 0.5);
        assert_eq!(grid.price_at(500), 2.5);
        assert_eq!(grid.price_at(111), 0.944);
    }

    #[test]
    fn prices_are_ascending() {
        let prices: Vec<_> = PriceGrid::default().prices().collect();
        assert_eq!(prices.len(), 501);
        assert!(prices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn zero_step_grid_is_single_point() {
        let grid = PriceGrid::new(1.5, 2.0, 0);
        assert_eq!(grid.prices().collect::<Vec<_>>(), vec![1.5]);
    }

    #[test]
    fn argmin_picks_smallest_magnitude() {
        assert_eq!(argmin_abs([0.3, -0.1, 0.2]), Some(1));
    }

    #[test]
    fn argmin_ties_keep_first() {
        assert_eq!(argmin_abs([0.5, 0.25, -0.25, 0.25]), Some(1));
        assert_eq!(argmin_abs([0.0, 0.0]), Some(0));
    }

    #[test]
    fn argmin_nan_wins() {
        assert_eq!(argmin_abs([0.1, f64::NAN, 0.0, f64::NAN]), Some(1));
    }

    #[test]
    fn argmin_empty() {
        assert_eq!(argmin_abs(std::iter::empty()), None);
    }
}
