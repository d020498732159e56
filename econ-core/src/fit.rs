//! Exponential trend lines, `y = a * exp(b * x)`.
//!
//! Used to draw the fitted curve through a Phillips-curve scatter. The fit is
//! a plain Levenberg-Marquardt least-squares solve over the two parameters.

use polars::prelude::{DataFrame, DataType, IntoLazy, PolarsError, col};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// === CONSTANTS ===

/// Number of points on a rendered trend line.
pub const CURVE_POINTS: usize = 100;
/// Rendered curves extend this far past the data on both sides.
pub const CURVE_PADDING: f64 = 1.0;

#[derive(Debug, Error)]
pub enum FitError {
    #[error("need at least {needed} points to fit, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("x and y have different lengths ({x} vs {y})")]
    LengthMismatch { x: usize, y: usize },

    #[error("input contains non-finite values")]
    NonFinite,

    #[error("no convergence after {iterations} iterations")]
    NoConvergence { iterations: u32 },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub max_iterations: u32,
    /// Relative change in squared error (or step size) treated as converged.
    pub tolerance: f64,
    /// Starting `(a, b)`.
    pub initial: (f64, f64),
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-12,
            initial: (1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialFit {
    pub a: f64,
    pub b: f64,
    /// Sum of squared residuals at the solution.
    pub sse: f64,
}

impl ExponentialFit {
    pub fn eval(&self, x: f64) -> f64 {
        self.a * (self.b * x).exp()
    }

    /// Least-squares fit of `ys ≈ a * exp(b * xs)`.
    ///
    /// Solves from `options.initial` and from a log-linear seed (when the
    /// data allows one) and keeps whichever ends with the lower error.
    pub fn fit(xs: &[f64], ys: &[f64], options: &FitOptions) -> Result<Self, FitError> {
        if xs.len() != ys.len() {
            return Err(FitError::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
            });
        }
        if xs.len() < 2 {
            return Err(FitError::TooFewPoints {
                needed: 2,
                got: xs.len(),
            });
        }
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite);
        }

        let starts = std::iter::once(options.initial).chain(log_linear_seed(xs, ys));
        let best = starts
            .filter_map(|start| levenberg_marquardt(xs, ys, start, options))
            .min_by(|l, r| l.sse.total_cmp(&r.sse));

        best.ok_or(FitError::NoConvergence {
            iterations: options.max_iterations,
        })
    }

    /// `CURVE_POINTS` evenly spaced x values spanning the data plus padding,
    /// and the fitted y at each.
    pub fn curve(&self, xs: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let lo = xs.iter().copied().fold(f64::INFINITY, f64::min) - CURVE_PADDING;
        let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max) + CURVE_PADDING;
        let curve_x = linspace(lo, hi, CURVE_POINTS);
        let curve_y = curve_x.iter().map(|&x| self.eval(x)).collect();
        (curve_x, curve_y)
    }
}

/// Fitted trend line through two frame columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCurve {
    pub fit: ExponentialFit,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Fit an exponential trend through `y_column` against `x_column`, skipping
/// rows where either is missing or NaN. With the merged indicator frame this is the
/// Phillips curve: unemployment on x, inflation on y.
pub fn phillips_curve(
    frame: &DataFrame,
    x_column: &str,
    y_column: &str,
) -> Result<FittedCurve, FitError> {
    let pairs = frame
        .clone()
        .lazy()
        .select([
            col(x_column).cast(DataType::Float64).alias("x"),
            col(y_column).cast(DataType::Float64).alias("y"),
        ])
        .filter(col("x").is_not_null().and(col("y").is_not_null()))
        .collect()?;

    let (xs, ys): (Vec<f64>, Vec<f64>) = pairs
        .column("x")?
        .f64()?
        .into_iter()
        .zip(pairs.column("y")?.f64()?)
        .filter_map(|(x, y)| Some((x?, y?)))
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .unzip();

    let fit = ExponentialFit::fit(&xs, &ys, &FitOptions::default())?;
    let (x, y) = fit.curve(&xs);

    tracing::debug!(x_column, y_column, rows = xs.len(), a = fit.a, b = fit.b, "fitted trend");

    Ok(FittedCurve { fit, x, y })
}

pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => (0..n)
            .map(|i| lo + (hi - lo) * (i as f64) / ((n - 1) as f64))
            .collect(),
    }
}

fn sum_squared_error(xs: &[f64], ys: &[f64], a: f64, b: f64) -> f64 {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let r = a * (b * x).exp() - y;
            r * r
        })
        .sum()
}

/// OLS of `ln y` on `x` over the positive-y points.
fn log_linear_seed(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    let pts: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|&(_, &y)| y > 0.0)
        .map(|(&x, &y)| (x, y.ln()))
        .collect();
    if pts.len() < 2 {
        return None;
    }
    let n = pts.len() as f64;
    let mean_x = pts.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pts.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = pts.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx <= 0.0 {
        return None;
    }
    let sxy: f64 = pts.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();
    let b = sxy / sxx;
    let a = (mean_y - b * mean_x).exp();
    Some((a, b))
}

fn levenberg_marquardt(
    xs: &[f64],
    ys: &[f64],
    start: (f64, f64),
    options: &FitOptions,
) -> Option<ExponentialFit> {
    const LAMBDA_MAX: f64 = 1e12;

    let (mut a, mut b) = start;
    let mut sse = sum_squared_error(xs, ys, a, b);
    if !sse.is_finite() {
        return None;
    }
    let mut lambda = 1e-3;
    let tol = options.tolerance;

    for _ in 0..options.max_iterations {
        // J^T J and J^T r for residuals r = a*exp(bx) - y
        let mut jtj = [[0.0; 2]; 2];
        let mut jtr = [0.0; 2];
        for (&x, &y) in xs.iter().zip(ys) {
            let e = (b * x).exp();
            let r = a * e - y;
            let j = [e, a * x * e];
            for row in 0..2 {
                jtr[row] += j[row] * r;
                for c in 0..2 {
                    jtj[row][c] += j[row] * j[c];
                }
            }
        }

        loop {
            let m00 = jtj[0][0] + lambda * jtj[0][0].max(1e-12);
            let m11 = jtj[1][1] + lambda * jtj[1][1].max(1e-12);
            let m01 = jtj[0][1];
            let det = m00 * m11 - m01 * m01;

            if det.is_finite() && det.abs() > f64::MIN_POSITIVE {
                let da = (-jtr[0] * m11 + jtr[1] * m01) / det;
                let db = (-jtr[1] * m00 + jtr[0] * m01) / det;
                let (na, nb) = (a + da, b + db);
                let new_sse = sum_squared_error(xs, ys, na, nb);

                if new_sse.is_finite() && new_sse <= sse {
                    let small_gain = sse - new_sse <= tol * sse.max(tol);
                    let small_step =
                        da.abs() <= tol * (a.abs() + tol) && db.abs() <= tol * (b.abs() + tol);
                    a = na;
                    b = nb;
                    sse = new_sse;
                    lambda = (lambda / 10.0).max(1e-15);
                    if small_gain || small_step {
                        return Some(ExponentialFit { a, b, sse });
                    }
                    break;
                }
            }

            lambda *= 10.0;
            if lambda > LAMBDA_MAX {
                // No descent direction left: current point is a minimum.
                return Some(ExponentialFit { a, b, sse });
            }
        }
    }

    None
}
