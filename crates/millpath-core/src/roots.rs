//! Newton-Raphson scalar root finding.
//!
//! Failure to converge is not an error: the result carries a `converged`
//! flag so callers can fall back to a default or retry with other options.

use crate::constants::{DERIVATIVE_EPSILON, NEWTON_MAX_ITER, NEWTON_TOLERANCE};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stopping rules for [`solve_with`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonOptions {
    /// Converged once `|Δx|` drops below this
    pub tolerance: f64,
    /// Hard cap on iterations
    pub max_iter: usize,
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self {
            tolerance: NEWTON_TOLERANCE,
            max_iter: NEWTON_MAX_ITER,
        }
    }
}

/// Outcome of a Newton-Raphson run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonResult {
    /// Last iterate
    pub x: f64,
    /// Number of Newton steps taken
    pub iterations: usize,
    pub converged: bool,
}

/// Solve `f(x) = 0` from `x0` with the default tolerance (1e-8) and cap (50).
pub fn solve<F, D>(f: F, df: D, x0: f64) -> NewtonResult
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    solve_with(f, df, x0, &NewtonOptions::default())
}

/// Solve `f(x) = 0` by iterating `x ← x - f(x)/f'(x)`.
///
/// Stops with `converged: false` when `|f'(x)|` vanishes, the iterate stops
/// being finite, or `max_iter` steps have been taken.
pub fn solve_with<F, D>(f: F, df: D, x0: f64, options: &NewtonOptions) -> NewtonResult
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut x = x0;

    for iteration in 1..=options.max_iter {
        let slope = df(x);
        if slope.abs() < DERIVATIVE_EPSILON {
            debug!("Newton-Raphson derivative vanished at x={} after {} steps", x, iteration - 1);
            return NewtonResult {
                x,
                iterations: iteration - 1,
                converged: false,
            };
        }

        let step = f(x) / slope;
        x -= step;

        if !x.is_finite() {
            debug!("Newton-Raphson diverged after {} steps", iteration);
            return NewtonResult {
                x,
                iterations: iteration,
                converged: false,
            };
        }
        if step.abs() < options.tolerance {
            return NewtonResult {
                x,
                iterations: iteration,
                converged: true,
            };
        }
    }

    debug!("Newton-Raphson hit iteration cap {}", options.max_iter);
    NewtonResult {
        x,
        iterations: options.max_iter,
        converged: false,
    }
}
