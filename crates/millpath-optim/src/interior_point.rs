//! Log-barrier interior point method for small linear programs.
//!
//! Minimizes `c·x` subject to `A x <= b` and `x > 0` by minimizing the
//! barrier function `c·x - mu * (sum log(b - A x) + sum log x)` for a
//! decreasing sequence of `mu`. Each inner step solves the barrier Newton
//! system in augmented form and backtracks (halving `alpha`) until the trial point stays
//! strictly feasible and decreases the barrier value.
//!
//! This is a best-effort heuristic, not a certified primal-dual solver: it
//! carries no optimality certificate and reports `converged: false` instead
//! of failing when it stalls on infeasible or unbounded problems.

use millpath_core::linalg::{dot, mat_vec, solve as solve_linear};
use millpath_core::{Matrix, NumericError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Barrier schedule and iteration caps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteriorPointOptions {
    /// Initial barrier weight
    pub mu0: f64,
    /// Multiplier applied to `mu` after each outer iteration
    pub mu_factor: f64,
    /// Target duality gap `(m + n) * mu`, also the inner Newton tolerance
    pub tolerance: f64,
    pub max_outer_iter: usize,
    pub max_inner_iter: usize,
}

impl Default for InteriorPointOptions {
    fn default() -> Self {
        Self {
            mu0: 10.0,
            mu_factor: 0.1,
            tolerance: 1e-8,
            max_outer_iter: 50,
            max_inner_iter: 100,
        }
    }
}

/// Outcome of an interior point run
#[derive(Debug, Clone, PartialEq)]
pub struct InteriorPointResult {
    pub x: Vec<f64>,
    /// `c·x` at the returned point
    pub objective: f64,
    /// Total inner (Newton) steps
    pub iterations: usize,
    pub outer_iterations: usize,
    pub converged: bool,
}

const MAX_BACKTRACKS: usize = 60;
const ARMIJO_SLOPE: f64 = 0.25;
const PURE_NEWTON_DECREMENT: f64 = 0.0625;
const START_SEARCH_STEPS: i32 = 30;

/// True when every row of `A x <= b` holds.
pub fn feasible(x: &[f64], a: &Matrix, b: &[f64]) -> Result<bool> {
    check_shapes(a, b, x.len(), "feasibility check")?;
    let ax = mat_vec(a, x)?;
    Ok(ax.iter().zip(b).all(|(lhs, rhs)| lhs <= rhs))
}

/// Minimize `c·x` with the default barrier schedule.
pub fn solve(c: &[f64], a: &Matrix, b: &[f64]) -> Result<InteriorPointResult> {
    solve_with(c, a, b, &InteriorPointOptions::default())
}

/// Minimize `c·x` starting from a searched strictly interior point.
///
/// Candidates `x = s·1` are tried for `s = 1, 1/2, 2, 1/4, 4, ...`. When none
/// is strictly interior the least-violating candidate is returned with
/// `converged: false`.
pub fn solve_with(
    c: &[f64],
    a: &Matrix,
    b: &[f64],
    options: &InteriorPointOptions,
) -> Result<InteriorPointResult> {
    check_shapes(a, b, c.len(), "interior point")?;

    let mut best: Option<(f64, Vec<f64>)> = None;
    for k in 0..=START_SEARCH_STEPS {
        for s in [0.5f64.powi(k), 2f64.powi(k)] {
            let x = vec![s; c.len()];
            let violation = max_violation(a, b, &x)?;
            if violation < 0.0 {
                return solve_from(c, a, b, &x, options);
            }
            if best.as_ref().is_none_or(|(v, _)| violation < *v) {
                best = Some((violation, x));
            }
        }
    }

    let x = best.map(|(_, x)| x).unwrap_or_default();
    warn!("No strictly interior starting point found for {} constraints", a.rows());
    Ok(InteriorPointResult {
        objective: dot(c, &x)?,
        x,
        iterations: 0,
        outer_iterations: 0,
        converged: false,
    })
}

/// Minimize `c·x` from a caller-supplied strictly interior `x0`.
pub fn solve_from(
    c: &[f64],
    a: &Matrix,
    b: &[f64],
    x0: &[f64],
    options: &InteriorPointOptions,
) -> Result<InteriorPointResult> {
    check_shapes(a, b, c.len(), "interior point")?;
    if x0.len() != c.len() {
        return Err(NumericError::dimension(
            "interior point start",
            format!("length {}", c.len()),
            format!("length {}", x0.len()),
        ));
    }
    if max_violation(a, b, x0)? >= 0.0 {
        return Err(NumericError::parameter(
            "x0",
            "starting point must satisfy A x < b and x > 0 strictly",
        ));
    }
    let mu_factor_ok = options.mu_factor > 0.0 && options.mu_factor < 1.0;
    if !(options.mu0 > 0.0 && mu_factor_ok) {
        return Err(NumericError::parameter(
            "mu",
            "mu0 must be positive and mu_factor within (0, 1)",
        ));
    }

    let constraints = (a.rows() + c.len()) as f64;
    let mut x = x0.to_vec();
    let mut mu = options.mu0;
    let mut iterations = 0;
    let mut outer_iterations = 0;
    let mut converged = false;

    while outer_iterations < options.max_outer_iter {
        outer_iterations += 1;
        let centered = center(c, a, b, &mut x, mu, options, &mut iterations)?;

        if centered && constraints * mu < options.tolerance {
            converged = true;
            break;
        }
        mu *= options.mu_factor;
    }

    let objective = dot(c, &x)?;
    debug!(
        "Interior point: objective {} after {} outer / {} inner iterations (converged: {})",
        objective, outer_iterations, iterations, converged
    );
    Ok(InteriorPointResult {
        x,
        objective,
        iterations,
        outer_iterations,
        converged,
    })
}

fn check_shapes(a: &Matrix, b: &[f64], n: usize, operation: &'static str) -> Result<()> {
    if a.cols() != n || a.rows() != b.len() {
        return Err(NumericError::dimension(
            operation,
            format!("A with {n} columns and {} rows", b.len()),
            format!("A of {}x{}", a.rows(), a.cols()),
        ));
    }
    Ok(())
}

/// Largest of `(A x - b)_i` and `-x_j`; negative means strictly interior.
fn max_violation(a: &Matrix, b: &[f64], x: &[f64]) -> Result<f64> {
    let ax = mat_vec(a, x)?;
    let rows = ax.iter().zip(b).map(|(lhs, rhs)| lhs - rhs);
    Ok(rows
        .chain(x.iter().map(|v| -v))
        .fold(f64::NEG_INFINITY, f64::max))
}

/// Barrier value, or `None` outside the strict interior.
fn barrier_value(c: &[f64], a: &Matrix, b: &[f64], x: &[f64], mu: f64) -> Result<Option<f64>> {
    if x.iter().any(|&v| v <= 0.0) {
        return Ok(None);
    }
    let ax = mat_vec(a, x)?;
    let mut log_sum = 0.0;
    for (lhs, rhs) in ax.iter().zip(b) {
        let slack = rhs - lhs;
        if slack <= 0.0 {
            return Ok(None);
        }
        log_sum += slack.ln();
    }
    log_sum += x.iter().map(|v| v.ln()).sum::<f64>();
    Ok(Some(dot(c, x)? - mu * log_sum))
}

/// Newton iterations on the barrier function for fixed `mu`.
///
/// Returns true once the Newton decrement falls below the tolerance.
fn center(
    c: &[f64],
    a: &Matrix,
    b: &[f64],
    x: &mut Vec<f64>,
    mu: f64,
    options: &InteriorPointOptions,
    iterations: &mut usize,
) -> Result<bool> {
    let n = c.len();
    let m = a.rows();

    for _ in 0..options.max_inner_iter {
        let ax = mat_vec(a, x)?;
        let slack: Vec<f64> = b.iter().zip(&ax).map(|(rhs, lhs)| rhs - lhs).collect();

        // Gradient of the barrier function divided by mu.
        let mut gradient: Vec<f64> = (0..n).map(|j| c[j] / mu - 1.0 / x[j]).collect();
        for i in 0..m {
            for j in 0..n {
                gradient[j] += a[(i, j)] / slack[i];
            }
        }

        // Newton step from the augmented system
        //   [ X⁻²  Aᵀ  ] [d]   [-g]
        //   [ A   -S²  ] [w] = [ 0]
        // which avoids forming Aᵀ S⁻² A, whose entries blow up as the
        // slacks shrink.
        let mut kkt = Matrix::zeros(n + m, n + m)?;
        for j in 0..n {
            kkt[(j, j)] = 1.0 / (x[j] * x[j]);
        }
        for i in 0..m {
            for j in 0..n {
                kkt[(j, n + i)] = a[(i, j)];
                kkt[(n + i, j)] = a[(i, j)];
            }
            kkt[(n + i, n + i)] = -slack[i] * slack[i];
        }
        let mut rhs: Vec<f64> = gradient.iter().map(|g| -g).collect();
        rhs.resize(n + m, 0.0);

        let step: Vec<f64> = match solve_linear(&kkt, &rhs) {
            Ok(mut solution) => {
                solution.truncate(n);
                solution
            }
            // Fall back to the diagonally scaled gradient.
            Err(_) => (0..n).map(|j| -gradient[j] * x[j] * x[j]).collect(),
        };

        // Squared Newton decrement of the barrier function divided by mu
        let decrement = -dot(&gradient, &step)?;
        if decrement / 2.0 <= options.tolerance {
            return Ok(true);
        }
        // Close to the centre the full step is feasible and rounding can
        // swamp the sufficient decrease test.
        let pure_newton = decrement < PURE_NEWTON_DECREMENT;

        let current = barrier_value(c, a, b, x, mu)?.unwrap_or(f64::INFINITY);
        let mut alpha = 1.0;
        let mut accepted = false;
        for _ in 0..MAX_BACKTRACKS {
            let trial: Vec<f64> = x.iter().zip(&step).map(|(xi, di)| xi + alpha * di).collect();
            if let Some(value) = barrier_value(c, a, b, &trial, mu)? {
                if pure_newton || value <= current - ARMIJO_SLOPE * alpha * decrement * mu {
                    *x = trial;
                    accepted = true;
                    break;
                }
            }
            alpha /= 2.0;
        }
        *iterations += 1;
        if !accepted {
            debug!("Interior point line search stalled at mu = {}", mu);
            return Ok(false);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feasible() {
        let a = Matrix::from_rows(&[vec![1.0, 1.0]]).unwrap();
        assert!(feasible(&[1.0, 2.0], &a, &[3.0]).unwrap());
        assert!(!feasible(&[2.0, 2.0], &a, &[3.0]).unwrap());
        assert!(feasible(&[1.0], &a, &[3.0]).is_err());
    }

    #[test]
    fn test_one_dimensional_bound() {
        // maximize x subject to x <= 5
        let a = Matrix::from_rows(&[vec![1.0]]).unwrap();
        let result = solve(&[-1.0], &a, &[5.0]).unwrap();
        assert!(result.converged);
        assert!((result.x[0] - 5.0).abs() < 1e-6);
        assert!(result.x[0] < 5.0);
    }

    #[test]
    fn test_start_search_finds_lower_bounded_region() {
        // 1.5 <= x <= 3, minimize x; x = 1 is outside, x = 2 is interior
        let a = Matrix::from_rows(&[vec![-1.0], vec![1.0]]).unwrap();
        let result = solve(&[1.0], &a, &[-1.5, 3.0]).unwrap();
        assert!(result.converged);
        assert!((result.x[0] - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible_problem_is_not_converged() {
        // x <= -1 with x > 0
        let a = Matrix::from_rows(&[vec![1.0]]).unwrap();
        let result = solve(&[1.0], &a, &[-1.0]).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_solve_from_rejects_boundary_start() {
        let a = Matrix::from_rows(&[vec![1.0]]).unwrap();
        let options = InteriorPointOptions::default();
        assert!(matches!(
            solve_from(&[1.0], &a, &[5.0], &[5.0], &options),
            Err(NumericError::InvalidParameter { .. })
        ));
    }
}
