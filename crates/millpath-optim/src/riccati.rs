//! Discrete algebraic Riccati equation and LQR gains.

use millpath_core::linalg::{add, invert, mat_mul, sub, sum_abs_diff, transpose};
use millpath_core::{Matrix, NumericError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Iteration cap and convergence threshold for [`solve_riccati_with`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiccatiOptions {
    pub max_iter: usize,
    /// Converged when the summed absolute change of `P` drops below this
    pub tolerance: f64,
}

impl Default for RiccatiOptions {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tolerance: 1e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiccatiSolution {
    pub p: Matrix,
    pub iterations: usize,
    pub converged: bool,
}

/// Iterate the Riccati recursion with an explicit iteration cap.
pub fn solve_riccati(
    a: &Matrix,
    b: &Matrix,
    q: &Matrix,
    r: &Matrix,
    max_iter: usize,
) -> Result<RiccatiSolution> {
    let options = RiccatiOptions {
        max_iter,
        ..Default::default()
    };
    solve_riccati_with(a, b, q, r, &options)
}

/// Iterate `P ← AᵀPA + Q - AᵀPB (R + BᵀPB)⁻¹ BᵀPA` from `P = Q`.
///
/// Shape errors and a singular `R + BᵀPB` are hard errors; running out of
/// iterations is reported through `converged`.
pub fn solve_riccati_with(
    a: &Matrix,
    b: &Matrix,
    q: &Matrix,
    r: &Matrix,
    options: &RiccatiOptions,
) -> Result<RiccatiSolution> {
    check_plant(a, b, q, r)?;

    let at = transpose(a);
    let bt = transpose(b);
    let mut p = q.clone();

    for iteration in 1..=options.max_iter {
        let atp = mat_mul(&at, &p)?;
        let atpa = mat_mul(&atp, a)?;
        let atpb = mat_mul(&atp, b)?;
        let btpa = mat_mul(&mat_mul(&bt, &p)?, a)?;
        let inner = add(r, &mat_mul(&mat_mul(&bt, &p)?, b)?)?;
        let correction = mat_mul(&mat_mul(&atpb, &invert(&inner)?)?, &btpa)?;
        let next = sub(&add(&atpa, q)?, &correction)?;

        let change = sum_abs_diff(&next, &p)?;
        p = next;
        if change < options.tolerance {
            debug!("Riccati converged after {} iterations", iteration);
            return Ok(RiccatiSolution {
                p,
                iterations: iteration,
                converged: true,
            });
        }
    }

    warn!(
        "Riccati iteration did not converge within {} iterations",
        options.max_iter
    );
    Ok(RiccatiSolution {
        p,
        iterations: options.max_iter,
        converged: false,
    })
}

/// `R⁻¹ Bᵀ P`.
pub fn compute_gain(b: &Matrix, r: &Matrix, p: &Matrix) -> Result<Matrix> {
    mat_mul(&mat_mul(&invert(r)?, &transpose(b))?, p)
}

/// Discrete-time LQR gain `(R + BᵀPB)⁻¹ BᵀPA`, the gain for which `u = -K x`
/// is optimal under the recursion in [`solve_riccati_with`].
pub fn discrete_lqr_gain(a: &Matrix, b: &Matrix, r: &Matrix, p: &Matrix) -> Result<Matrix> {
    let btp = mat_mul(&transpose(b), p)?;
    let inner = add(r, &mat_mul(&btp, b)?)?;
    mat_mul(&invert(&inner)?, &mat_mul(&btp, a)?)
}

fn check_plant(a: &Matrix, b: &Matrix, q: &Matrix, r: &Matrix) -> Result<()> {
    let n = a.rows();
    if !a.is_square() {
        return Err(NumericError::dimension(
            "riccati A",
            "square matrix",
            format!("{}x{}", a.rows(), a.cols()),
        ));
    }
    if b.rows() != n {
        return Err(NumericError::dimension(
            "riccati B",
            format!("{n} rows"),
            format!("{}x{}", b.rows(), b.cols()),
        ));
    }
    if q.shape() != (n, n) {
        return Err(NumericError::dimension(
            "riccati Q",
            format!("{n}x{n}"),
            format!("{}x{}", q.rows(), q.cols()),
        ));
    }
    let m = b.cols();
    if r.shape() != (m, m) {
        return Err(NumericError::dimension(
            "riccati R",
            format!("{m}x{m}"),
            format!("{}x{}", r.rows(), r.cols()),
        ));
    }
    Ok(())
}
