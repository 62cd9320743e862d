//! NURBS curve evaluation.

use super::basis::{clamped_uniform_knots, cox_de_boor, parameter_domain, validate_knots};
use millpath_core::constants::{DERIVATIVE_EPSILON, NORMALIZE_EPSILON};
use millpath_core::{NumericError, Point3, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Step used for numerical curve and surface derivatives.
pub const DIFFERENCE_STEP: f64 = 1e-6;

/// A validated B-spline or NURBS curve.
///
/// Absent weights mean every control point has weight 1. Deserialized
/// curves go through the same validation as [`NurbsCurve::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNurbsCurve")]
pub struct NurbsCurve {
    control_points: Vec<Point3>,
    weights: Option<Vec<f64>>,
    degree: usize,
    knots: Vec<f64>,
}

#[derive(Deserialize)]
struct RawNurbsCurve {
    control_points: Vec<Point3>,
    weights: Option<Vec<f64>>,
    degree: usize,
    knots: Vec<f64>,
}

impl TryFrom<RawNurbsCurve> for NurbsCurve {
    type Error = NumericError;

    fn try_from(raw: RawNurbsCurve) -> Result<Self> {
        Self::new(raw.control_points, raw.weights, raw.degree, raw.knots)
    }
}

impl NurbsCurve {
    pub fn new(
        control_points: Vec<Point3>,
        weights: Option<Vec<f64>>,
        degree: usize,
        knots: Vec<f64>,
    ) -> Result<Self> {
        let curve = Self {
            control_points,
            weights,
            degree,
            knots,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// Non-rational curve on a clamped uniform knot vector over `[0, 1]`.
    pub fn clamped_uniform(control_points: Vec<Point3>, degree: usize) -> Result<Self> {
        let knots = clamped_uniform_knots(control_points.len(), degree)?;
        Self::new(control_points, None, degree, knots)
    }

    /// Re-check the knot count, knot order and weight positivity.
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.control_points.iter().position(|p| !p.is_finite()) {
            return Err(NumericError::InvalidNurbs(format!(
                "control point {bad} is not finite"
            )));
        }
        validate_knots(&self.knots, self.degree, self.control_points.len())?;
        if let Some(weights) = &self.weights {
            validate_weights(weights, self.control_points.len())?;
        }
        Ok(())
    }

    pub fn control_points(&self) -> &[Point3] {
        &self.control_points
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Parameter range the curve is defined on.
    pub fn domain(&self) -> (f64, f64) {
        // Validated on construction, so the knot vector is long enough.
        parameter_domain(&self.knots, self.degree).unwrap_or((0.0, 0.0))
    }
}

pub(crate) fn validate_weights(weights: &[f64], expected: usize) -> Result<()> {
    if weights.len() != expected {
        return Err(NumericError::InvalidNurbs(format!(
            "expected {expected} weights, got {}",
            weights.len()
        )));
    }
    if let Some(bad) = weights.iter().position(|w| !(w.is_finite() && *w > 0.0)) {
        return Err(NumericError::InvalidNurbs(format!(
            "weight {bad} must be finite and positive, got {}",
            weights[bad]
        )));
    }
    Ok(())
}

/// Weighted combination of `points`, falling back to their plain centroid
/// when the weighted basis sum vanishes.
pub(crate) fn rational_combination<'a>(
    terms: impl Iterator<Item = (&'a Point3, f64, f64)> + Clone,
) -> Point3 {
    let mut sum = Point3::zero();
    let mut weight_sum = 0.0;
    for (p, basis, weight) in terms.clone() {
        let w = basis * weight;
        sum = sum + *p * w;
        weight_sum += w;
    }
    if weight_sum.abs() > DERIVATIVE_EPSILON {
        return sum * (1.0 / weight_sum);
    }

    let mut count = 0usize;
    let centroid = terms.fold(Point3::zero(), |acc, (p, _, _)| {
        count += 1;
        acc + *p
    });
    if count == 0 {
        centroid
    } else {
        centroid * (1.0 / count as f64)
    }
}

/// Point on the curve at `t` (clamped into the domain).
pub fn evaluate_curve(curve: &NurbsCurve, t: f64) -> Point3 {
    let n = curve.control_points.len();
    let basis = cox_de_boor(&curve.knots, t, curve.degree, n);
    let weight = |i: usize| curve.weights.as_ref().map_or(1.0, |w| w[i]);
    rational_combination(
        curve
            .control_points
            .iter()
            .zip(basis.iter())
            .enumerate()
            .map(move |(i, (p, &b))| (p, b, weight(i))),
    )
}

/// Unit tangent at `t` by finite differences; zero where the curve stalls.
pub fn curve_tangent(curve: &NurbsCurve, t: f64) -> Point3 {
    let (lo, hi) = curve.domain();
    let t = t.clamp(lo, hi);
    let t0 = (t - DIFFERENCE_STEP).max(lo);
    let t1 = (t + DIFFERENCE_STEP).min(hi);
    if t1 <= t0 {
        return Point3::zero();
    }
    let d = evaluate_curve(curve, t1) - evaluate_curve(curve, t0);
    let length = d.length();
    if length < NORMALIZE_EPSILON {
        Point3::zero()
    } else {
        d * (1.0 / length)
    }
}

/// `count` points at uniformly spaced parameters across the whole domain.
pub fn sample_curve(curve: &NurbsCurve, count: usize) -> Vec<Point3> {
    let (lo, hi) = curve.domain();
    let points: Vec<Point3> = match count {
        0 => Vec::new(),
        1 => vec![evaluate_curve(curve, lo)],
        _ => (0..count)
            .map(|i| {
                let t = lo + (hi - lo) * i as f64 / (count - 1) as f64;
                evaluate_curve(curve, t)
            })
            .collect(),
    };
    debug!(
        "Sampled {} points on degree {} curve over [{}, {}]",
        points.len(),
        curve.degree,
        lo,
        hi
    );
    points
}
