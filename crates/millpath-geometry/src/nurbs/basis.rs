//! Cox-de Boor B-spline basis functions.
//!
//! `n` is always the number of control points, so a valid knot vector has
//! `n + degree + 1` entries and the parameter domain is
//! `[knots[degree], knots[n]]`.

use millpath_core::{NumericError, Result};

/// Check the knot vector against the control point count and degree.
pub fn validate_knots(knots: &[f64], degree: usize, n: usize) -> Result<()> {
    if n == 0 {
        return Err(NumericError::InvalidNurbs("no control points".into()));
    }
    if n <= degree {
        return Err(NumericError::InvalidNurbs(format!(
            "degree {degree} needs at least {} control points, got {n}",
            degree + 1
        )));
    }
    if knots.len() != n + degree + 1 {
        return Err(NumericError::InvalidNurbs(format!(
            "expected {} knots for {n} control points of degree {degree}, got {}",
            n + degree + 1,
            knots.len()
        )));
    }
    if knots.iter().any(|k| !k.is_finite()) {
        return Err(NumericError::InvalidNurbs("knot vector is not finite".into()));
    }
    if let Some(i) = knots.windows(2).position(|w| w[1] < w[0]) {
        return Err(NumericError::InvalidNurbs(format!(
            "knot vector decreases at index {}",
            i + 1
        )));
    }
    if knots[n] <= knots[degree] {
        return Err(NumericError::InvalidNurbs("parameter domain is empty".into()));
    }
    Ok(())
}

/// Valid parameter range `[knots[degree], knots[len - degree - 1]]`.
pub fn parameter_domain(knots: &[f64], degree: usize) -> Result<(f64, f64)> {
    if knots.len() < 2 * degree + 2 {
        return Err(NumericError::InvalidNurbs(format!(
            "{} knots cannot carry degree {degree}",
            knots.len()
        )));
    }
    Ok((knots[degree], knots[knots.len() - degree - 1]))
}

/// Index `i` of the non-empty span with `knots[i] <= t < knots[i + 1]`.
///
/// `t` is clamped to the domain first; at the upper end the last non-empty
/// span is returned. Knots must already be valid for `n` and `degree`.
pub fn find_span(knots: &[f64], degree: usize, n: usize, t: f64) -> usize {
    let (lo_t, hi_t) = (knots[degree], knots[n]);
    if t >= hi_t {
        return (degree..n)
            .rev()
            .find(|&i| knots[i] < knots[i + 1])
            .unwrap_or(n - 1);
    }
    if t <= lo_t {
        return (degree..n).find(|&i| knots[i] < knots[i + 1]).unwrap_or(degree);
    }

    let mut low = degree;
    let mut high = n;
    let mut mid = (low + high) / 2;
    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// All `n` basis values of the given degree at `t`.
///
/// `t` is clamped into the parameter domain rather than extrapolated.
pub fn basis_functions(knots: &[f64], t: f64, degree: usize, n: usize) -> Result<Vec<f64>> {
    if !t.is_finite() {
        return Err(NumericError::parameter("t", "parameter is not finite"));
    }
    validate_knots(knots, degree, n)?;
    Ok(cox_de_boor(knots, t, degree, n))
}

/// Basis evaluation for knots already checked by [`validate_knots`].
pub(crate) fn cox_de_boor(knots: &[f64], t: f64, degree: usize, n: usize) -> Vec<f64> {
    let t = t.clamp(knots[degree], knots[n]);
    let span = find_span(knots, degree, n, t);

    // Degree 0 over every knot interval, then raise the degree in place.
    let mut values = vec![0.0; knots.len() - 1];
    values[span] = 1.0;

    for p in 1..=degree {
        for i in 0..knots.len() - 1 - p {
            let left_den = knots[i + p] - knots[i];
            let right_den = knots[i + p + 1] - knots[i + 1];
            let left = if left_den > 0.0 {
                (t - knots[i]) / left_den * values[i]
            } else {
                0.0
            };
            let right = if right_den > 0.0 {
                (knots[i + p + 1] - t) / right_den * values[i + 1]
            } else {
                0.0
            };
            values[i] = left + right;
        }
    }

    values.truncate(n);
    values
}

/// Clamped knot vector with uniformly spaced interior knots on `[0, 1]`.
pub fn clamped_uniform_knots(n: usize, degree: usize) -> Result<Vec<f64>> {
    if n <= degree {
        return Err(NumericError::InvalidNurbs(format!(
            "degree {degree} needs at least {} control points, got {n}",
            degree + 1
        )));
    }
    let interior = n - degree;
    let mut knots = vec![0.0; degree + 1];
    knots.extend((1..interior).map(|i| i as f64 / interior as f64));
    knots.extend(std::iter::repeat_n(1.0, degree + 1));
    Ok(knots)
}
