//! Numerical thresholds shared across the Millpath crates.

/// Smallest pivot magnitude accepted by Gauss-Jordan and Gaussian elimination.
pub const PIVOT_EPSILON: f64 = 1e-12;

/// Vectors shorter than this normalize to the zero vector.
pub const NORMALIZE_EPSILON: f64 = 1e-12;

/// Newton-Raphson stops when `|f'(x)|` falls below this.
pub const DERIVATIVE_EPSILON: f64 = 1e-14;

/// Default Newton-Raphson step tolerance.
pub const NEWTON_TOLERANCE: f64 = 1e-8;

/// Default Newton-Raphson iteration cap.
pub const NEWTON_MAX_ITER: usize = 50;

/// Tolerance for geometric predicates (collinearity, coincident points).
pub const GEOMETRY_EPSILON: f64 = 1e-12;
