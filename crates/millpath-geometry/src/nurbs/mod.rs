//! B-spline and NURBS curve/surface evaluation.

pub mod basis;
pub mod curve;
pub mod surface;

pub use basis::{basis_functions, clamped_uniform_knots, find_span, parameter_domain};
pub use curve::{curve_tangent, evaluate_curve, sample_curve, NurbsCurve};
pub use surface::{evaluate_surface, surface_normal, NurbsSurface};
