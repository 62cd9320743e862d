//! # Millpath CAM Tools
//!
//! Toolpath pass generation on top of the geometry and optimization crates.
//! Produces ordered [`Pass`](millpath_core::Pass) lists for an external
//! G-code post-processor.
//!
//! - **Clearing**: pocket clearing from a region outline via the medial
//!   axis, with engagement bounded by a small LP and optional smoothing
//! - **Curve follow**: passes sampled along a NURBS curve

pub mod clearing;
pub mod curve_follow;
pub mod error;

pub use clearing::{
    smooth_sequence, BatchPlan, ClearingParameters, ClearingPlan, ClearingPlanner,
    RegionDiagnostic,
};
pub use curve_follow::{generate_curve_passes, CurveFollowParameters};
pub use error::{CamToolError, CamToolResult, ParameterError, ParameterResult};
