//! # Millpath
//!
//! A numerical geometry and optimization toolkit for CNC toolpath generation:
//! - Delaunay triangulation, Voronoi diagrams and medial-axis clearing passes
//! - NURBS curve and surface evaluation
//! - FFT-based surface profile analysis
//! - Adam, log-barrier interior point, Kalman filtering and discrete LQR
//!
//! ## Architecture
//!
//! Millpath is organized as a workspace with multiple crates:
//!
//! 1. **millpath-core** - Points, passes, errors, linear algebra, root finding
//! 2. **millpath-signal** - FFT and spectrum analysis
//! 3. **millpath-geometry** - Planar meshing and NURBS evaluation
//! 4. **millpath-optim** - Optimizers, estimators and Riccati solvers
//! 5. **millpath-camtools** - Pocket clearing and curve-following passes
//! 6. **millpath-settings** - JSON/TOML configuration
//!
//! Passes are handed to an external post-processor; this crate does not
//! emit G-code.

pub use millpath_camtools as camtools;
pub use millpath_core as core;
pub use millpath_geometry as geometry;
pub use millpath_optim as optim;
pub use millpath_settings as settings;
pub use millpath_signal as signal;

pub use millpath_core::{
    Matrix, NumericError, Pass, PassMetadata, PassStrategy, Point2, Point3, Result,
};

pub use millpath_geometry::{
    compute_voronoi, evaluate_curve, evaluate_surface, extract_medial_axis, triangulate,
    NurbsCurve, NurbsSurface, VoronoiDiagram,
};

pub use millpath_camtools::{
    generate_curve_passes, BatchPlan, CamToolError, ClearingParameters, ClearingPlan,
    ClearingPlanner, CurveFollowParameters,
};

pub use millpath_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Initialize logging as one JSON object per line, for batch jobs whose
/// output is collected by a log pipeline.
pub fn init_json_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_installs_once() {
        assert!(init_logging().is_ok());
        assert!(init_logging().is_err());
        assert!(init_json_logging().is_err());
    }
}
