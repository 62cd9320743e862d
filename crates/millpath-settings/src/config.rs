//! Configuration file model.
//!
//! A [`Config`] is split into `solver`, `mesh` and `clearing` sections and is
//! stored as JSON or TOML depending on the file extension. Every section has
//! defaults, so a file only needs to list the values it changes.

use crate::error::{ConfigError, SettingsError, SettingsResult};
use millpath_camtools::{ClearingParameters, ClearingPlanner, CurveFollowParameters};
use millpath_core::NewtonOptions;
use millpath_optim::{AdamOptions, InteriorPointOptions, RiccatiOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Tolerances and iteration caps for every iterative solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SolverSettings {
    pub newton: NewtonOptions,
    pub adam: AdamOptions,
    pub interior_point: InteriorPointOptions,
    pub riccati: RiccatiOptions,
}

/// Sampling density for medial axes and curves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Samples per medial axis segment, minus one
    pub medial_steps: usize,
    /// Positions sampled along a followed curve
    pub curve_samples: usize,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            medial_steps: ClearingParameters::default().medial_steps,
            curve_samples: CurveFollowParameters::default().samples,
        }
    }
}

/// Tool and depth settings for pocket clearing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearingSettings {
    /// Cutter radius (mm)
    pub tool_radius: f64,
    /// Upper bound on radial engagement per pass (mm)
    pub max_engagement: f64,
    /// Depth removed per level (mm)
    pub step_down: f64,
    /// Final pocket depth (mm)
    pub total_depth: f64,
    pub optimize_engagement: bool,
    pub smoothing: f64,
    pub include_skeleton: bool,
}

impl Default for ClearingSettings {
    fn default() -> Self {
        let params = ClearingParameters::default();
        Self {
            tool_radius: params.tool_radius,
            max_engagement: params.max_engagement,
            step_down: params.step_down,
            total_depth: params.total_depth,
            optimize_engagement: params.optimize_engagement,
            smoothing: params.smoothing,
            include_skeleton: params.include_skeleton,
        }
    }
}

/// Complete toolkit configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub solver: SolverSettings,
    pub mesh: MeshSettings,
    pub clearing: ClearingSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(format!(
            "{} (config file must be .json or .toml)",
            other.unwrap_or("no extension")
        ))
        .into()),
    }
}

fn require_positive(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::InvalidSetting {
            key: key.to_string(),
            reason: format!("must be > 0, got {value}"),
        })
    }
}

fn require_nonzero(key: &str, value: usize) -> SettingsResult<()> {
    if value == 0 {
        return Err(SettingsError::InvalidSetting {
            key: key.to_string(),
            reason: "must be > 0".to_string(),
        });
    }
    Ok(())
}

/// Check `0 <= value < 1`.
fn require_fraction(key: &str, value: f64) -> SettingsResult<()> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into())
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("cannot read {}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)
                .map_err(|e| SettingsError::SaveError(format!("cannot encode TOML: {}", e)))?,
        };

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("cannot write {}: {}", path.display(), e))
        })?;
        debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let newton = &self.solver.newton;
        require_positive("solver.newton.tolerance", newton.tolerance)?;
        require_nonzero("solver.newton.max_iter", newton.max_iter)?;

        let adam = &self.solver.adam;
        require_positive("solver.adam.learning_rate", adam.learning_rate)?;
        require_nonzero("solver.adam.max_iter", adam.max_iter)?;
        require_fraction("solver.adam.beta1", adam.beta1)?;
        require_fraction("solver.adam.beta2", adam.beta2)?;
        require_positive("solver.adam.epsilon", adam.epsilon)?;
        require_positive("solver.adam.gradient_tolerance", adam.gradient_tolerance)?;

        let ip = &self.solver.interior_point;
        require_positive("solver.interior_point.mu0", ip.mu0)?;
        require_positive("solver.interior_point.mu_factor", ip.mu_factor)?;
        require_fraction("solver.interior_point.mu_factor", ip.mu_factor)?;
        require_positive("solver.interior_point.tolerance", ip.tolerance)?;
        require_nonzero("solver.interior_point.max_outer_iter", ip.max_outer_iter)?;
        require_nonzero("solver.interior_point.max_inner_iter", ip.max_inner_iter)?;

        let riccati = &self.solver.riccati;
        require_positive("solver.riccati.tolerance", riccati.tolerance)?;
        require_nonzero("solver.riccati.max_iter", riccati.max_iter)?;

        require_nonzero("mesh.medial_steps", self.mesh.medial_steps)?;
        if self.mesh.curve_samples < 2 {
            return Err(SettingsError::InvalidSetting {
                key: "mesh.curve_samples".to_string(),
                reason: format!("must be at least 2, got {}", self.mesh.curve_samples),
            });
        }

        self.clearing_parameters().validate()?;
        Ok(())
    }

    /// Clearing parameters with the mesh section's sample count folded in.
    pub fn clearing_parameters(&self) -> ClearingParameters {
        let c = &self.clearing;
        ClearingParameters {
            tool_radius: c.tool_radius,
            max_engagement: c.max_engagement,
            step_down: c.step_down,
            total_depth: c.total_depth,
            medial_steps: self.mesh.medial_steps,
            optimize_engagement: c.optimize_engagement,
            smoothing: c.smoothing,
            include_skeleton: c.include_skeleton,
        }
    }

    /// Curve-following parameters using the configured sample count.
    pub fn curve_follow_parameters(&self) -> CurveFollowParameters {
        CurveFollowParameters {
            samples: self.mesh.curve_samples,
            ..Default::default()
        }
    }

    /// Build a planner wired to the configured LP and smoothing solvers.
    pub fn planner(&self) -> SettingsResult<ClearingPlanner> {
        let planner = ClearingPlanner::new(self.clearing_parameters())?
            .with_solver_options(self.solver.interior_point, self.solver.adam);
        Ok(planner)
    }
}
