//! Pocket clearing planner
//!
//! Turns a closed region outline into an ordered list of clearing passes:
//! boundary → Voronoi diagram → approximate medial axis → offset passes,
//! repeated for every step-down level.

use crate::error::{CamToolError, CamToolResult, ParameterError, ParameterResult};
use millpath_core::{Matrix, Pass, Point2};
use millpath_geometry::mesh::medial_axis::DEFAULT_MEDIAL_STEPS;
use millpath_geometry::{
    compute_voronoi, extract_medial_axis_with, generate_offset_passes, generate_skeleton_passes,
    interior_skeleton,
};
use millpath_optim::interior_point::{self, InteriorPointOptions};
use millpath_optim::{adam_optimize_with, AdamOptions};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const MAX_MEDIAL_STEPS: usize = 1000;
const MAX_DEPTH_LEVELS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearingParameters {
    /// Cutter radius (mm)
    pub tool_radius: f64,
    /// Upper bound on radial engagement per pass (mm)
    pub max_engagement: f64,
    /// Depth removed per level (mm)
    pub step_down: f64,
    /// Final pocket depth below z = 0 (mm)
    pub total_depth: f64,
    /// Samples per medial axis segment, minus one
    pub medial_steps: usize,
    /// Bound the engagement by the tool radius through the LP solver
    pub optimize_engagement: bool,
    /// Smoothing weight for engagement along each segment; 0 disables it
    pub smoothing: f64,
    /// Also emit passes at interior Voronoi vertices
    pub include_skeleton: bool,
}

impl Default for ClearingParameters {
    fn default() -> Self {
        Self {
            tool_radius: 3.0,
            max_engagement: 2.0,
            step_down: 1.0,
            total_depth: 1.0,
            medial_steps: DEFAULT_MEDIAL_STEPS,
            optimize_engagement: true,
            smoothing: 0.0,
            include_skeleton: false,
        }
    }
}

impl ClearingParameters {
    pub fn validate(&self) -> ParameterResult<()> {
        ParameterError::require_positive("tool_radius", self.tool_radius)?;
        ParameterError::require_positive("max_engagement", self.max_engagement)?;
        ParameterError::require_positive("step_down", self.step_down)?;
        ParameterError::require_positive("total_depth", self.total_depth)?;
        if self.medial_steps == 0 || self.medial_steps > MAX_MEDIAL_STEPS {
            return Err(ParameterError::OutOfRange {
                name: "medial_steps".to_string(),
                value: self.medial_steps as f64,
                min: 1.0,
                max: MAX_MEDIAL_STEPS as f64,
            });
        }
        let levels = self.level_count();
        if levels > MAX_DEPTH_LEVELS as f64 {
            return Err(ParameterError::OutOfRange {
                name: "total_depth / step_down".to_string(),
                value: levels,
                min: 1.0,
                max: MAX_DEPTH_LEVELS as f64,
            });
        }
        if !self.smoothing.is_finite() || self.smoothing < 0.0 {
            return Err(ParameterError::InvalidValue {
                name: "smoothing".to_string(),
                reason: format!("must be zero or positive, got {}", self.smoothing),
            });
        }
        Ok(())
    }

    fn level_count(&self) -> f64 {
        (self.total_depth / self.step_down - 1e-9).ceil().max(1.0)
    }

    /// Z of every cutting level, shallowest first.
    pub fn depth_levels(&self) -> Vec<f64> {
        let count = self.level_count().min(MAX_DEPTH_LEVELS as f64) as usize;
        (1..=count)
            .map(|k| -(k as f64 * self.step_down).min(self.total_depth))
            .collect()
    }
}

/// Passes for one region plus the values used to size them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearingPlan {
    pub passes: Vec<Pass>,
    /// Engagement cap applied to every pass (mm)
    pub engagement_limit: f64,
    pub levels: Vec<f64>,
    pub medial_segments: usize,
}

impl ClearingPlan {
    pub fn to_json(&self) -> CamToolResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A region that [`ClearingPlanner::plan_regions`] had to skip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDiagnostic {
    pub region: usize,
    pub message: String,
}

/// Combined output of a multi-region run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchPlan {
    /// Passes of every planned region, in region order
    pub passes: Vec<Pass>,
    pub planned_regions: usize,
    pub diagnostics: Vec<RegionDiagnostic>,
}

#[derive(Debug, Clone)]
pub struct ClearingPlanner {
    params: ClearingParameters,
    interior_point: InteriorPointOptions,
    adam: AdamOptions,
}

impl ClearingPlanner {
    pub fn new(params: ClearingParameters) -> CamToolResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            interior_point: InteriorPointOptions::default(),
            adam: AdamOptions::default(),
        })
    }

    pub fn with_solver_options(
        mut self,
        interior_point: InteriorPointOptions,
        adam: AdamOptions,
    ) -> Self {
        self.interior_point = interior_point;
        self.adam = adam;
        self
    }

    pub fn params(&self) -> &ClearingParameters {
        &self.params
    }

    /// Plan all passes for a single closed region.
    pub fn plan(&self, boundary: &[Point2]) -> CamToolResult<ClearingPlan> {
        check_boundary(boundary)?;
        let p = &self.params;

        let diagram = compute_voronoi(boundary);
        let medial = extract_medial_axis_with(&diagram, boundary, p.medial_steps);
        let limit = self.engagement_limit()?;

        let mut level_passes = generate_offset_passes(&medial, p.tool_radius, limit);
        if p.smoothing > 0.0 {
            self.smooth_engagement(&mut level_passes, limit)?;
        }
        if p.include_skeleton {
            let skeleton = interior_skeleton(&diagram, boundary);
            level_passes.extend(generate_skeleton_passes(&skeleton, p.tool_radius, limit));
        }

        let levels = p.depth_levels();
        let passes: Vec<Pass> = levels
            .iter()
            .flat_map(|&z| level_passes.iter().map(move |pass| pass.with_z(z)))
            .collect();

        info!(
            "Planned {} passes over {} levels (engagement limit {:.3})",
            passes.len(),
            levels.len(),
            limit
        );
        Ok(ClearingPlan {
            passes,
            engagement_limit: limit,
            levels,
            medial_segments: medial.len(),
        })
    }

    /// Plan several regions, skipping any that fail.
    ///
    /// A failing region is recorded as a diagnostic; the remaining regions
    /// are still planned.
    pub fn plan_regions(&self, regions: &[Vec<Point2>]) -> BatchPlan {
        let mut batch = BatchPlan::default();
        for (region, boundary) in regions.iter().enumerate() {
            match self.plan(boundary) {
                Ok(plan) => {
                    batch.passes.extend(plan.passes);
                    batch.planned_regions += 1;
                }
                Err(e) => {
                    warn!("Skipping region {}: {}", region, e);
                    batch.diagnostics.push(RegionDiagnostic {
                        region,
                        message: e.to_string(),
                    });
                }
            }
        }
        batch
    }

    /// Largest engagement allowed by both the configured maximum and the
    /// tool radius.
    ///
    /// With `optimize_engagement` the bound comes from the LP
    /// `max e s.t. e <= max_engagement, e <= tool_radius`; if the solver
    /// does not converge the closed form is used instead.
    pub fn engagement_limit(&self) -> CamToolResult<f64> {
        let p = &self.params;
        let closed_form = p.max_engagement.min(p.tool_radius);
        if !p.optimize_engagement {
            return Ok(closed_form);
        }

        let a = Matrix::from_rows(&[vec![1.0], vec![1.0]])?;
        let b = [p.max_engagement, p.tool_radius];
        let result = interior_point::solve_with(&[-1.0], &a, &b, &self.interior_point)?;
        if !result.converged {
            warn!("Engagement LP did not converge, using {}", closed_form);
            return Ok(closed_form);
        }
        let limit = result.x[0].clamp(0.0, closed_form);
        debug!("Engagement LP limit {} after {} steps", limit, result.iterations);
        Ok(limit)
    }

    /// Smooth engagement along each medial segment with Adam, keeping every
    /// value within `[0, limit]`.
    fn smooth_engagement(&self, passes: &mut [Pass], limit: f64) -> CamToolResult<()> {
        let weight = self.params.smoothing;
        for run in passes.chunk_by_mut(|a, b| a.metadata.segment == b.metadata.segment) {
            if run.len() < 3 {
                continue;
            }
            let target: Vec<f64> = run.iter().map(|p| p.engagement.unwrap_or(0.0)).collect();
            let smoothed = smooth_sequence(&target, weight, &self.adam)?;
            for (pass, value) in run.iter_mut().zip(smoothed) {
                pass.engagement = Some(value.clamp(0.0, limit));
            }
        }
        Ok(())
    }
}

/// Minimize `Σ (e_i - t_i)² + weight · Σ (e_{i+1} - e_i)²` from `e = t`.
pub fn smooth_sequence(
    target: &[f64],
    weight: f64,
    options: &AdamOptions,
) -> CamToolResult<Vec<f64>> {
    let objective = |e: &[f64]| {
        let fit: f64 = e.iter().zip(target).map(|(v, t)| (v - t).powi(2)).sum();
        let roughness: f64 = e.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        fit + weight * roughness
    };
    let gradient = |e: &[f64]| {
        let mut g: Vec<f64> = e.iter().zip(target).map(|(v, t)| 2.0 * (v - t)).collect();
        for i in 0..e.len().saturating_sub(1) {
            let diff = e[i + 1] - e[i];
            g[i] -= 2.0 * weight * diff;
            g[i + 1] += 2.0 * weight * diff;
        }
        g
    };
    let result = adam_optimize_with(objective, gradient, target, options)?;
    Ok(result.x)
}

fn check_boundary(boundary: &[Point2]) -> CamToolResult<()> {
    if boundary.len() < 3 {
        return Err(ParameterError::InvalidBoundary(format!(
            "need at least 3 vertices, got {}",
            boundary.len()
        ))
        .into());
    }
    if let Some(i) = boundary.iter().position(|p| !p.is_finite()) {
        return Err(ParameterError::InvalidBoundary(format!("vertex {i} is not finite")).into());
    }
    let area2: f64 = boundary
        .iter()
        .zip(boundary.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    if area2.abs() < f64::EPSILON {
        return Err(CamToolError::GenerationFailed(
            "boundary encloses no area".to_string(),
        ));
    }
    Ok(())
}
