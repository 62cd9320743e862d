//! Passes that trace a NURBS curve, e.g. a chamfer or engraving path.

use crate::error::{CamToolResult, ParameterError};
use millpath_core::{Pass, PassMetadata, PassStrategy};
use millpath_geometry::{curve_tangent, sample_curve, NurbsCurve};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveFollowParameters {
    /// Number of positions sampled along the curve
    pub samples: usize,
    /// Radial engagement recorded on every pass (mm)
    pub engagement: f64,
    /// Added to the curve's own z (mm)
    pub z_offset: f64,
    /// Lateral offset to the left of the direction of travel (mm)
    pub side_offset: f64,
}

impl Default for CurveFollowParameters {
    fn default() -> Self {
        Self {
            samples: 64,
            engagement: 1.0,
            z_offset: 0.0,
            side_offset: 0.0,
        }
    }
}

/// Sample `curve` into passes tagged [`PassStrategy::CurveFollow`].
///
/// The curve's z becomes the pass depth. Clearance is not measured for curve
/// following and is recorded as 0.
pub fn generate_curve_passes(
    curve: &NurbsCurve,
    curve_index: usize,
    params: &CurveFollowParameters,
) -> CamToolResult<Vec<Pass>> {
    if params.samples < 2 {
        return Err(ParameterError::OutOfRange {
            name: "samples".to_string(),
            value: params.samples as f64,
            min: 2.0,
            max: f64::INFINITY,
        }
        .into());
    }
    if !(params.engagement.is_finite() && params.engagement >= 0.0) {
        return Err(ParameterError::InvalidValue {
            name: "engagement".to_string(),
            reason: format!("must be zero or positive, got {}", params.engagement),
        }
        .into());
    }

    let (lo, hi) = curve.domain();
    let points = sample_curve(curve, params.samples);
    let passes: Vec<Pass> = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let mut position = point.xy();
            if params.side_offset != 0.0 {
                let t = lo + (hi - lo) * i as f64 / (params.samples - 1) as f64;
                let tangent = curve_tangent(curve, t);
                let planar = (tangent.x.hypot(tangent.y)).max(f64::MIN_POSITIVE);
                position.x -= tangent.y / planar * params.side_offset;
                position.y += tangent.x / planar * params.side_offset;
            }
            let metadata = PassMetadata {
                strategy: PassStrategy::CurveFollow,
                segment: curve_index,
                sample: i,
                clearance: 0.0,
            };
            Pass::new(position, metadata)
                .with_engagement(params.engagement)
                .with_z(point.z + params.z_offset)
        })
        .collect();

    debug!("Generated {} curve-following passes", passes.len());
    Ok(passes)
}
