//! Tensor-product NURBS surfaces.

use super::basis::{cox_de_boor, parameter_domain, validate_knots};
use super::curve::{rational_combination, validate_weights, DIFFERENCE_STEP};
use millpath_core::constants::NORMALIZE_EPSILON;
use millpath_core::{NumericError, Point3, Result};
use serde::{Deserialize, Serialize};

/// A validated NURBS surface. `control_points[i][j]` is row `i` along U and
/// column `j` along V.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNurbsSurface")]
pub struct NurbsSurface {
    control_points: Vec<Vec<Point3>>,
    weights: Option<Vec<Vec<f64>>>,
    degree_u: usize,
    degree_v: usize,
    knots_u: Vec<f64>,
    knots_v: Vec<f64>,
}

#[derive(Deserialize)]
struct RawNurbsSurface {
    control_points: Vec<Vec<Point3>>,
    weights: Option<Vec<Vec<f64>>>,
    degree_u: usize,
    degree_v: usize,
    knots_u: Vec<f64>,
    knots_v: Vec<f64>,
}

impl TryFrom<RawNurbsSurface> for NurbsSurface {
    type Error = NumericError;

    fn try_from(raw: RawNurbsSurface) -> Result<Self> {
        Self::new(
            raw.control_points,
            raw.weights,
            raw.degree_u,
            raw.degree_v,
            raw.knots_u,
            raw.knots_v,
        )
    }
}

impl NurbsSurface {
    pub fn new(
        control_points: Vec<Vec<Point3>>,
        weights: Option<Vec<Vec<f64>>>,
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
    ) -> Result<Self> {
        let surface = Self {
            control_points,
            weights,
            degree_u,
            degree_v,
            knots_u,
            knots_v,
        };
        surface.validate()?;
        Ok(surface)
    }

    pub fn validate(&self) -> Result<()> {
        let (nu, nv) = self.grid_size();
        if nu == 0 || nv == 0 {
            return Err(NumericError::InvalidNurbs("empty control net".into()));
        }
        if let Some(row) = self.control_points.iter().position(|r| r.len() != nv) {
            return Err(NumericError::InvalidNurbs(format!(
                "control net row {row} has {} points, expected {nv}",
                self.control_points[row].len()
            )));
        }
        if self.control_points.iter().flatten().any(|p| !p.is_finite()) {
            return Err(NumericError::InvalidNurbs("control net is not finite".into()));
        }
        validate_knots(&self.knots_u, self.degree_u, nu)?;
        validate_knots(&self.knots_v, self.degree_v, nv)?;
        if let Some(weights) = &self.weights {
            if weights.len() != nu {
                return Err(NumericError::InvalidNurbs(format!(
                    "expected {nu} weight rows, got {}",
                    weights.len()
                )));
            }
            for row in weights {
                validate_weights(row, nv)?;
            }
        }
        Ok(())
    }

    /// Control net size as `(rows along U, columns along V)`.
    pub fn grid_size(&self) -> (usize, usize) {
        (
            self.control_points.len(),
            self.control_points.first().map_or(0, Vec::len),
        )
    }

    pub fn control_points(&self) -> &[Vec<Point3>] {
        &self.control_points
    }

    pub fn degrees(&self) -> (usize, usize) {
        (self.degree_u, self.degree_v)
    }

    pub fn domain_u(&self) -> (f64, f64) {
        parameter_domain(&self.knots_u, self.degree_u).unwrap_or((0.0, 0.0))
    }

    pub fn domain_v(&self) -> (f64, f64) {
        parameter_domain(&self.knots_v, self.degree_v).unwrap_or((0.0, 0.0))
    }

    fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[i][j])
    }
}

/// Point on the surface at `(u, v)`, both clamped into their domains.
pub fn evaluate_surface(surface: &NurbsSurface, u: f64, v: f64) -> Point3 {
    let (nu, nv) = surface.grid_size();
    let bu = cox_de_boor(&surface.knots_u, u, surface.degree_u, nu);
    let bv = cox_de_boor(&surface.knots_v, v, surface.degree_v, nv);

    let (bu, bv) = (&bu, &bv);
    rational_combination(surface.control_points.iter().enumerate().flat_map(move |(i, row)| {
        let bu_i = bu[i];
        row.iter()
            .enumerate()
            .map(move |(j, p)| (p, bu_i * bv[j], surface.weight(i, j)))
    }))
}

/// Unit normal at `(u, v)` from finite-difference partials.
///
/// Central differences are used inside the domain and one-sided ones at its
/// edges. Returns the zero vector where the partials are parallel or vanish.
pub fn surface_normal(surface: &NurbsSurface, u: f64, v: f64) -> Point3 {
    let (u_lo, u_hi) = surface.domain_u();
    let (v_lo, v_hi) = surface.domain_v();
    let u = u.clamp(u_lo, u_hi);
    let v = v.clamp(v_lo, v_hi);

    let (u0, u1) = ((u - DIFFERENCE_STEP).max(u_lo), (u + DIFFERENCE_STEP).min(u_hi));
    let (v0, v1) = ((v - DIFFERENCE_STEP).max(v_lo), (v + DIFFERENCE_STEP).min(v_hi));

    let du = (evaluate_surface(surface, u1, v) - evaluate_surface(surface, u0, v)) * (1.0 / (u1 - u0));
    let dv = (evaluate_surface(surface, u, v1) - evaluate_surface(surface, u, v0)) * (1.0 / (v1 - v0));

    let normal = Point3::new(
        du.y * dv.z - du.z * dv.y,
        du.z * dv.x - du.x * dv.z,
        du.x * dv.y - du.y * dv.x,
    );
    let length = normal.length();
    if !length.is_finite() || length < NORMALIZE_EPSILON {
        return Point3::zero();
    }
    normal * (1.0 / length)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bilinear_patch(z: [f64; 4]) -> NurbsSurface {
        NurbsSurface::new(
            vec![
                vec![Point3::new(0.0, 0.0, z[0]), Point3::new(0.0, 1.0, z[1])],
                vec![Point3::new(1.0, 0.0, z[2]), Point3::new(1.0, 1.0, z[3])],
            ],
            None,
            1,
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_deserialize_validates_control_net() {
        let patch = bilinear_patch([0.0, 1.0, 2.0, 3.0]);
        let json = serde_json::to_string(&patch).unwrap();
        let restored: NurbsSurface = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, patch);

        let short_knots = json.replace("\"knots_v\":[0.0,0.0,1.0,1.0]", "\"knots_v\":[0.0,1.0]");
        assert_ne!(short_knots, json);
        assert!(serde_json::from_str::<NurbsSurface>(&short_knots).is_err());
    }

    #[test]
    fn test_flat_patch_evaluation_and_normal() {
        let patch = bilinear_patch([2.0; 4]);
        let p = evaluate_surface(&patch, 0.25, 0.75);
        assert!(p.distance_to(&Point3::new(0.25, 0.75, 2.0)) < 1e-12);

        for (u, v) in [(0.5, 0.5), (0.0, 0.0), (1.0, 1.0)] {
            let n = surface_normal(&patch, u, v);
            assert!((n.z - 1.0).abs() < 1e-9, "normal at ({u}, {v}) = {n:?}");
        }
    }

    #[test]
    fn test_tilted_patch_normal() {
        // z = x plane
        let patch = bilinear_patch([0.0, 0.0, 1.0, 1.0]);
        let n = surface_normal(&patch, 0.5, 0.5);
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((n.x + s).abs() < 1e-9);
        assert!(n.y.abs() < 1e-9);
        assert!((n.z - s).abs() < 1e-9);
    }

    #[test]
    fn test_collapsed_patch_has_zero_normal() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let patch = NurbsSurface::new(
            vec![vec![p, p], vec![p, p]],
            None,
            1,
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
        )
        .unwrap();
        assert_eq!(surface_normal(&patch, 0.5, 0.5), Point3::zero());
    }

    #[test]
    fn test_ragged_net_is_rejected() {
        let result = NurbsSurface::new(
            vec![vec![Point3::zero(), Point3::zero()], vec![Point3::zero()]],
            None,
            1,
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
        );
        assert!(matches!(result, Err(NumericError::InvalidNurbs(_))));
    }
}
