//! Bowyer-Watson incremental Delaunay triangulation.
//!
//! A well-shaped seed triangle is closed off by three ghost triangles that
//! share a symbolic vertex at infinity, one per hull edge. The remaining
//! points are inserted in input order: each insertion removes every
//! triangle whose circumcircle strictly contains the new point, then fans
//! the point to the boundary of the resulting hole. Points outside the
//! current hull conflict with the ghost triangles whose edge they see, so
//! the hull grows without any finite bounding triangle. Ghost triangles are
//! dropped at the end.
//!
//! All working triangles are kept counter-clockwise so the determinant
//! in-circle test has a consistent sign. Co-circular points count as
//! outside (strict `>`).

use millpath_core::constants::GEOMETRY_EPSILON;
use millpath_core::{NumericError, Point2, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A triangle of the final triangulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Point2,
    pub b: Point2,
    pub c: Point2,
}

impl Triangle {
    /// Creates a new triangle.
    pub fn new(a: Point2, b: Point2, c: Point2) -> Self {
        Self { a, b, c }
    }

    /// Signed area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        self.a.orient(&self.b, &self.c) / 2.0
    }

    /// Centre of the circumscribed circle, `None` for collinear vertices.
    pub fn circumcenter(&self) -> Option<Point2> {
        circumcenter(&self.a, &self.b, &self.c)
    }

    /// Strict in-circumcircle test, independent of winding.
    pub fn circumcircle_contains(&self, p: &Point2) -> bool {
        let det = in_circle_det(&self.a, &self.b, &self.c, p);
        if self.signed_area() >= 0.0 {
            det > 0.0
        } else {
            det < 0.0
        }
    }

    pub fn vertices(&self) -> [Point2; 3] {
        [self.a, self.b, self.c]
    }
}

/// Output of [`triangulate`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DelaunayTriangulation {
    /// Counter-clockwise triangles
    pub triangles: Vec<Triangle>,
    /// Input indices of each triangle's vertices, parallel to `triangles`
    pub indices: Vec<[usize; 3]>,
}

impl DelaunayTriangulation {
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Determinant of the in-circle predicate.
///
/// Positive when `p` lies strictly inside the circumcircle of the
/// counter-clockwise triangle `a, b, c`.
pub fn in_circle_det(a: &Point2, b: &Point2, c: &Point2, p: &Point2) -> f64 {
    let (adx, ady) = (a.x - p.x, a.y - p.y);
    let (bdx, bdy) = (b.x - p.x, b.y - p.y);
    let (cdx, cdy) = (c.x - p.x, c.y - p.y);

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx) + ad * (bdx * cdy - bdy * cdx)
}

pub fn circumcenter(a: &Point2, b: &Point2, c: &Point2) -> Option<Point2> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < GEOMETRY_EPSILON {
        return None;
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    Some(Point2::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    ))
}

/// Input indices of the first occurrence of every distinct point.
fn distinct_indices(points: &[Point2]) -> Vec<usize> {
    let mut kept: Vec<usize> = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        if kept.iter().all(|&k| points[k] != *p) {
            kept.push(i);
        }
    }
    kept
}

/// True when at least three of `points` are not collinear.
pub fn has_area(points: &[Point2]) -> bool {
    let distinct = distinct_indices(points);
    if distinct.len() < 3 {
        return false;
    }
    let origin = points[distinct[0]];
    let far = distinct
        .iter()
        .map(|&i| points[i])
        .max_by(|a, b| origin.distance_to(a).total_cmp(&origin.distance_to(b)))
        .unwrap_or(origin);
    let baseline = origin.distance_to(&far);
    distinct.iter().any(|&i| {
        let p = points[i];
        origin.orient(&far, &p).abs() > GEOMETRY_EPSILON * baseline.max(1.0) * baseline.max(1.0)
    })
}

/// Stands for the vertex at infinity shared by every ghost triangle.
const GHOST: usize = usize::MAX;

/// Hull edge `(u, v)` of a ghost triangle, with the outside to its left.
fn hull_edge(t: &[usize; 3]) -> (usize, usize) {
    if t[0] == GHOST {
        (t[1], t[2])
    } else if t[1] == GHOST {
        (t[2], t[0])
    } else {
        (t[0], t[1])
    }
}

/// Whether `p` lies strictly inside the circumcircle of working triangle `t`.
///
/// A ghost triangle's circumcircle is the open half-plane outside its hull
/// edge together with the open edge itself, the limit of a circle through
/// the edge and a vertex moving off to infinity.
fn in_conflict(vertices: &[Point2], t: &[usize; 3], p: &Point2) -> bool {
    if !t.contains(&GHOST) {
        return in_circle_det(&vertices[t[0]], &vertices[t[1]], &vertices[t[2]], p) > 0.0;
    }
    let (u, v) = hull_edge(t);
    let (a, b) = (vertices[u], vertices[v]);
    let side = a.orient(&b, p);
    if side != 0.0 {
        return side > 0.0;
    }
    let along = (p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y);
    along > 0.0 && along < (b.x - a.x).powi(2) + (b.y - a.y).powi(2)
}

/// Three vertex indices of a well-shaped counter-clockwise starting triangle.
fn seed_triangle(vertices: &[Point2]) -> Option<[usize; 3]> {
    let origin = *vertices.first()?;
    let far = (1..vertices.len())
        .max_by(|&i, &j| origin.distance_to(&vertices[i]).total_cmp(&origin.distance_to(&vertices[j])))?;
    let apex = (1..vertices.len())
        .filter(|&i| i != far)
        .max_by(|&i, &j| {
            let oi = origin.orient(&vertices[far], &vertices[i]).abs();
            let oj = origin.orient(&vertices[far], &vertices[j]).abs();
            oi.total_cmp(&oj)
        })?;
    match origin.orient(&vertices[far], &vertices[apex]) {
        side if side > 0.0 => Some([0, far, apex]),
        side if side < 0.0 => Some([0, apex, far]),
        _ => None,
    }
}

/// Triangulate a planar point set.
///
/// Duplicate points are inserted once. Fails with
/// [`NumericError::DegenerateInput`] when fewer than three non-collinear
/// points are supplied.
pub fn triangulate(points: &[Point2]) -> Result<DelaunayTriangulation> {
    if let Some(bad) = points.iter().position(|p| !p.is_finite()) {
        return Err(NumericError::parameter(
            "points",
            format!("point {bad} is not finite"),
        ));
    }
    let degenerate = || {
        NumericError::DegenerateInput(format!(
            "triangulation needs 3 non-collinear points, got {} points",
            points.len()
        ))
    };
    if !has_area(points) {
        return Err(degenerate());
    }

    let distinct = distinct_indices(points);
    if distinct.len() < points.len() {
        warn!(
            "Skipping {} duplicate points during triangulation",
            points.len() - distinct.len()
        );
    }

    let vertices: Vec<Point2> = distinct.iter().map(|&i| points[i]).collect();
    let n = vertices.len();
    let seed = seed_triangle(&vertices).ok_or_else(degenerate)?;
    let [a, b, c] = seed;
    let mut triangles: Vec<[usize; 3]> = vec![seed, [b, a, GHOST], [c, b, GHOST], [a, c, GHOST]];

    for p_idx in (0..n).filter(|i| !seed.contains(i)) {
        let p = vertices[p_idx];

        let (bad, good): (Vec<[usize; 3]>, Vec<[usize; 3]>) = triangles
            .into_iter()
            .partition(|t| in_conflict(&vertices, t, &p));

        // Edges used by exactly one bad triangle bound the hole.
        let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();
        for t in &bad {
            for (u, v) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                *edge_count.entry((u.min(v), u.max(v))).or_insert(0) += 1;
            }
        }

        triangles = good;
        for t in &bad {
            for (u, v) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                if edge_count[&(u.min(v), u.max(v))] == 1 {
                    triangles.push([u, v, p_idx]);
                }
            }
        }
    }

    let mut result = DelaunayTriangulation::default();
    for t in triangles.iter().filter(|t| !t.contains(&GHOST)) {
        let tri = Triangle::new(vertices[t[0]], vertices[t[1]], vertices[t[2]]);
        if tri.signed_area().abs() <= GEOMETRY_EPSILON {
            continue;
        }
        result.triangles.push(tri);
        result.indices.push([distinct[t[0]], distinct[t[1]], distinct[t[2]]]);
    }

    debug!(
        "Triangulated {} points into {} triangles",
        n,
        result.triangles.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_circle_sign() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert!(in_circle_det(&a, &b, &c, &Point2::new(0.4, 0.4)) > 0.0);
        assert!(in_circle_det(&a, &b, &c, &Point2::new(2.0, 2.0)) < 0.0);
        // (1, 1) is co-circular with the right triangle.
        assert!(in_circle_det(&a, &b, &c, &Point2::new(1.0, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_circumcircle_contains_either_winding() {
        let ccw = Triangle::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        );
        let cw = Triangle::new(ccw.a, ccw.c, ccw.b);
        let inside = Point2::new(0.5, 0.4);
        assert!(ccw.circumcircle_contains(&inside));
        assert!(cw.circumcircle_contains(&inside));
    }

    #[test]
    fn test_circumcenter_of_right_triangle() {
        let center = circumcenter(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
            &Point2::new(0.0, 2.0),
        )
        .unwrap();
        assert!((center.x - 1.0).abs() < 1e-12);
        assert!((center.y - 1.0).abs() < 1e-12);
        assert!(circumcenter(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 1.0),
            &Point2::new(2.0, 2.0)
        )
        .is_none());
    }

    #[test]
    fn test_ghost_conflict_is_outer_half_plane() {
        let vertices = [Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)];
        // Outside lies left of 1 -> 0, i.e. below the x axis.
        let ghost = [1, 0, GHOST];
        assert_eq!(hull_edge(&[GHOST, 1, 0]), (1, 0));
        assert_eq!(hull_edge(&[0, GHOST, 1]), (1, 0));
        assert!(in_conflict(&vertices, &ghost, &Point2::new(1.0, -0.1)));
        assert!(!in_conflict(&vertices, &ghost, &Point2::new(1.0, 0.1)));
        // On the hull line only the open edge conflicts.
        assert!(in_conflict(&vertices, &ghost, &Point2::new(1.0, 0.0)));
        assert!(!in_conflict(&vertices, &ghost, &Point2::new(3.0, 0.0)));
    }

    #[test]
    fn test_seed_triangle_is_counter_clockwise() {
        let vertices = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 5.0),
            Point2::new(1.0, 1.0),
            Point2::new(4.0, 0.0),
        ];
        let [a, b, c] = seed_triangle(&vertices).unwrap();
        assert_eq!(a, 0);
        assert!(vertices[a].orient(&vertices[b], &vertices[c]) > 0.0);
        assert!(seed_triangle(&vertices[..1]).is_none());
    }

    #[test]
    fn test_collinear_hull_points_are_kept() {
        // Square with a point halfway along every edge: n = 8, all on the hull.
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.0, 2.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(0.0, 1.0),
        ];
        let result = triangulate(&pts).unwrap();
        assert_eq!(result.len(), 2 * 8 - 2 - 8);
        let area: f64 = result.triangles.iter().map(Triangle::signed_area).sum();
        assert!((area - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_has_area() {
        assert!(!has_area(&[]));
        assert!(!has_area(&[Point2::new(0.0, 0.0), Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]));
        assert!(!has_area(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0)
        ]));
        assert!(has_area(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0)
        ]));
    }
}
