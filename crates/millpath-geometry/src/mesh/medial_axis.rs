//! Medial axis approximation and clearance queries.
//!
//! [`extract_medial_axis`] is a coarse stand-in for the true medial axis:
//! for each boundary edge it walks in a straight line from the edge midpoint
//! to the polygon centroid and records the distance travelled as the
//! clearance radius. It is exact only for shapes whose centroid is
//! equidistant from every edge midpoint (regular polygons) and should not be
//! relied on for concave regions. [`interior_skeleton`] gives a better
//! estimate by taking the Voronoi vertices inside the boundary and measuring
//! their true distance to it.

use super::voronoi::VoronoiDiagram;
use millpath_core::Point2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Steps taken from each edge midpoint to the centroid by default.
pub const DEFAULT_MEDIAL_STEPS: usize = 10;

/// One sample along a medial axis segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MedialAxisSample {
    pub x: f64,
    pub y: f64,
    /// Approximate clearance to the boundary (mm)
    pub radius: f64,
}

impl MedialAxisSample {
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Ordered samples walking inward from one boundary edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedialAxisSegment {
    /// Index of the boundary edge (edge `i` joins vertex `i` and `i + 1`)
    pub edge_index: usize,
    pub samples: Vec<MedialAxisSample>,
}

/// Area-weighted centroid of a closed polygon.
///
/// Falls back to the vertex average when the polygon has no area.
pub fn polygon_centroid(boundary: &[Point2]) -> Point2 {
    if boundary.is_empty() {
        return Point2::default();
    }
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, a) in boundary.iter().enumerate() {
        let b = &boundary[(i + 1) % boundary.len()];
        let cross = a.x * b.y - b.x * a.y;
        area2 += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    if area2.abs() < 1e-12 {
        let n = boundary.len() as f64;
        let sum = boundary.iter().fold(Point2::default(), |acc, p| acc + *p);
        return sum * (1.0 / n);
    }
    Point2::new(cx / (3.0 * area2), cy / (3.0 * area2))
}

/// Even-odd point-in-polygon test.
pub fn point_in_polygon(p: &Point2, boundary: &[Point2]) -> bool {
    let mut inside = false;
    let n = boundary.len();
    for i in 0..n {
        let a = &boundary[i];
        let b = &boundary[(i + n - 1) % n];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Shortest distance from `p` to segment `a-b`.
pub fn distance_to_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ab = *b - *a;
    let len2 = ab.x * ab.x + ab.y * ab.y;
    if len2 == 0.0 {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len2).clamp(0.0, 1.0);
    p.distance_to(&a.lerp(b, t))
}

/// Shortest distance from `p` to any edge of the closed boundary.
pub fn distance_to_boundary(p: &Point2, boundary: &[Point2]) -> f64 {
    let n = boundary.len();
    (0..n)
        .map(|i| distance_to_segment(p, &boundary[i], &boundary[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

/// Approximate medial axis with [`DEFAULT_MEDIAL_STEPS`] steps per edge.
pub fn extract_medial_axis(diagram: &VoronoiDiagram, boundary: &[Point2]) -> Vec<MedialAxisSegment> {
    extract_medial_axis_with(diagram, boundary, DEFAULT_MEDIAL_STEPS)
}

/// Approximate medial axis with `steps` steps per edge.
///
/// Produces one segment per boundary edge holding `steps + 1` samples from
/// the edge midpoint (radius 0) to the centroid. Boundaries with fewer than
/// three vertices produce nothing.
pub fn extract_medial_axis_with(
    diagram: &VoronoiDiagram,
    boundary: &[Point2],
    steps: usize,
) -> Vec<MedialAxisSegment> {
    if boundary.len() < 3 {
        debug!("Boundary with {} vertices has no medial axis", boundary.len());
        return Vec::new();
    }
    let steps = steps.max(1);
    let centroid = polygon_centroid(boundary);
    let n = boundary.len();

    let segments: Vec<MedialAxisSegment> = (0..n)
        .map(|edge_index| {
            let midpoint = boundary[edge_index].midpoint(&boundary[(edge_index + 1) % n]);
            let samples = (0..=steps)
                .map(|s| {
                    let p = midpoint.lerp(&centroid, s as f64 / steps as f64);
                    MedialAxisSample {
                        x: p.x,
                        y: p.y,
                        radius: midpoint.distance_to(&p),
                    }
                })
                .collect();
            MedialAxisSegment {
                edge_index,
                samples,
            }
        })
        .collect();

    debug!(
        "Medial axis: {} segments from {} boundary edges ({} Voronoi edges available)",
        segments.len(),
        n,
        diagram.edges.len()
    );
    segments
}

/// Voronoi vertices strictly inside `boundary`, with their true clearance.
///
/// Samples are ordered by descending radius so the widest openings come
/// first.
pub fn interior_skeleton(diagram: &VoronoiDiagram, boundary: &[Point2]) -> Vec<MedialAxisSample> {
    if boundary.len() < 3 {
        return Vec::new();
    }
    let mut samples: Vec<MedialAxisSample> = diagram
        .vertices
        .iter()
        .filter(|v| point_in_polygon(v, boundary))
        .map(|v| MedialAxisSample {
            x: v.x,
            y: v.y,
            radius: distance_to_boundary(v, boundary),
        })
        .filter(|s| s.radius > 0.0)
        .collect();
    samples.sort_by(|a, b| b.radius.total_cmp(&a.radius));
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ]
    }

    #[test]
    fn test_centroid_of_square_and_degenerate_polygon() {
        assert_eq!(polygon_centroid(&square(10.0)), Point2::new(5.0, 5.0));
        let line = [Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), Point2::new(8.0, 0.0)];
        assert_eq!(polygon_centroid(&line), Point2::new(4.0, 0.0));
    }

    #[test]
    fn test_point_in_polygon() {
        let sq = square(10.0);
        assert!(point_in_polygon(&Point2::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(&Point2::new(15.0, 5.0), &sq));
    }

    #[test]
    fn test_distance_to_boundary() {
        let sq = square(10.0);
        assert!((distance_to_boundary(&Point2::new(2.0, 5.0), &sq) - 2.0).abs() < 1e-12);
        assert!((distance_to_segment(&Point2::new(-3.0, 4.0), &sq[0], &sq[1]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_medial_axis_radii_grow_toward_centroid() {
        let sq = square(100.0);
        let segments = extract_medial_axis(&VoronoiDiagram::default(), &sq);
        assert_eq!(segments.len(), 4);
        for segment in &segments {
            assert_eq!(segment.samples.len(), DEFAULT_MEDIAL_STEPS + 1);
            assert_eq!(segment.samples[0].radius, 0.0);
            let last = segment.samples.last().unwrap();
            assert!((last.radius - 50.0).abs() < 1e-9);
            assert!((last.x - 50.0).abs() < 1e-9 && (last.y - 50.0).abs() < 1e-9);
            assert!(segment.samples.windows(2).all(|w| w[1].radius >= w[0].radius));
        }
    }

    #[test]
    fn test_medial_axis_short_boundary() {
        let segments = extract_medial_axis(
            &VoronoiDiagram::default(),
            &[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)],
        );
        assert!(segments.is_empty());
    }
}
