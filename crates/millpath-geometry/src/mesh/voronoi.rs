//! Voronoi diagram as the dual of the Delaunay triangulation.
//!
//! Every triangle contributes its circumcenter as a Voronoi vertex, and
//! every Delaunay edge shared by two triangles becomes a finite Voronoi edge
//! joining the two circumcenters. Hull edges would produce unbounded rays;
//! those are omitted, so the diagram only holds finite edges.

use super::delaunay::{circumcenter, has_area, triangulate};
use millpath_core::Point2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A finite Voronoi edge separating the cells of two sites
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoronoiEdge {
    /// Index of the first site
    pub site_a: usize,
    /// Index of the second site
    pub site_b: usize,
    pub start: Point2,
    pub end: Point2,
}

impl VoronoiEdge {
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// Voronoi diagram of a planar point set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoronoiDiagram {
    /// Input points, in input order
    pub sites: Vec<Point2>,
    /// Circumcenters of the dual triangles
    pub vertices: Vec<Point2>,
    pub edges: Vec<VoronoiEdge>,
}

impl VoronoiDiagram {
    /// True when no finite edges could be built.
    pub fn is_degenerate(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Build the Voronoi diagram of `points`.
///
/// Never fails: empty input, a single site, coincident or collinear sites
/// yield a diagram with no edges, which callers treat as a sparse boundary.
pub fn compute_voronoi(points: &[Point2]) -> VoronoiDiagram {
    let mut diagram = VoronoiDiagram {
        sites: points.to_vec(),
        ..Default::default()
    };

    if !has_area(points) {
        debug!("Voronoi input of {} points is degenerate", points.len());
        return diagram;
    }
    let triangulation = match triangulate(points) {
        Ok(t) => t,
        Err(e) => {
            debug!("Voronoi skipped: {}", e);
            return diagram;
        }
    };

    let mut vertex_of_triangle: Vec<Option<usize>> = Vec::with_capacity(triangulation.len());
    for tri in &triangulation.triangles {
        let vertex = circumcenter(&tri.a, &tri.b, &tri.c).map(|c| {
            diagram.vertices.push(c);
            diagram.vertices.len() - 1
        });
        vertex_of_triangle.push(vertex);
    }

    // Delaunay edge (by site indices) -> triangles using it
    let mut edge_triangles: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (t, idx) in triangulation.indices.iter().enumerate() {
        for (u, v) in [(idx[0], idx[1]), (idx[1], idx[2]), (idx[2], idx[0])] {
            edge_triangles
                .entry((u.min(v), u.max(v)))
                .or_default()
                .push(t);
        }
    }

    let mut shared: Vec<(&(usize, usize), &Vec<usize>)> = edge_triangles
        .iter()
        .filter(|(_, tris)| tris.len() == 2)
        .collect();
    shared.sort_by_key(|(edge, _)| **edge);

    for ((site_a, site_b), tris) in shared {
        if let (Some(va), Some(vb)) = (vertex_of_triangle[tris[0]], vertex_of_triangle[tris[1]]) {
            diagram.edges.push(VoronoiEdge {
                site_a: *site_a,
                site_b: *site_b,
                start: diagram.vertices[va],
                end: diagram.vertices[vb],
            });
        }
    }

    debug!(
        "Voronoi diagram: {} sites, {} vertices, {} edges",
        diagram.sites.len(),
        diagram.vertices.len(),
        diagram.edges.len()
    );
    diagram
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_inputs_do_not_fail() {
        assert!(compute_voronoi(&[]).is_degenerate());

        let single = compute_voronoi(&[Point2::new(0.0, 0.0)]);
        assert_eq!(single.sites.len(), 1);
        assert!(single.edges.is_empty());

        let collinear = compute_voronoi(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ]);
        assert!(collinear.is_degenerate());
        assert_eq!(collinear.sites.len(), 3);
    }

    #[test]
    fn test_square_has_single_degenerate_edge() {
        // Both triangles of a square share the same circumcenter.
        let diagram = compute_voronoi(&[
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]);
        assert_eq!(diagram.vertices.len(), 2);
        assert_eq!(diagram.edges.len(), 1);
        assert!(diagram.edges[0].length() < 1e-12);
    }
}
