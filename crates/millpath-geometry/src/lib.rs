//! # Millpath Geometry
//!
//! Planar meshing and spline evaluation for toolpath generation.
//!
//! - **Mesh**: Bowyer-Watson Delaunay triangulation, the Voronoi dual, an
//!   approximate medial axis and the offset passes sized from it
//! - **NURBS**: Cox-de Boor basis functions, curve and surface evaluation,
//!   tangents, normals and uniform sampling

pub mod mesh;
pub mod nurbs;

pub use mesh::{
    compute_voronoi, extract_medial_axis, extract_medial_axis_with, generate_offset_passes,
    generate_skeleton_passes, interior_skeleton, triangulate, DelaunayTriangulation,
    MedialAxisSample, MedialAxisSegment, Triangle, VoronoiDiagram, VoronoiEdge,
};
pub use nurbs::{
    basis_functions, curve_tangent, evaluate_curve, evaluate_surface, sample_curve,
    surface_normal, NurbsCurve, NurbsSurface,
};
