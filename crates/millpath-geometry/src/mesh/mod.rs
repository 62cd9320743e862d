//! Planar meshing: Delaunay triangulation, its Voronoi dual, an approximate
//! medial axis and the offset passes derived from it.

pub mod delaunay;
pub mod medial_axis;
pub mod offset;
pub mod voronoi;

pub use delaunay::{triangulate, DelaunayTriangulation, Triangle};
pub use medial_axis::{
    extract_medial_axis, extract_medial_axis_with, interior_skeleton, MedialAxisSample,
    MedialAxisSegment, DEFAULT_MEDIAL_STEPS,
};
pub use offset::{generate_offset_passes, generate_skeleton_passes};
pub use voronoi::{compute_voronoi, VoronoiDiagram, VoronoiEdge};
