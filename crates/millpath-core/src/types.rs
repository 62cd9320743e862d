//! Value types exchanged between the numeric crates and their collaborators.
//!
//! Points are plain `Copy` values; they are never shared by reference across
//! structures. `Pass` is the unit handed to the external post-processor.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A point in the XY plane (mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(&self, other: &Point2, t: f64) -> Point2 {
        Point2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Midpoint of the segment to `other`.
    pub fn midpoint(&self, other: &Point2) -> Point2 {
        self.lerp(other, 0.5)
    }

    /// 2D cross product of `(b - self)` and `(c - self)`.
    ///
    /// Positive when `self, b, c` turn counter-clockwise.
    pub fn orient(&self, b: &Point2, c: &Point2) -> f64 {
        (b.x - self.x) * (c.y - self.y) - (b.y - self.y) * (c.x - self.x)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;

    fn mul(self, rhs: f64) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Point2::new(x, y)
    }
}

/// A point or direction in machine space (mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin / zero vector.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point3) -> f64 {
        (*self - *other).length()
    }

    /// Length when the point is read as a vector.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Drops the Z coordinate.
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;

    fn mul(self, rhs: f64) -> Point3 {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<Point2> for Point3 {
    fn from(p: Point2) -> Self {
        Point3::new(p.x, p.y, 0.0)
    }
}

/// Which generator produced a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassStrategy {
    /// Offset pass sampled along the approximate medial axis
    MedialOffset,
    /// Pass placed on an interior Voronoi vertex
    InteriorSkeleton,
    /// Pass following a sampled NURBS curve
    CurveFollow,
}

impl std::fmt::Display for PassStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MedialOffset => write!(f, "medial_offset"),
            Self::InteriorSkeleton => write!(f, "interior_skeleton"),
            Self::CurveFollow => write!(f, "curve_follow"),
        }
    }
}

/// Provenance attached to every pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassMetadata {
    /// Generator that emitted the pass
    pub strategy: PassStrategy,
    /// Boundary edge, skeleton vertex or curve index the pass came from
    pub segment: usize,
    /// Sample index within the segment
    pub sample: usize,
    /// Clearance to the boundary at this sample (mm)
    pub clearance: f64,
}

/// A single toolpath position handed to the post-processor.
///
/// Passes are created once, appended to an ordered list and never mutated
/// after hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pass {
    pub x: f64,
    pub y: f64,
    /// Cutting depth (negative = below stock top), if assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Radial engagement at this position (mm), if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement: Option<f64>,
    pub metadata: PassMetadata,
}

impl Pass {
    /// Creates a pass at `position` with no depth or engagement.
    pub fn new(position: Point2, metadata: PassMetadata) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: None,
            engagement: None,
            metadata,
        }
    }

    /// Set the radial engagement for this pass
    pub fn with_engagement(mut self, engagement: f64) -> Self {
        self.engagement = Some(engagement);
        self
    }

    /// Set the Z depth for this pass
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2_helpers() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(a.midpoint(&b), Point2::new(1.5, 2.0));
        assert!(a.orient(&Point2::new(1.0, 0.0), &Point2::new(0.0, 1.0)) > 0.0);
        assert!(!Point2::new(f64::NAN, 0.0).is_finite());
    }

    #[test]
    fn test_point3_length() {
        let p = Point3::new(1.0, 2.0, 2.0);
        assert_eq!(p.length(), 3.0);
        assert_eq!(Point3::from(Point2::new(1.0, 2.0)).z, 0.0);
    }

    #[test]
    fn test_pass_serialization_skips_missing_fields() {
        let meta = PassMetadata {
            strategy: PassStrategy::MedialOffset,
            segment: 2,
            sample: 3,
            clearance: 12.5,
        };
        let pass = Pass::new(Point2::new(1.0, 2.0), meta).with_engagement(4.0);
        let json = serde_json::to_string(&pass).unwrap();
        assert!(json.contains("\"engagement\":4.0"));
        assert!(!json.contains("\"z\""));
        assert!(json.contains("\"medial_offset\""));

        let back: Pass = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pass);
    }
}
