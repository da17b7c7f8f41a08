//! Ring-based polygon geometry exchanged with external collaborators.
//!
//! Coordinates are GeoJSON-style `[lon, lat]` positions in WGS84. All metric
//! computation happens in `plotwatch-geom` after reprojection; nothing in
//! this crate measures anything in raw degrees.

use serde::{Deserialize, Serialize};

/// A `[lon, lat]` position in WGS84.
pub type Position = [f64; 2];

/// A simple polygon as coordinate rings: one exterior ring and zero or more
/// interior rings (holes).
///
/// Rings may arrive open or closed; the geometry kernel closes and repairs
/// them before any set operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingGeometry {
    pub exterior: Vec<Position>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interiors: Vec<Vec<Position>>,
}

impl RingGeometry {
    pub fn new(exterior: Vec<Position>) -> Self {
        Self {
            exterior,
            interiors: Vec::new(),
        }
    }

    pub fn with_interiors(exterior: Vec<Position>, interiors: Vec<Vec<Position>>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// True when the exterior ring cannot describe a polygon (fewer than
    /// three positions).
    pub fn is_empty(&self) -> bool {
        self.exterior.len() < 3
    }
}

/// Output geometry that keeps single-polygon and multi-part results distinct.
///
/// A difference or intersection can split a region into disjoint pieces.
/// Area sums are the same either way, but rendering consumers need to know
/// which shape they received, so the two cases are never silently coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "rings", rename_all = "snake_case")]
pub enum GeoShape {
    Polygon(RingGeometry),
    Collection(Vec<RingGeometry>),
}

impl GeoShape {
    /// Wrap a list of parts, collapsing a single part to `Polygon`.
    ///
    /// Returns `None` for an empty list — callers represent "no geometry"
    /// as `Option<GeoShape>`, never as an empty collection.
    pub fn from_parts(mut parts: Vec<RingGeometry>) -> Option<Self> {
        match parts.len() {
            0 => None,
            1 => Some(GeoShape::Polygon(parts.remove(0))),
            _ => Some(GeoShape::Collection(parts)),
        }
    }

    pub fn parts(&self) -> &[RingGeometry] {
        match self {
            GeoShape::Polygon(p) => std::slice::from_ref(p),
            GeoShape::Collection(ps) => ps,
        }
    }

    pub fn part_count(&self) -> usize {
        self.parts().len()
    }
}
