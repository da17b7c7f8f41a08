//! Polygon repair (make-valid) before set operations.
//!
//! Degenerate input is sanitized vertex-by-vertex; self-intersections are
//! resolved by a self-union, which splits a bowtie into its simple lobes.
//! Unrepairable input yields an empty `MultiPolygon`, never a panic;
//! callers treat empty as "no meaningful geometry", not as an error.

use geo::{BooleanOps, MultiPolygon, Polygon};
use tracing::debug;

use plotwatch_core::{Position, RingGeometry};

use crate::error::GeomError;
use crate::projection::MetricProjection;

/// Drop non-finite and consecutively duplicated positions, drop an explicit
/// closing duplicate. Returns an empty vec when fewer than three distinct
/// vertices remain.
fn sanitize_ring(ring: &[Position]) -> Vec<Position> {
    let mut cleaned: Vec<Position> = Vec::with_capacity(ring.len());
    for &p in ring {
        if !p[0].is_finite() || !p[1].is_finite() {
            continue;
        }
        if cleaned.last() == Some(&p) {
            continue;
        }
        cleaned.push(p);
    }
    if cleaned.len() > 1 && cleaned.first() == cleaned.last() {
        cleaned.pop();
    }
    if cleaned.len() < 3 {
        cleaned.clear();
    }
    cleaned
}

/// Repair a ring geometry and project it into the metric frame.
///
/// Projection failures (coordinates outside the frame's range) are reported
/// as errors; everything degenerate short of that is repaired or dropped.
pub fn make_valid(
    projection: &MetricProjection,
    rings: &RingGeometry,
) -> Result<MultiPolygon<f64>, GeomError> {
    let exterior = sanitize_ring(&rings.exterior);
    if exterior.is_empty() {
        debug!(
            vertices = rings.exterior.len(),
            "exterior ring unrepairable"
        );
        return Ok(MultiPolygon::new(Vec::new()));
    }

    let interiors: Vec<Vec<Position>> = rings
        .interiors
        .iter()
        .map(|r| sanitize_ring(r))
        .filter(|r| !r.is_empty())
        .collect();

    let exterior = projection.project_ring(&exterior)?;
    let interiors = interiors
        .iter()
        .map(|r| projection.project_ring(r))
        .collect::<Result<Vec<_>, _>>()?;

    // Self-union resolves self-intersections and normalizes winding.
    let raw = MultiPolygon::new(vec![Polygon::new(exterior, interiors)]);
    Ok(raw.union(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn equator() -> MetricProjection {
        MetricProjection::centered_on(0.0, 0.0).unwrap()
    }

    /// Positions in meters expressed as degrees at the equator.
    fn m(x: f64, y: f64) -> Position {
        [
            x / crate::projection::M_PER_DEG_LAT,
            y / crate::projection::M_PER_DEG_LAT,
        ]
    }

    #[test]
    fn open_square_is_closed_and_kept() {
        let rings = RingGeometry::new(vec![m(0.0, 0.0), m(100.0, 0.0), m(100.0, 100.0), m(0.0, 100.0)]);
        let mp = make_valid(&equator(), &rings).unwrap();
        assert_eq!(mp.0.len(), 1);
        assert!((mp.unsigned_area() - 10_000.0).abs() < 1.0);
    }

    #[test]
    fn bowtie_splits_into_two_lobes() {
        // Figure-eight ring crossing itself at (50, 50).
        let rings = RingGeometry::new(vec![
            m(0.0, 0.0),
            m(100.0, 100.0),
            m(100.0, 0.0),
            m(0.0, 100.0),
        ]);
        let mp = make_valid(&equator(), &rings).unwrap();
        assert!(!mp.0.is_empty());
        // Lobes are triangles of 2 500 m²; the repaired area covers at least
        // one lobe and never exceeds both.
        let area = mp.unsigned_area();
        assert!(area > 2_499.0 && area < 5_001.0);
    }

    #[test]
    fn two_vertex_ring_is_unrepairable() {
        let rings = RingGeometry::new(vec![m(0.0, 0.0), m(100.0, 0.0)]);
        let mp = make_valid(&equator(), &rings).unwrap();
        assert!(mp.0.is_empty());
    }

    #[test]
    fn non_finite_vertices_are_dropped() {
        let rings = RingGeometry::new(vec![
            m(0.0, 0.0),
            [f64::NAN, 0.0],
            m(100.0, 0.0),
            m(100.0, 100.0),
            m(0.0, 100.0),
        ]);
        let mp = make_valid(&equator(), &rings).unwrap();
        assert!((mp.unsigned_area() - 10_000.0).abs() < 1.0);
    }

    #[test]
    fn duplicate_run_collapses_to_nothing() {
        let p = m(10.0, 10.0);
        let rings = RingGeometry::new(vec![p, p, p, p]);
        let mp = make_valid(&equator(), &rings).unwrap();
        assert!(mp.0.is_empty());
    }

    #[test]
    fn hole_is_preserved() {
        let rings = RingGeometry::with_interiors(
            vec![m(0.0, 0.0), m(100.0, 0.0), m(100.0, 100.0), m(0.0, 100.0)],
            vec![vec![m(40.0, 40.0), m(60.0, 40.0), m(60.0, 60.0), m(40.0, 60.0)]],
        );
        let mp = make_valid(&equator(), &rings).unwrap();
        assert!((mp.unsigned_area() - 9_600.0).abs() < 1.0);
    }
}
