//! Set operations and measures on projected (metric) geometry.
//!
//! All inputs are repaired multipolygons in a metric frame; results are
//! multipolygons whose combined area is what downstream consumers sum.
//! Empty results mean "no meaningful geometry" and are valid outcomes.

use geo::{Area, BooleanOps, Coord, LineString, MultiPolygon, Polygon};

/// Containment tolerance: a residual sliver below one square millimeter is
/// measure noise, not a protrusion.
const CONTAINS_EPS_SQM: f64 = 1e-6;

/// Segments used to approximate a full circle in buffer joins.
const ARC_SEGMENTS: usize = 32;

pub fn is_empty(multi: &MultiPolygon<f64>) -> bool {
    multi.0.is_empty()
}

/// Area in square meters.
pub fn area_sqm(multi: &MultiPolygon<f64>) -> f64 {
    multi.unsigned_area()
}

pub fn intersection(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.intersection(b)
}

pub fn union(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.union(b)
}

/// Parts of `a` not in `b`.
pub fn difference(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.difference(b)
}

/// Whether `outer` covers `inner` up to a sub-millimeter sliver.
///
/// Evaluated as `area(inner \ outer) ≈ 0`, which tolerates shared edges and
/// measure-zero touching that exact predicates reject.
pub fn contains(outer: &MultiPolygon<f64>, inner: &MultiPolygon<f64>) -> bool {
    area_sqm(&inner.difference(outer)) < CONTAINS_EPS_SQM
}

/// Outward dilation by `distance_m` (Minkowski sum with a disc).
///
/// Built as the union of the input with a capsule around every ring edge: a
/// both-sides rectangle plus a disc at each vertex. Capsules cover both
/// sides of interior rings too, so holes shrink by the same distance.
/// Non-positive distances return the input unchanged.
pub fn buffer(multi: &MultiPolygon<f64>, distance_m: f64) -> MultiPolygon<f64> {
    if distance_m <= 0.0 || !distance_m.is_finite() || multi.0.is_empty() {
        return multi.clone();
    }

    let mut acc = multi.clone();
    for polygon in &multi.0 {
        for ring in rings_of(polygon) {
            for piece in ring_capsule_pieces(ring, distance_m) {
                acc = acc.union(&MultiPolygon::new(vec![piece]));
            }
        }
    }
    acc
}

fn rings_of(polygon: &Polygon<f64>) -> impl Iterator<Item = &LineString<f64>> {
    std::iter::once(polygon.exterior()).chain(polygon.interiors().iter())
}

fn ring_capsule_pieces(ring: &LineString<f64>, distance: f64) -> Vec<Polygon<f64>> {
    let coords = &ring.0;
    let mut pieces = Vec::new();
    if coords.len() < 2 {
        return pieces;
    }

    for pair in coords.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 1e-9 {
            continue;
        }
        // Unit normal scaled to the buffer distance; the quad spans both
        // sides of the edge so ring orientation does not matter.
        let nx = -dy / len * distance;
        let ny = dx / len * distance;
        pieces.push(Polygon::new(
            LineString::from(vec![
                (a.x + nx, a.y + ny),
                (b.x + nx, b.y + ny),
                (b.x - nx, b.y - ny),
                (a.x - nx, a.y - ny),
            ]),
            vec![],
        ));
    }

    // Rings are closed (first == last); skip the duplicate.
    for &v in &coords[..coords.len() - 1] {
        pieces.push(disc(v, distance));
    }
    pieces
}

fn disc(center: Coord<f64>, radius: f64) -> Polygon<f64> {
    let ring: Vec<(f64, f64)> = (0..ARC_SEGMENTS)
        .map(|i| {
            let theta = (i as f64) * std::f64::consts::TAU / (ARC_SEGMENTS as f64);
            (
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
            )
        })
        .collect();
    Polygon::new(LineString::from(ring), vec![])
}
