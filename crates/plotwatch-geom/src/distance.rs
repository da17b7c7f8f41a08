//! Vertex-based distance measures in the metric frame.
//!
//! Encroachment depth and boundary-shift reporting both reduce to distances
//! between polygon vertices and edges; both return 0.0 when either shape is
//! empty.

use geo::{Coord, MultiPolygon, Polygon};

/// Greatest perpendicular reach of `probe` beyond `reference`: the maximum,
/// over vertices of `probe`, of the minimum distance to any edge of
/// `reference`.
pub fn max_depth_m(reference: &MultiPolygon<f64>, probe: &MultiPolygon<f64>) -> f64 {
    let edges: Vec<(Coord<f64>, Coord<f64>)> = edges_of(reference).collect();
    if edges.is_empty() {
        return 0.0;
    }

    let mut max_depth = 0.0f64;
    for vertex in vertices_of(probe) {
        let nearest = edges
            .iter()
            .map(|&(a, b)| point_segment_distance(vertex, a, b))
            .fold(f64::INFINITY, f64::min);
        max_depth = max_depth.max(nearest);
    }
    max_depth
}

/// Symmetric vertex-based Hausdorff distance between two shapes.
pub fn hausdorff_m(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> f64 {
    let va: Vec<Coord<f64>> = vertices_of(a).collect();
    let vb: Vec<Coord<f64>> = vertices_of(b).collect();
    if va.is_empty() || vb.is_empty() {
        return 0.0;
    }
    directed_hausdorff(&va, &vb).max(directed_hausdorff(&vb, &va))
}

fn directed_hausdorff(from: &[Coord<f64>], to: &[Coord<f64>]) -> f64 {
    let mut max_dist = 0.0f64;
    for &p in from {
        let nearest = to
            .iter()
            .map(|&q| {
                let dx = p.x - q.x;
                let dy = p.y - q.y;
                (dx * dx + dy * dy).sqrt()
            })
            .fold(f64::INFINITY, f64::min);
        max_dist = max_dist.max(nearest);
    }
    max_dist
}

fn point_segment_distance(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let cx = a.x + t * abx;
    let cy = a.y + t * aby;
    let dx = p.x - cx;
    let dy = p.y - cy;
    (dx * dx + dy * dy).sqrt()
}

fn rings_of(polygon: &Polygon<f64>) -> impl Iterator<Item = &geo::LineString<f64>> {
    std::iter::once(polygon.exterior()).chain(polygon.interiors().iter())
}

fn vertices_of(multi: &MultiPolygon<f64>) -> impl Iterator<Item = Coord<f64>> + '_ {
    multi
        .0
        .iter()
        .flat_map(|p| rings_of(p))
        .flat_map(|ring| {
            let coords = &ring.0;
            // Rings are closed; skip the duplicate closing vertex.
            let n = coords.len().saturating_sub(1);
            coords[..n].iter().copied()
        })
}

fn edges_of(multi: &MultiPolygon<f64>) -> impl Iterator<Item = (Coord<f64>, Coord<f64>)> + '_ {
    multi
        .0
        .iter()
        .flat_map(|p| rings_of(p))
        .flat_map(|ring| ring.0.windows(2).map(|w| (w[0], w[1])))
}
