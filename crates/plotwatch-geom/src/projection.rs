//! Local metric projection for WGS84 rings.
//!
//! Plots span a few hundred meters, so an equirectangular frame anchored at
//! a reference origin is metrically accurate at plot scale: x/y are meters
//! east/north of the origin, scaled by meters-per-degree at the origin
//! latitude. One frame per boundary keeps the anchor local; both polygons of
//! a pair must be projected through the same frame.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use plotwatch_core::{Position, RingGeometry};

use crate::error::GeomError;

/// Meters per degree of latitude.
pub const M_PER_DEG_LAT: f64 = 111_320.0;

/// Latitudes beyond this are outside the projection's usable range.
const MAX_ABS_LAT_DEG: f64 = 84.0;

/// Longitude span around the origin within which the frame stays metric.
const MAX_LON_SPAN_DEG: f64 = 3.0;

/// Metric frame anchored at a reference origin.
///
/// Cheap to construct; built once per evaluation and never shared mutably
/// between workers.
#[derive(Debug, Clone, Copy)]
pub struct MetricProjection {
    origin_lon: f64,
    origin_lat: f64,
    m_per_deg_lon: f64,
}

impl MetricProjection {
    pub fn centered_on(lon: f64, lat: f64) -> Result<Self, GeomError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(GeomError::Projection(format!(
                "non-finite origin ({lon}, {lat})"
            )));
        }
        if lat.abs() > MAX_ABS_LAT_DEG || lon.abs() > 180.0 {
            return Err(GeomError::Projection(format!(
                "origin ({lon}, {lat}) outside usable range"
            )));
        }
        Ok(Self {
            origin_lon: lon,
            origin_lat: lat,
            m_per_deg_lon: M_PER_DEG_LAT * lat.to_radians().cos(),
        })
    }

    /// Anchor a frame at the vertex mean of a ring geometry — the usual
    /// per-plot frame, anchored at the plot's allotment boundary.
    pub fn for_rings(rings: &RingGeometry) -> Result<Self, GeomError> {
        let mut pts: &[Position] = &rings.exterior;
        // Ignore an explicit closing duplicate so it doesn't skew the mean.
        if pts.len() > 1 && pts.first() == pts.last() {
            pts = &pts[..pts.len() - 1];
        }

        let finite: Vec<&Position> = pts
            .iter()
            .filter(|p| p[0].is_finite() && p[1].is_finite())
            .collect();
        if finite.is_empty() {
            return Err(GeomError::InvalidGeometry(
                "no finite vertices to anchor a projection on".to_string(),
            ));
        }

        let n = finite.len() as f64;
        let lon = finite.iter().map(|p| p[0]).sum::<f64>() / n;
        let lat = finite.iter().map(|p| p[1]).sum::<f64>() / n;
        Self::centered_on(lon, lat)
    }

    pub fn project_position(&self, position: Position) -> Result<Coord<f64>, GeomError> {
        let [lon, lat] = position;
        if !lon.is_finite() || !lat.is_finite() {
            return Err(GeomError::Projection(format!(
                "non-finite coordinate ({lon}, {lat})"
            )));
        }
        if lat.abs() > MAX_ABS_LAT_DEG {
            return Err(GeomError::Projection(format!(
                "latitude {lat} outside usable range"
            )));
        }
        if (lon - self.origin_lon).abs() > MAX_LON_SPAN_DEG {
            return Err(GeomError::Projection(format!(
                "longitude {lon} outside the frame's valid span around {}",
                self.origin_lon
            )));
        }
        Ok(Coord {
            x: (lon - self.origin_lon) * self.m_per_deg_lon,
            y: (lat - self.origin_lat) * M_PER_DEG_LAT,
        })
    }

    pub fn unproject_coord(&self, coord: Coord<f64>) -> Position {
        [
            self.origin_lon + coord.x / self.m_per_deg_lon,
            self.origin_lat + coord.y / M_PER_DEG_LAT,
        ]
    }

    pub fn project_ring(&self, ring: &[Position]) -> Result<LineString<f64>, GeomError> {
        let coords = ring
            .iter()
            .map(|&p| self.project_position(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LineString::from(coords))
    }

    /// Project a ring geometry into the frame. Rings are closed by the
    /// polygon constructor; validity is the repair step's concern.
    pub fn project_rings(&self, rings: &RingGeometry) -> Result<Polygon<f64>, GeomError> {
        let exterior = self.project_ring(&rings.exterior)?;
        let interiors = rings
            .interiors
            .iter()
            .map(|r| self.project_ring(r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Polygon::new(exterior, interiors))
    }

    pub fn unproject_polygon(&self, polygon: &Polygon<f64>) -> RingGeometry {
        let exterior = polygon
            .exterior()
            .coords()
            .map(|&c| self.unproject_coord(c))
            .collect();
        let interiors = polygon
            .interiors()
            .iter()
            .map(|ring| ring.coords().map(|&c| self.unproject_coord(c)).collect())
            .collect();
        RingGeometry::with_interiors(exterior, interiors)
    }

    pub fn unproject_multi(&self, multi: &MultiPolygon<f64>) -> Vec<RingGeometry> {
        multi.0.iter().map(|p| self.unproject_polygon(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let proj = MetricProjection::centered_on(0.0, 0.0).unwrap();
        let c = proj.project_position([1.0, 0.0]).unwrap();
        assert!((c.x - M_PER_DEG_LAT).abs() < 1e-6);
        assert!(c.y.abs() < 1e-9);
    }

    #[test]
    fn longitude_shrinks_with_latitude() {
        let proj = MetricProjection::centered_on(81.0, 60.0).unwrap();
        let c = proj.project_position([82.0, 60.0]).unwrap();
        // cos(60°) = 0.5
        assert!((c.x - M_PER_DEG_LAT * 0.5).abs() < 1.0);
    }

    #[test]
    fn polar_origin_rejected() {
        assert!(MetricProjection::centered_on(0.0, 89.0).is_err());
        assert!(MetricProjection::centered_on(0.0, f64::NAN).is_err());
    }

    #[test]
    fn coordinate_outside_span_rejected() {
        let proj = MetricProjection::centered_on(81.0, 21.0).unwrap();
        let err = proj.project_position([88.0, 21.0]).unwrap_err();
        assert!(matches!(err, GeomError::Projection(_)));
    }

    #[test]
    fn project_unproject_roundtrip() {
        let proj = MetricProjection::centered_on(81.63, 21.25).unwrap();
        let original = [81.6351, 21.2467];
        let metric = proj.project_position(original).unwrap();
        let back = proj.unproject_coord(metric);
        assert!((back[0] - original[0]).abs() < 1e-12);
        assert!((back[1] - original[1]).abs() < 1e-12);
    }

    #[test]
    fn anchor_ignores_closing_duplicate() {
        let rings = RingGeometry::new(vec![
            [81.0, 21.0],
            [81.001, 21.0],
            [81.001, 21.001],
            [81.0, 21.001],
            [81.0, 21.0],
        ]);
        let proj = MetricProjection::for_rings(&rings).unwrap();
        let center = proj.project_position([81.0005, 21.0005]).unwrap();
        assert!(center.x.abs() < 1e-6);
        assert!(center.y.abs() < 1e-6);
    }
}
