//! Plot records exchanged with the ingestion and history collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::RingGeometry;

/// How an allotment boundary was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryOrigin {
    Survey,
    Digitized,
    Manual,
}

/// An officially allotted plot boundary (WGS84).
///
/// Immutable once verified: a re-survey creates a new version and marks the
/// old one inactive, it never mutates a boundary in place. The engine only
/// evaluates active boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllotmentBoundary {
    pub plot_id: String,
    pub geometry: RingGeometry,
    pub origin: BoundaryOrigin,
    /// Survey accuracy radius in meters, as recorded at ingestion.
    pub accuracy_m: f64,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// Structure class assigned by the external imagery classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FootprintClass {
    BuiltUp,
    Vacant,
    UnderConstruction,
}

/// One structure footprint observed on a plot at a single instant.
///
/// Produced by the external classifier; immutable. `geometry` is `None` when
/// the classifier saw no structure at all on the plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFootprint {
    pub plot_id: String,
    pub geometry: Option<RingGeometry>,
    /// Classifier confidence in [0, 1].
    pub confidence: f64,
    pub class_label: FootprintClass,
    pub observed_at: DateTime<Utc>,
}

/// Optional per-plot history context consumed by the risk scorer.
///
/// All components default to zero when history is unavailable; the scorer
/// never fabricates them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotContext {
    /// Encroachment-growth slope from the change-detection history, per month.
    #[serde(default)]
    pub trend_slope_per_month: f64,
    /// Number of months the trend was observed over.
    #[serde(default)]
    pub observed_months: f64,
    /// Months the plot has been sitting vacant.
    #[serde(default)]
    pub months_vacant: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_active_defaults_to_true() {
        let json = r#"{
            "plot_id": "SLT1-001",
            "geometry": { "exterior": [[81.68, 21.32], [81.69, 21.32], [81.69, 21.33]] },
            "origin": "survey",
            "accuracy_m": 0.5
        }"#;
        let boundary: AllotmentBoundary = serde_json::from_str(json).unwrap();
        assert!(boundary.active);
        assert_eq!(boundary.origin, BoundaryOrigin::Survey);
    }

    #[test]
    fn footprint_class_uses_classifier_labels() {
        let json = serde_json::to_string(&FootprintClass::BuiltUp).unwrap();
        assert_eq!(json, "\"BUILT_UP\"");
        let json = serde_json::to_string(&FootprintClass::UnderConstruction).unwrap();
        assert_eq!(json, "\"UNDER_CONSTRUCTION\"");
    }

    #[test]
    fn footprint_geometry_may_be_absent() {
        let json = r#"{
            "plot_id": "SLT1-004",
            "geometry": null,
            "confidence": 0.93,
            "class_label": "VACANT",
            "observed_at": "2026-03-01T00:00:00Z"
        }"#;
        let fp: DetectedFootprint = serde_json::from_str(json).unwrap();
        assert!(fp.geometry.is_none());
        assert_eq!(fp.class_label, FootprintClass::Vacant);
    }
}
