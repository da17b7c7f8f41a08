//! Compliance evaluation for a single (boundary, footprint) pair.

use geo::MultiPolygon;
use thiserror::Error;
use tracing::info;

use plotwatch_core::{
    AllotmentBoundary, CalculatorConfig, ComplianceResult, ConfigError, DetectedFootprint,
    EvalFailure, GeoShape, Severity, Verdict, ViolationKind,
};
use plotwatch_geom::{GeomError, MetricProjection, distance, make_valid, ops};

/// Per-plot evaluation failures.
///
/// Converted into an explicit `NotEvaluable` report at the batch boundary so
/// one corrupt record never aborts a region.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid geometry: {0}")]
    Geometry(String),

    #[error("projection failed: {0}")]
    Projection(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<GeomError> for EvalError {
    fn from(err: GeomError) -> Self {
        match err {
            GeomError::InvalidGeometry(msg) => Self::Geometry(msg),
            GeomError::Projection(msg) => Self::Projection(msg),
        }
    }
}

impl EvalError {
    pub fn failure_kind(&self) -> EvalFailure {
        match self {
            Self::Geometry(_) => EvalFailure::InvalidGeometry,
            Self::Projection(_) => EvalFailure::Projection,
            Self::Config(_) => EvalFailure::Configuration,
        }
    }
}

/// Compares an allotted boundary against an observed structure footprint and
/// produces the quantified compliance verdict.
pub struct ComplianceCalculator {
    config: CalculatorConfig,
}

impl ComplianceCalculator {
    pub fn new(config: CalculatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Evaluate one plot.
    ///
    /// `footprint` is the newest observation for the plot; `None` or an
    /// observation without geometry means the classifier saw nothing and the
    /// plot is vacant. The risk fields of the returned result are filled by
    /// the scorer afterwards.
    pub fn evaluate(
        &self,
        boundary: &AllotmentBoundary,
        footprint: Option<&DetectedFootprint>,
        tolerance_m: f64,
    ) -> Result<ComplianceResult, EvalError> {
        if !tolerance_m.is_finite() || tolerance_m < 0.0 {
            return Err(ConfigError::BadTolerance {
                source_name: "caller-supplied".to_string(),
                value: tolerance_m,
            }
            .into());
        }

        // Both polygons go through the same per-plot metric frame, anchored
        // at the boundary.
        let projection = MetricProjection::for_rings(&boundary.geometry)?;
        let boundary_mp = make_valid(&projection, &boundary.geometry)?;
        if ops::is_empty(&boundary_mp) {
            return Err(EvalError::Geometry(format!(
                "boundary of plot {} is empty or unrepairable",
                boundary.plot_id
            )));
        }
        let allotted_area = ops::area_sqm(&boundary_mp);
        if allotted_area <= 0.0 {
            return Err(EvalError::Geometry(format!(
                "boundary of plot {} has zero area after reprojection",
                boundary.plot_id
            )));
        }

        let confidence = footprint.map(|f| f.confidence);
        let footprint_mp = match footprint.and_then(|f| f.geometry.as_ref()) {
            Some(rings) => make_valid(&projection, rings)?,
            None => MultiPolygon::new(Vec::new()),
        };

        if ops::is_empty(&footprint_mp) {
            let result = self.vacant(boundary, allotted_area, tolerance_m, confidence);
            info!(
                plot_id = %result.plot_id,
                verdict = result.verdict.as_str(),
                "plot evaluated"
            );
            return Ok(result);
        }

        let detected_area = ops::area_sqm(&footprint_mp);
        let union_area = ops::area_sqm(&ops::union(&boundary_mp, &footprint_mp));
        let iou = if union_area > 0.0 {
            ops::area_sqm(&ops::intersection(&boundary_mp, &footprint_mp)) / union_area
        } else {
            0.0
        };
        let deviation_pct = (detected_area - allotted_area) / allotted_area * 100.0;

        let buffered = ops::buffer(&boundary_mp, tolerance_m);

        let mut encroachment_mp = MultiPolygon::new(Vec::new());
        let verdict = if ops::contains(&boundary_mp, &footprint_mp) {
            Verdict::PerfectCompliance
        } else if ops::contains(&buffered, &footprint_mp) {
            Verdict::WithinTolerance
        } else {
            let excess = ops::difference(&footprint_mp, &buffered);
            let excess_area = ops::area_sqm(&excess);
            if ops::is_empty(&excess) {
                // The buffer absorbed the apparent excess even though strict
                // containment failed numerically.
                Verdict::WithinTolerance
            } else if excess_area < self.config.noise_floor_sqm {
                // Sub-floor excess is sensor/geometry noise, not a violation.
                Verdict::WithinTolerance
            } else {
                encroachment_mp = excess;
                Verdict::Violation
            }
        };

        let encroachment_area_sqm = ops::area_sqm(&encroachment_mp);
        let (encroachment, max_depth) = if verdict == Verdict::Violation {
            (
                GeoShape::from_parts(projection.unproject_multi(&encroachment_mp)),
                distance::max_depth_m(&boundary_mp, &encroachment_mp),
            )
        } else {
            (None, 0.0)
        };

        let violation_kind = if verdict == Verdict::Violation {
            if deviation_pct > 10.0 {
                ViolationKind::BoundaryExceed
            } else {
                ViolationKind::Encroachment
            }
        } else if deviation_pct < -30.0 {
            ViolationKind::PartialUtilization
        } else {
            ViolationKind::Compliant
        };

        let result = ComplianceResult {
            plot_id: boundary.plot_id.clone(),
            iou,
            iou_band: self.config.iou_bands.classify(iou),
            deviation_pct,
            verdict,
            violation_kind,
            encroachment,
            encroachment_area_sqm,
            max_encroachment_depth_m: max_depth,
            allotted_area_sqm: allotted_area,
            detected_area_sqm: detected_area,
            hausdorff_distance_m: distance::hausdorff_m(&boundary_mp, &footprint_mp),
            tolerance_applied_m: tolerance_m,
            classifier_confidence: confidence,
            risk_score: 0.0,
            severity: Severity::Low,
            compliance_score: 100.0,
        };

        info!(
            plot_id = %result.plot_id,
            iou = result.iou,
            deviation_pct = result.deviation_pct,
            verdict = result.verdict.as_str(),
            "plot evaluated"
        );
        Ok(result)
    }

    fn vacant(
        &self,
        boundary: &AllotmentBoundary,
        allotted_area: f64,
        tolerance_m: f64,
        confidence: Option<f64>,
    ) -> ComplianceResult {
        ComplianceResult {
            plot_id: boundary.plot_id.clone(),
            iou: 0.0,
            iou_band: self.config.iou_bands.classify(0.0),
            deviation_pct: -100.0,
            verdict: Verdict::Vacant,
            violation_kind: ViolationKind::Vacancy,
            encroachment: None,
            encroachment_area_sqm: 0.0,
            max_encroachment_depth_m: 0.0,
            allotted_area_sqm: allotted_area,
            detected_area_sqm: 0.0,
            hausdorff_distance_m: 0.0,
            tolerance_applied_m: tolerance_m,
            classifier_confidence: confidence,
            risk_score: 0.0,
            severity: Severity::Low,
            compliance_score: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use plotwatch_core::{BoundaryOrigin, FootprintClass, Position, RingGeometry};

    /// Meters expressed as WGS84 degrees near the equator.
    fn deg(x_m: f64, y_m: f64) -> Position {
        [x_m / 111_320.0, y_m / 111_320.0]
    }

    fn rect(x0: f64, y0: f64, w: f64, h: f64) -> RingGeometry {
        RingGeometry::new(vec![
            deg(x0, y0),
            deg(x0 + w, y0),
            deg(x0 + w, y0 + h),
            deg(x0, y0 + h),
        ])
    }

    fn boundary(geometry: RingGeometry) -> AllotmentBoundary {
        AllotmentBoundary {
            plot_id: "P-1".to_string(),
            geometry,
            origin: BoundaryOrigin::Survey,
            accuracy_m: 0.5,
            active: true,
        }
    }

    fn footprint(geometry: Option<RingGeometry>) -> DetectedFootprint {
        DetectedFootprint {
            plot_id: "P-1".to_string(),
            geometry,
            confidence: 0.9,
            class_label: FootprintClass::BuiltUp,
            observed_at: DateTime::from_timestamp(1_750_000_000, 0).unwrap(),
        }
    }

    fn calculator() -> ComplianceCalculator {
        ComplianceCalculator::new(CalculatorConfig::default()).unwrap()
    }

    #[test]
    fn identical_footprint_is_perfect_compliance() {
        let result = calculator()
            .evaluate(
                &boundary(rect(0.0, 0.0, 100.0, 100.0)),
                Some(&footprint(Some(rect(0.0, 0.0, 100.0, 100.0)))),
                5.0,
            )
            .unwrap();

        assert_eq!(result.verdict, Verdict::PerfectCompliance);
        assert!((result.iou - 1.0).abs() < 1e-9);
        assert!(result.deviation_pct.abs() < 1e-9);
        assert!(result.encroachment.is_none());
        assert!((result.allotted_area_sqm - 10_000.0).abs() < 1.0);
    }

    #[test]
    fn small_overshoot_stays_within_tolerance() {
        // 2 m overshoot on one side against a 5 m tolerance buffer.
        let result = calculator()
            .evaluate(
                &boundary(rect(0.0, 0.0, 100.0, 100.0)),
                Some(&footprint(Some(rect(0.0, 0.0, 102.0, 100.0)))),
                5.0,
            )
            .unwrap();

        assert_eq!(result.verdict, Verdict::WithinTolerance);
        assert!(result.encroachment.is_none());
        assert_eq!(result.encroachment_area_sqm, 0.0);
    }

    #[test]
    fn clear_overshoot_is_a_violation() {
        // 20 m overshoot along the full 100 m edge; the 5 m buffer strip
        // leaves a 15 × 100 m encroachment.
        let result = calculator()
            .evaluate(
                &boundary(rect(0.0, 0.0, 100.0, 100.0)),
                Some(&footprint(Some(rect(0.0, 0.0, 120.0, 100.0)))),
                5.0,
            )
            .unwrap();

        assert_eq!(result.verdict, Verdict::Violation);
        assert!((result.encroachment_area_sqm - 1_500.0).abs() < 10.0);
        assert!((result.max_encroachment_depth_m - 20.0).abs() < 0.1);
        assert_eq!(result.violation_kind, ViolationKind::BoundaryExceed);
        assert!(result.encroachment.is_some());
        assert!((result.deviation_pct - 20.0).abs() < 0.01);
    }

    #[test]
    fn missing_footprint_is_vacant() {
        let result = calculator()
            .evaluate(&boundary(rect(0.0, 0.0, 100.0, 100.0)), None, 5.0)
            .unwrap();

        assert_eq!(result.verdict, Verdict::Vacant);
        assert_eq!(result.iou, 0.0);
        assert_eq!(result.deviation_pct, -100.0);
        assert!(result.encroachment.is_none());
        assert_eq!(result.violation_kind, ViolationKind::Vacancy);

        // An observation whose classifier saw nothing is the same.
        let result = calculator()
            .evaluate(
                &boundary(rect(0.0, 0.0, 100.0, 100.0)),
                Some(&footprint(None)),
                5.0,
            )
            .unwrap();
        assert_eq!(result.verdict, Verdict::Vacant);
    }

    #[test]
    fn sub_floor_excess_is_noise_not_violation() {
        // A 2 × 5 m bump past the boundary: well under the 50 m² floor.
        let bump = RingGeometry::new(vec![
            deg(0.0, 0.0),
            deg(100.0, 0.0),
            deg(100.0, 45.0),
            deg(102.0, 45.0),
            deg(102.0, 50.0),
            deg(100.0, 50.0),
            deg(100.0, 100.0),
            deg(0.0, 100.0),
        ]);
        let result = calculator()
            .evaluate(
                &boundary(rect(0.0, 0.0, 100.0, 100.0)),
                Some(&footprint(Some(bump))),
                0.1,
            )
            .unwrap();

        assert_eq!(result.verdict, Verdict::WithinTolerance);
        assert!(result.encroachment.is_none());
        assert_eq!(result.encroachment_area_sqm, 0.0);
    }

    #[test]
    fn iou_is_symmetric() {
        let calc = calculator();
        let a = rect(0.0, 0.0, 100.0, 100.0);
        let b = rect(50.0, 50.0, 100.0, 100.0);

        let ab = calc
            .evaluate(&boundary(a.clone()), Some(&footprint(Some(b.clone()))), 5.0)
            .unwrap();
        let ba = calc
            .evaluate(&boundary(b), Some(&footprint(Some(a))), 5.0)
            .unwrap();

        assert!((ab.iou - ba.iou).abs() < 1e-6);
        // 2 500 m² overlap over a 17 500 m² union.
        assert!((ab.iou - 2_500.0 / 17_500.0).abs() < 1e-4);
    }

    #[test]
    fn growing_tolerance_never_reintroduces_a_violation() {
        let calc = calculator();
        let rank = |v: Verdict| match v {
            Verdict::Violation => 0,
            Verdict::WithinTolerance => 1,
            Verdict::PerfectCompliance | Verdict::Vacant => 2,
        };

        let mut last_rank = 0;
        for tolerance in [0.5, 1.0, 2.0, 5.0, 10.0] {
            let result = calc
                .evaluate(
                    &boundary(rect(0.0, 0.0, 100.0, 100.0)),
                    Some(&footprint(Some(rect(0.0, 0.0, 102.0, 100.0)))),
                    tolerance,
                )
                .unwrap();
            let r = rank(result.verdict);
            assert!(
                r >= last_rank,
                "tolerance {tolerance} regressed to {:?}",
                result.verdict
            );
            last_rank = r;
        }
    }

    #[test]
    fn unrepairable_boundary_is_an_error() {
        let degenerate = RingGeometry::new(vec![deg(0.0, 0.0), deg(100.0, 0.0)]);
        let err = calculator()
            .evaluate(&boundary(degenerate), Some(&footprint(None)), 5.0)
            .unwrap_err();
        assert_eq!(err.failure_kind(), EvalFailure::InvalidGeometry);
    }

    #[test]
    fn negative_tolerance_is_a_config_error() {
        let err = calculator()
            .evaluate(
                &boundary(rect(0.0, 0.0, 100.0, 100.0)),
                Some(&footprint(None)),
                -1.0,
            )
            .unwrap_err();
        assert_eq!(err.failure_kind(), EvalFailure::Configuration);
    }

    #[test]
    fn multi_part_encroachment_is_a_collection() {
        // Footprint protrudes past both the left and right edges.
        let result = calculator()
            .evaluate(
                &boundary(rect(0.0, 0.0, 100.0, 100.0)),
                Some(&footprint(Some(rect(-20.0, 10.0, 140.0, 80.0)))),
                5.0,
            )
            .unwrap();

        assert_eq!(result.verdict, Verdict::Violation);
        let shape = result.encroachment.as_ref().unwrap();
        assert_eq!(shape.part_count(), 2);
        // Two 15 × 80 m strips.
        assert!((result.encroachment_area_sqm - 2_400.0).abs() < 10.0);
    }
}
