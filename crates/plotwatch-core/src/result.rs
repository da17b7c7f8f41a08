//! Evaluation outcomes reported to the persistence/alerting collaborators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::GeoShape;

/// Tolerance verdict for a (boundary, footprint) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    PerfectCompliance,
    WithinTolerance,
    Violation,
    Vacant,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerfectCompliance => "PERFECT_COMPLIANCE",
            Self::WithinTolerance => "WITHIN_TOLERANCE",
            Self::Violation => "VIOLATION",
            Self::Vacant => "VACANT",
        }
    }
}

/// Five-level ordinal severity derived from the composite risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
    Severe,
}

impl Severity {
    /// Classify a risk score. Bands are half-open on the low end and closed
    /// at 1.0.
    pub fn from_score(score: f64) -> Self {
        if score < 0.2 {
            Self::Low
        } else if score < 0.4 {
            Self::Moderate
        } else if score < 0.6 {
            Self::High
        } else if score < 0.8 {
            Self::Critical
        } else {
            Self::Severe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
            Self::Severe => "SEVERE",
        }
    }
}

/// Informational IoU interpretation band (see `IouBands`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IouBand {
    Excellent,
    MinorDeviation,
    Significant,
    Major,
    Critical,
}

impl IouBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::MinorDeviation => "MINOR_DEVIATION",
            Self::Significant => "SIGNIFICANT",
            Self::Major => "MAJOR",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Violation classification derived from the spatial metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// No violation finding for this plot.
    Compliant,
    /// Encroaching and more than 10% over the allotted area.
    BoundaryExceed,
    /// Structure crosses the buffered boundary.
    Encroachment,
    /// No structure detected on an allotted plot.
    Vacancy,
    /// Detected structure is less than 70% of the allotted area.
    PartialUtilization,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "COMPLIANT",
            Self::BoundaryExceed => "BOUNDARY_EXCEED",
            Self::Encroachment => "ENCROACHMENT",
            Self::Vacancy => "VACANCY",
            Self::PartialUtilization => "PARTIAL_UTILIZATION",
        }
    }
}

/// Why a plot could not be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvalFailure {
    InvalidGeometry,
    Projection,
    Configuration,
}

impl EvalFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidGeometry => "INVALID_GEOMETRY",
            Self::Projection => "PROJECTION",
            Self::Configuration => "CONFIGURATION",
        }
    }
}

/// Full compliance analysis for one plot.
///
/// A pure function of (boundary, footprint, tolerance, context) — no hidden
/// state. Invariant: `encroachment` is `Some` if and only if the verdict is
/// `Violation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub plot_id: String,
    /// Intersection over union of boundary and footprint, in [0, 1].
    pub iou: f64,
    pub iou_band: IouBand,
    /// Signed area deviation in percent; positive means over-utilization.
    pub deviation_pct: f64,
    pub verdict: Verdict,
    pub violation_kind: ViolationKind,
    /// Portion of the footprint outside the buffered boundary, in WGS84.
    pub encroachment: Option<GeoShape>,
    pub encroachment_area_sqm: f64,
    /// Greatest perpendicular reach of the encroachment beyond the boundary.
    pub max_encroachment_depth_m: f64,
    pub allotted_area_sqm: f64,
    pub detected_area_sqm: f64,
    /// Vertex-based Hausdorff distance between boundary and footprint.
    pub hausdorff_distance_m: f64,
    pub tolerance_applied_m: f64,
    /// Confidence reported by the classifier for the evaluated footprint.
    pub classifier_confidence: Option<f64>,
    pub risk_score: f64,
    pub severity: Severity,
    /// Inverse of the risk score on a 0–100 scale.
    pub compliance_score: f64,
}

/// Per-plot outcome of a region batch.
///
/// A plot that cannot be evaluated gets an explicit marker with a
/// human-readable reason; collaborators never receive a silently-zeroed or
/// fabricated score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlotReport {
    Evaluated(ComplianceResult),
    NotEvaluable {
        plot_id: String,
        kind: EvalFailure,
        reason: String,
    },
}

impl PlotReport {
    pub fn plot_id(&self) -> &str {
        match self {
            Self::Evaluated(result) => &result.plot_id,
            Self::NotEvaluable { plot_id, .. } => plot_id,
        }
    }

    pub fn as_evaluated(&self) -> Option<&ComplianceResult> {
        match self {
            Self::Evaluated(result) => Some(result),
            Self::NotEvaluable { .. } => None,
        }
    }
}

/// Region-level compliance classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceCategory {
    Compliant,
    MinorIssues,
    NonCompliant,
    Critical,
}

impl ComplianceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "COMPLIANT",
            Self::MinorIssues => "MINOR_ISSUES",
            Self::NonCompliant => "NON_COMPLIANT",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Aggregated counts for a region batch, for dashboards and alerting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub region_id: String,
    pub plots_reported: usize,
    pub plots_evaluated: usize,
    pub not_evaluable: usize,
    pub verdict_counts: BTreeMap<String, usize>,
    pub severity_counts: BTreeMap<String, usize>,
    pub total_encroachment_sqm: f64,
    pub mean_iou: f64,
    pub mean_risk: f64,
    pub category: ComplianceCategory,
}

impl RegionSummary {
    pub fn from_reports(region_id: &str, reports: &[PlotReport]) -> Self {
        let mut verdict_counts = BTreeMap::new();
        let mut severity_counts = BTreeMap::new();
        let mut not_evaluable = 0usize;
        let mut total_encroachment_sqm = 0.0;
        let mut iou_sum = 0.0;
        let mut risk_sum = 0.0;
        let mut evaluated = 0usize;

        let mut worst_violation: Option<Severity> = None;
        let mut any_finding = false;

        for report in reports {
            match report {
                PlotReport::Evaluated(result) => {
                    evaluated += 1;
                    *verdict_counts
                        .entry(result.verdict.as_str().to_string())
                        .or_insert(0) += 1;
                    *severity_counts
                        .entry(result.severity.as_str().to_string())
                        .or_insert(0) += 1;
                    total_encroachment_sqm += result.encroachment_area_sqm;
                    iou_sum += result.iou;
                    risk_sum += result.risk_score;

                    match result.verdict {
                        Verdict::Violation => {
                            any_finding = true;
                            worst_violation = Some(match worst_violation {
                                Some(current) => current.max(result.severity),
                                None => result.severity,
                            });
                        }
                        Verdict::Vacant => any_finding = true,
                        _ => {}
                    }
                }
                PlotReport::NotEvaluable { .. } => not_evaluable += 1,
            }
        }

        let category = match worst_violation {
            Some(s) if s >= Severity::Critical => ComplianceCategory::Critical,
            Some(s) if s >= Severity::High => ComplianceCategory::NonCompliant,
            Some(_) => ComplianceCategory::MinorIssues,
            None if any_finding => ComplianceCategory::MinorIssues,
            None => ComplianceCategory::Compliant,
        };

        let denom = evaluated.max(1) as f64;
        Self {
            region_id: region_id.to_string(),
            plots_reported: reports.len(),
            plots_evaluated: evaluated,
            not_evaluable,
            verdict_counts,
            severity_counts,
            total_encroachment_sqm,
            mean_iou: iou_sum / denom,
            mean_risk: risk_sum / denom,
            category,
        }
    }
}
