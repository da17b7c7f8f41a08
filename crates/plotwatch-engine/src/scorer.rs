//! Composite risk scoring and severity classification.

use plotwatch_core::{ComplianceResult, ConfigError, PlotContext, RiskWeights, Severity, Verdict};

/// Risk score and severity for one evaluated plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub score: f64,
    pub severity: Severity,
}

impl RiskAssessment {
    pub fn apply_to(&self, result: &mut ComplianceResult) {
        result.risk_score = self.score;
        result.severity = self.severity;
        result.compliance_score = (1.0 - self.score) * 100.0;
    }
}

/// Weighted composite scorer over the spatial metrics and optional plot
/// history.
///
/// Weights are validated at construction; a bad weight table fails loudly
/// before any evaluation begins.
pub struct RiskScorer {
    weights: RiskWeights,
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
        }
    }
}

impl RiskScorer {
    pub fn new(weights: RiskWeights) -> Result<Self, ConfigError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &RiskWeights {
        &self.weights
    }

    /// Score an evaluated result. History components are zero when no
    /// context is available; they are never fabricated.
    pub fn score(&self, result: &ComplianceResult, context: Option<&PlotContext>) -> RiskAssessment {
        let w = &self.weights;

        let (s_temporal, s_vacancy) = match context {
            Some(ctx) => (
                (ctx.trend_slope_per_month * ctx.observed_months).clamp(0.0, 1.0),
                (ctx.months_vacant / 36.0).clamp(0.0, 1.0),
            ),
            None => (0.0, 0.0),
        };

        let raw = match result.verdict {
            // A vacant plot has no structure to mismatch against the
            // boundary; only its history components carry risk.
            Verdict::Vacant => w.temporal * s_temporal + w.vacancy * s_vacancy,
            _ => {
                let s_area = (result.deviation_pct.abs() / 50.0).min(1.0);
                let s_iou = (1.0 - result.iou).clamp(0.0, 1.0);
                let s_boundary = (result.max_encroachment_depth_m / 20.0).min(1.0);
                w.area * s_area
                    + w.iou * s_iou
                    + w.boundary * s_boundary
                    + w.temporal * s_temporal
                    + w.vacancy * s_vacancy
            }
        };

        let score = raw.clamp(0.0, 1.0);
        RiskAssessment {
            score,
            severity: Severity::from_score(score),
        }
    }
}
