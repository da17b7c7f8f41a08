//! Compliance engine: per-plot evaluation, composite risk scoring, and
//! region-batch orchestration over a pluggable plot source.
//!
//! Every evaluation is a pure function of (boundary, footprint, tolerance,
//! context) with no hidden state, so per-plot work parallelizes freely and
//! results are deterministic under test.

mod batch;
mod calculator;
mod scorer;
mod source;

pub use batch::BatchEvaluator;
pub use calculator::{ComplianceCalculator, EvalError};
pub use scorer::{RiskAssessment, RiskScorer};
pub use source::{PlotSource, RegionPlot, SourceError};
