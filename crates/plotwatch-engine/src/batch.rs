//! Region-level orchestration.
//!
//! Plots are independent and order-insensitive. A corrupt record becomes a
//! per-plot `NotEvaluable` report and never aborts the batch. The sequential
//! path is a lazy iterator (restart a region by invoking it again); the
//! parallel path fans plots across rayon workers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, warn};

use plotwatch_core::{EvalFailure, PlotReport, RegionSummary, ToleranceTable};

use crate::calculator::ComplianceCalculator;
use crate::scorer::RiskScorer;
use crate::source::{PlotSource, RegionPlot, SourceError};

pub struct BatchEvaluator {
    calculator: ComplianceCalculator,
    scorer: RiskScorer,
    tolerances: ToleranceTable,
    cancel: Option<Arc<AtomicBool>>,
}

impl BatchEvaluator {
    pub fn new(
        calculator: ComplianceCalculator,
        scorer: RiskScorer,
        tolerances: ToleranceTable,
    ) -> Self {
        Self {
            calculator,
            scorer,
            tolerances,
            cancel: None,
        }
    }

    /// Batch-level cancellation: the flag is checked between plots, so an
    /// in-flight plot always completes. There is no preemption below the
    /// batch.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// A plot is evaluable when it has an active boundary and at least one
    /// footprint observation.
    fn eligible(plot: &RegionPlot) -> bool {
        plot.boundary.active && !plot.footprints.is_empty()
    }

    /// Lazily evaluate a region, one report per eligible plot.
    ///
    /// Fetching the plots is the only I/O; the returned iterator computes
    /// each report on demand so callers can stream large regions without
    /// buffering.
    pub fn evaluate_region<'a, S: PlotSource>(
        &'a self,
        source: &S,
        region_id: &str,
    ) -> Result<impl Iterator<Item = PlotReport> + 'a, SourceError> {
        let plots = source.region_plots(region_id)?;
        debug!(region_id, plots = plots.len(), "region fetched");
        Ok(plots
            .into_iter()
            .take_while(move |_| !self.cancelled())
            .filter(|plot| Self::eligible(plot))
            .map(move |plot| self.evaluate_plot(&plot)))
    }

    /// Evaluate a region's plots across worker threads.
    ///
    /// Per-plot evaluation shares no mutable state, so no locking is needed.
    pub fn evaluate_region_parallel<S: PlotSource>(
        &self,
        source: &S,
        region_id: &str,
    ) -> Result<Vec<PlotReport>, SourceError> {
        let plots = source.region_plots(region_id)?;
        debug!(region_id, plots = plots.len(), "region fetched");
        Ok(plots
            .into_par_iter()
            .filter(|plot| Self::eligible(plot) && !self.cancelled())
            .map(|plot| self.evaluate_plot(&plot))
            .collect())
    }

    pub fn summarize(&self, region_id: &str, reports: &[PlotReport]) -> RegionSummary {
        RegionSummary::from_reports(region_id, reports)
    }

    /// Evaluate one plot, converting every failure into an explicit report.
    pub fn evaluate_plot(&self, plot: &RegionPlot) -> PlotReport {
        let plot_id = plot.boundary.plot_id.clone();

        let tolerance_m = match self.tolerances.tolerance_for(&plot.observation_source) {
            Ok(tolerance) => tolerance,
            Err(err) => {
                warn!(plot_id = %plot_id, %err, "plot not evaluable");
                return PlotReport::NotEvaluable {
                    plot_id,
                    kind: EvalFailure::Configuration,
                    reason: err.to_string(),
                };
            }
        };

        let newest = plot.footprints.iter().max_by_key(|f| f.observed_at);

        match self.calculator.evaluate(&plot.boundary, newest, tolerance_m) {
            Ok(mut result) => {
                self.scorer
                    .score(&result, plot.context.as_ref())
                    .apply_to(&mut result);
                PlotReport::Evaluated(result)
            }
            Err(err) => {
                warn!(plot_id = %plot_id, %err, "plot not evaluable");
                PlotReport::NotEvaluable {
                    plot_id,
                    kind: err.failure_kind(),
                    reason: err.to_string(),
                }
            }
        }
    }
}
