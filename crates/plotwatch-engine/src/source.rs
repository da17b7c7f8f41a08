//! Data-source seam to the collaborator store.

use thiserror::Error;

use plotwatch_core::{AllotmentBoundary, DetectedFootprint, PlotContext};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("{0}")]
    Backend(String),
}

/// One plot's records as pulled from the collaborator store.
#[derive(Debug, Clone)]
pub struct RegionPlot {
    pub boundary: AllotmentBoundary,
    /// Footprint observations, any order; the batch evaluates the newest.
    pub footprints: Vec<DetectedFootprint>,
    pub context: Option<PlotContext>,
    /// Imagery/survey source name, resolved against the tolerance table.
    pub observation_source: String,
}

/// Read-only access to a region's plots.
///
/// Fetching the region is the engine's sole I/O; everything after it is pure
/// computation.
pub trait PlotSource {
    fn region_plots(&self, region_id: &str) -> Result<Vec<RegionPlot>, SourceError>;
}
