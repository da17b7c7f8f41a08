//! In-memory plot store for fixtures and library consumers.

use std::collections::HashMap;

use plotwatch_engine::{PlotSource, RegionPlot, SourceError};

#[derive(Default)]
pub struct MemoryStore {
    regions: HashMap<String, Vec<RegionPlot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_plot(&mut self, region_id: &str, plot: RegionPlot) {
        self.regions
            .entry(region_id.to_string())
            .or_default()
            .push(plot);
    }

    pub fn region_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.regions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl PlotSource for MemoryStore {
    fn region_plots(&self, region_id: &str) -> Result<Vec<RegionPlot>, SourceError> {
        self.regions
            .get(region_id)
            .cloned()
            .ok_or_else(|| SourceError::UnknownRegion(region_id.to_string()))
    }
}
