//! JSON region-file store.
//!
//! A region file carries the external exchange records for one region: the
//! observation source, and per plot its boundary, footprint observations,
//! and optional scorer context.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use plotwatch_core::{AllotmentBoundary, DetectedFootprint, PlotContext};
use plotwatch_engine::{PlotSource, RegionPlot, SourceError};

use crate::error::StoreError;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegionFile {
    pub region_id: String,
    pub observation_source: String,
    pub plots: Vec<PlotEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlotEntry {
    pub boundary: AllotmentBoundary,
    #[serde(default)]
    pub footprints: Vec<DetectedFootprint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<PlotContext>,
    /// Per-plot override of the file-level observation source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_source: Option<String>,
}

#[derive(Debug, Default)]
pub struct JsonStore {
    regions: HashMap<String, Vec<RegionPlot>>,
}

impl JsonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a single region file into a fresh store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.load_file(path)?;
        Ok(store)
    }

    /// Load a region file, replacing any previously loaded region of the
    /// same id.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::FileNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let RegionFile {
            region_id,
            observation_source,
            plots,
        } = serde_json::from_str(&contents)?;

        let plots: Vec<RegionPlot> = plots
            .into_iter()
            .map(|entry| RegionPlot {
                boundary: entry.boundary,
                footprints: entry.footprints,
                context: entry.context,
                observation_source: entry
                    .observation_source
                    .unwrap_or_else(|| observation_source.clone()),
            })
            .collect();

        info!(
            region_id = %region_id,
            plots = plots.len(),
            "region file loaded"
        );
        self.regions.insert(region_id, plots);
        Ok(())
    }

    /// Force every loaded plot onto one observation source.
    pub fn override_source(&mut self, source: &str) {
        for plots in self.regions.values_mut() {
            for plot in plots.iter_mut() {
                plot.observation_source = source.to_string();
            }
        }
    }

    pub fn region_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.regions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl PlotSource for JsonStore {
    fn region_plots(&self, region_id: &str) -> Result<Vec<RegionPlot>, SourceError> {
        self.regions
            .get(region_id)
            .cloned()
            .ok_or_else(|| SourceError::UnknownRegion(region_id.to_string()))
    }
}
