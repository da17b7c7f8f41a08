//! Validated engine configuration.
//!
//! Tunables live in explicit structures handed to the components at
//! construction, not in scattered constants or mutable globals. Every
//! structure validates itself eagerly so a bad deployment fails before the
//! first plot is evaluated.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::result::IouBand;

const WEIGHT_SUM_EPS: f64 = 1e-9;

/// Tolerance buffer distance in meters, keyed by observation source.
///
/// The buffer absorbs georeferencing error before a violation is flagged, so
/// it scales with the resolution of whatever produced the footprint. Lookups
/// are case-insensitive; an unknown source is an error, never a silent
/// default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToleranceTable {
    by_source: HashMap<String, f64>,
}

impl Default for ToleranceTable {
    fn default() -> Self {
        let mut by_source = HashMap::new();
        by_source.insert("sentinel2".to_string(), 5.0);
        by_source.insert("landsat8".to_string(), 15.0);
        by_source.insert("drone".to_string(), 0.5);
        by_source.insert("survey_gps".to_string(), 0.1);
        Self { by_source }
    }
}

impl ToleranceTable {
    pub fn empty() -> Self {
        Self {
            by_source: HashMap::new(),
        }
    }

    /// Add or replace a source entry.
    pub fn insert(&mut self, source: &str, tolerance_m: f64) -> Result<(), ConfigError> {
        if !tolerance_m.is_finite() || tolerance_m < 0.0 {
            return Err(ConfigError::BadTolerance {
                source_name: source.to_string(),
                value: tolerance_m,
            });
        }
        self.by_source
            .insert(source.to_ascii_lowercase(), tolerance_m);
        Ok(())
    }

    pub fn tolerance_for(&self, source: &str) -> Result<f64, ConfigError> {
        self.by_source
            .get(&source.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| ConfigError::UnknownSource(source.to_string()))
    }

    /// Known sources with their tolerances, sorted by source name.
    pub fn entries(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<_> = self
            .by_source
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

/// Weights of the composite risk formula. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    pub area: f64,
    pub iou: f64,
    pub boundary: f64,
    pub temporal: f64,
    pub vacancy: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            area: 0.25,
            iou: 0.25,
            boundary: 0.20,
            temporal: 0.15,
            vacancy: 0.15,
        }
    }
}

impl RiskWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("area", self.area),
            ("iou", self.iou),
            ("boundary", self.boundary),
            ("temporal", self.temporal),
            ("vacancy", self.vacancy),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::WeightRange { name, value });
            }
        }
        let sum = self.area + self.iou + self.boundary + self.temporal + self.vacancy;
        if (sum - 1.0).abs() > WEIGHT_SUM_EPS {
            return Err(ConfigError::WeightSum(sum));
        }
        Ok(())
    }
}

/// IoU interpretation cut-points.
///
/// The bands are informational (reporting and summaries); they do not drive
/// the tolerance verdict. The source material disagrees on exact cut-points
/// (0.85 vs 0.90 "excellent"), so they are a configurable table with the
/// stricter values as default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IouBands {
    pub excellent: f64,
    pub minor: f64,
    pub significant: f64,
    pub major: f64,
}

impl Default for IouBands {
    fn default() -> Self {
        Self {
            excellent: 0.90,
            minor: 0.75,
            significant: 0.50,
            major: 0.25,
        }
    }
}

impl IouBands {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cuts = [self.excellent, self.minor, self.significant, self.major];
        let descending = cuts.windows(2).all(|w| w[0] > w[1]);
        let in_range = cuts.iter().all(|c| c.is_finite() && *c > 0.0 && *c < 1.0);
        if descending && in_range {
            Ok(())
        } else {
            Err(ConfigError::BadIouBands)
        }
    }

    pub fn classify(&self, iou: f64) -> IouBand {
        if iou >= self.excellent {
            IouBand::Excellent
        } else if iou >= self.minor {
            IouBand::MinorDeviation
        } else if iou >= self.significant {
            IouBand::Significant
        } else if iou >= self.major {
            IouBand::Major
        } else {
            IouBand::Critical
        }
    }
}

/// Compliance calculator tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Encroachments smaller than this are sensor/geometry noise, not a
    /// violation.
    pub noise_floor_sqm: f64,
    pub iou_bands: IouBands,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            noise_floor_sqm: 50.0,
            iou_bands: IouBands::default(),
        }
    }
}

impl CalculatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.noise_floor_sqm.is_finite() || self.noise_floor_sqm < 0.0 {
            return Err(ConfigError::BadNoiseFloor(self.noise_floor_sqm));
        }
        self.iou_bands.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tolerances_match_source_resolutions() {
        let table = ToleranceTable::default();
        assert_eq!(table.tolerance_for("sentinel2").unwrap(), 5.0);
        assert_eq!(table.tolerance_for("landsat8").unwrap(), 15.0);
        assert_eq!(table.tolerance_for("drone").unwrap(), 0.5);
        assert_eq!(table.tolerance_for("survey_gps").unwrap(), 0.1);
    }

    #[test]
    fn tolerance_lookup_is_case_insensitive() {
        let table = ToleranceTable::default();
        assert_eq!(table.tolerance_for("SENTINEL2").unwrap(), 5.0);
    }

    #[test]
    fn unknown_source_is_an_error_not_a_default() {
        let table = ToleranceTable::default();
        let err = table.tolerance_for("modis").unwrap_err();
        assert_eq!(err, ConfigError::UnknownSource("modis".to_string()));
    }

    #[test]
    fn negative_tolerance_rejected() {
        let mut table = ToleranceTable::empty();
        assert!(table.insert("drone", -1.0).is_err());
        assert!(table.insert("drone", f64::NAN).is_err());
        assert!(table.insert("drone", 0.5).is_ok());
    }

    #[test]
    fn default_weights_sum_to_one() {
        assert!(RiskWeights::default().validate().is_ok());
    }

    #[test]
    fn weight_sum_off_by_a_tenth_rejected() {
        let weights = RiskWeights {
            area: 0.15,
            ..RiskWeights::default()
        };
        match weights.validate() {
            Err(ConfigError::WeightSum(sum)) => assert!((sum - 0.9).abs() < 1e-9),
            other => panic!("expected WeightSum error, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_weight_rejected() {
        let weights = RiskWeights {
            area: 1.25,
            iou: -0.25,
            ..RiskWeights::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(ConfigError::WeightRange { name: "area", .. })
        ));
    }

    #[test]
    fn iou_bands_classify_at_cut_points() {
        let bands = IouBands::default();
        assert_eq!(bands.classify(0.95), IouBand::Excellent);
        assert_eq!(bands.classify(0.90), IouBand::Excellent);
        assert_eq!(bands.classify(0.80), IouBand::MinorDeviation);
        assert_eq!(bands.classify(0.60), IouBand::Significant);
        assert_eq!(bands.classify(0.30), IouBand::Major);
        assert_eq!(bands.classify(0.10), IouBand::Critical);
    }

    #[test]
    fn non_descending_bands_rejected() {
        let bands = IouBands {
            excellent: 0.50,
            minor: 0.75,
            ..IouBands::default()
        };
        assert_eq!(bands.validate(), Err(ConfigError::BadIouBands));
    }
}
