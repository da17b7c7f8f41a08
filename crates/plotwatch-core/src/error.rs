use thiserror::Error;

/// Configuration defects.
///
/// These are programming or deployment errors, validated eagerly when the
/// owning component is constructed, and fatal before any evaluation begins.
/// They are never silently defaulted away.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("risk weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    #[error("risk weight {name} out of [0, 1]: {value}")]
    WeightRange { name: &'static str, value: f64 },

    #[error("unknown observation source: {0}")]
    UnknownSource(String),

    #[error("tolerance for {source_name} must be a finite non-negative number, got {value}")]
    BadTolerance { source_name: String, value: f64 },

    #[error("IoU band cut-points must be strictly descending within (0, 1)")]
    BadIouBands,

    #[error("noise floor must be a finite non-negative area, got {0}")]
    BadNoiseFloor(f64),
}
