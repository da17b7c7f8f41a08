pub mod config;
pub mod error;
pub mod geometry;
pub mod plot;
pub mod result;

pub use config::{CalculatorConfig, IouBands, RiskWeights, ToleranceTable};
pub use error::ConfigError;
pub use geometry::{GeoShape, Position, RingGeometry};
pub use plot::{AllotmentBoundary, BoundaryOrigin, DetectedFootprint, FootprintClass, PlotContext};
pub use result::{
    ComplianceCategory, ComplianceResult, EvalFailure, IouBand, PlotReport, RegionSummary,
    Severity, Verdict, ViolationKind,
};
