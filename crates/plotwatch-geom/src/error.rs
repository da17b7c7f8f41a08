use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeomError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("projection failed: {0}")]
    Projection(String),
}
