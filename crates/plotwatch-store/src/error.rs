use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("region file not found: {0}")]
    FileNotFound(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
