use thiserror::Error;

/// Errors emitted while building or writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("core error: {0}")]
    Core(#[from] schemascale_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
