use thiserror::Error;

/// Errors emitted by the enlargement engine.
#[derive(Debug, Error)]
pub enum EnlargeError {
    /// The candidate word list ran dry before the quota was met.
    #[error("ran out of candidate words for {db_id} after {allocated} names; increase the candidate pool")]
    ExhaustedCandidates { db_id: String, allocated: usize },
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error("invalid scale config: {0}")]
    InvalidConfig(String),
    #[error("core error: {0}")]
    Core(#[from] schemascale_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
