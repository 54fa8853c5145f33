use thiserror::Error;

/// Core error type shared across schemascale crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema violates structural invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by schemascale crates.
pub type Result<T> = std::result::Result<T, Error>;
