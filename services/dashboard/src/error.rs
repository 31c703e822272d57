//! Error types for the fleetwatch service

/// Errors that can occur in the fleetwatch service
#[derive(Debug, thiserror::Error)]
pub enum FleetwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for fleetwatch operations
pub type Result<T> = std::result::Result<T, FleetwatchError>;
