//! Error types for capture operations.

use thiserror::Error;

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Errors that can occur while capturing design data.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No locate strategy produced a canvas instance.
    #[error("No fabric canvas found (tried: {0})")]
    CanvasNotFound(String),

    /// A selector string could not be parsed.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Configuration values are inconsistent or unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The ready gate was dropped before the designer signalled readiness.
    #[error("Ready gate closed before the designer became ready")]
    GateClosed,

    /// Payload, page or config serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
