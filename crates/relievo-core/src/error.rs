/// Core error types for the Relievo engine.
use std::path::PathBuf;

/// A specialized Result type for Relievo operations.
pub type RelievoResult<T> = Result<T, RelievoError>;

/// Top-level error type encompassing all Relievo subsystems.
#[derive(Debug, thiserror::Error)]
pub enum RelievoError {
    #[error("probe error: {0}")]
    Probe(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("preview error: {0}")]
    Preview(String),

    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    #[error("asset error: {message} ({path:?})")]
    Asset { message: String, path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl RelievoError {
    /// Create an asset error.
    pub fn asset(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        RelievoError::Asset {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create an invalid-frame error.
    pub fn invalid_frame(message: impl Into<String>) -> Self {
        RelievoError::InvalidFrame(message.into())
    }
}
