//! Error types for the palette engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, FlashbackError>;

#[derive(Debug, Error)]
pub enum FlashbackError {
    /// A browser capability call failed
    #[error("Browser error: {0}")]
    Browser(String),

    /// The capability is not available from this browser backend
    #[error("Unsupported: {0}")]
    Unsupported(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FlashbackError {
    pub fn browser(msg: impl std::fmt::Display) -> Self {
        FlashbackError::Browser(msg.to_string())
    }
}
