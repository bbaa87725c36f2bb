//! Error types for voice-broadcast

use thiserror::Error;

use crate::logging::LoggingError;

/// Result type for voice-broadcast operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Errors surfaced by the voice-broadcast crate
///
/// State transitions themselves never fail; these cover the ambient
/// surfaces around the holder.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Invalid playback configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    #[error("Unknown playback state: {0}")]
    UnknownState(String),
}
