//! Error types for pinned-events

use thiserror::Error;

use crate::model::RoomId;

/// Result type for pinned-events operations
pub type Result<T> = std::result::Result<T, PinError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PinError {
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("Not allowed to change pinned events in {0}")]
    Forbidden(RoomId),

    /// Raised by `PinSink` implementations when a write fails
    #[error("Failed to send update for {room_id}: {reason}")]
    SendFailed { room_id: RoomId, reason: String },
}
