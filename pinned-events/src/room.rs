//! Collaborator traits implemented by the hosting client
//!
//! The pinning rules never talk to a server themselves. Room state and
//! permissions are read through `RoomDirectory`/`RoomView`, and every write
//! goes through `PinSink`.

use crate::model::{EventId, EventType, PinnedEventsContent, ReadPinsContent, RoomId};
use crate::Result;

/// Read access to a room's current state
pub trait RoomView {
    /// Ids listed in the room's `m.room.pinned_events` state, oldest first
    ///
    /// Empty when the room has no pinned events state.
    fn pinned_event_ids(&self) -> Vec<EventId>;

    /// Whether the local user may send a state event of this type
    fn may_send_state_event(&self, event_type: &EventType) -> bool;

    /// Ids recorded in the user's read pins account data
    fn read_pins(&self) -> Vec<EventId>;
}

/// Looks up rooms known to the client
pub trait RoomDirectory {
    type Room: RoomView;

    fn room(&self, room_id: &RoomId) -> Option<&Self::Room>;
}

/// Destination for pinning writes
pub trait PinSink {
    /// Replace the room's `m.room.pinned_events` state
    fn send_pinned_events(&mut self, room_id: &RoomId, content: PinnedEventsContent) -> Result<()>;

    /// Replace the user's read pins account data for the room
    fn set_read_pins(&mut self, room_id: &RoomId, content: ReadPinsContent) -> Result<()>;
}
