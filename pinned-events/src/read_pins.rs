//! Read pins bookkeeping and the pinned-list view model
//!
//! When the pinned list is shown, any pinned id the user has not seen yet
//! marks the list as read by writing the full current pinned list to the
//! read pins account data. That also drops ids that are no longer pinned.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::model::{EventId, EventType, ReadPinsContent, RoomId};
use crate::pinning::PinningSettings;
use crate::room::{PinSink, RoomDirectory, RoomView};
use crate::{PinError, Result};

/// Pinned ids missing from the read set, in pinned order
pub fn newly_read(pinned: &[EventId], read: &[EventId]) -> Vec<EventId> {
    let read: HashSet<&EventId> = read.iter().collect();
    pinned
        .iter()
        .filter(|id| !read.contains(id))
        .cloned()
        .collect()
}

/// Keeps a room's read pins in step with its pinned list
#[derive(Debug, Clone, Default)]
pub struct ReadPinsTracker {
    settings: PinningSettings,
}

impl ReadPinsTracker {
    pub fn new(settings: PinningSettings) -> Self {
        Self { settings }
    }

    /// Mark the room's pinned events as read if any are unread
    ///
    /// Returns whether account data was written. Guests never write.
    pub fn sync<D, S>(&self, directory: &D, sink: &mut S, room_id: &RoomId) -> Result<bool>
    where
        D: RoomDirectory,
        S: PinSink,
    {
        if self.settings.is_guest {
            trace!(room = %room_id, "Guest session, read pins not tracked");
            return Ok(false);
        }

        let room = directory
            .room(room_id)
            .ok_or_else(|| PinError::RoomNotFound(room_id.clone()))?;

        let pinned = room.pinned_event_ids();
        let unread = newly_read(&pinned, &room.read_pins());
        if unread.is_empty() {
            return Ok(false);
        }

        debug!(room = %room_id, unread = unread.len(), "Marking pinned events as read");
        sink.set_read_pins(room_id, ReadPinsContent { event_ids: pinned })?;
        Ok(true)
    }
}

/// What the pinned messages list should show for a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedPanel {
    /// Most recently pinned first
    pub event_ids: Vec<EventId>,
    /// Whether the "unpin all" action is offered
    pub can_unpin_all: bool,
}

impl PinnedPanel {
    pub fn from_room<R: RoomView>(room: &R) -> Self {
        let mut event_ids = room.pinned_event_ids();
        event_ids.reverse();

        Self {
            event_ids,
            can_unpin_all: room.may_send_state_event(&EventType::RoomPinnedEvents),
        }
    }

    /// Number of pinned events, as shown in the header
    pub fn count(&self) -> usize {
        self.event_ids.len()
    }

    /// Whether the empty state should be shown instead of a list
    pub fn is_empty(&self) -> bool {
        self.event_ids.is_empty()
    }
}
