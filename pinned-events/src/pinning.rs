//! Pin and unpin rules
//!
//! Predicates decide what the UI may offer; `pin_or_unpin_event` and
//! `unpin_all` compute the new pinned list and hand it to a `PinSink`.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::model::{EventType, PinnableEvent, PinnedEventsContent, ReadPinsContent, RoomId};
use crate::room::{PinSink, RoomDirectory, RoomView};
use crate::{PinError, Result};

/// Event types that can be pinned
pub const PINNABLE_EVENT_TYPES: [EventType; 4] = [
    EventType::RoomMessage,
    EventType::PollStart,
    EventType::UnstablePollStart,
    EventType::Sticker,
];

/// Client-side switches that gate pinning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinningSettings {
    /// The pinning feature flag
    pub feature_enabled: bool,
    /// Guests never write read pins
    pub is_guest: bool,
}

impl Default for PinningSettings {
    fn default() -> Self {
        Self {
            feature_enabled: true,
            is_guest: false,
        }
    }
}

/// What `pin_or_unpin_event` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    Pinned,
    Unpinned,
    /// The room is unknown or the event has no id yet
    Skipped,
}

/// Whether the event type can be pinned and the event is not redacted
pub fn is_pinnable(event: &PinnableEvent) -> bool {
    !event.redacted && PINNABLE_EVENT_TYPES.contains(&event.event_type)
}

/// Whether a pinned event can be unpinned
///
/// Redacted events stay unpinnable so they can be cleaned out of the list.
pub fn is_unpinnable(event: &PinnableEvent) -> bool {
    event.redacted || is_pinnable(event)
}

/// Whether the event is in its room's pinned list
pub fn is_pinned<D: RoomDirectory>(directory: &D, event: &PinnableEvent) -> bool {
    let Some(room) = directory.room(&event.room_id) else {
        return false;
    };
    let Some(event_id) = event.event_id.as_ref() else {
        return false;
    };

    room.pinned_event_ids().contains(event_id)
}

/// Whether the pin/unpin action should be offered for this event
pub fn can_pin_or_unpin<D: RoomDirectory>(
    settings: &PinningSettings,
    directory: &D,
    event: &PinnableEvent,
) -> bool {
    if !settings.feature_enabled || !event.content_actionable {
        return false;
    }

    let Some(room) = directory.room(&event.room_id) else {
        return false;
    };

    room.may_send_state_event(&EventType::RoomPinnedEvents) && is_pinnable(event)
}

/// Pin the event if it is not pinned, otherwise unpin it
///
/// Pinning also marks the event as read in the read pins account data, so
/// the user's own pin does not show up as unread. Both writes are attempted
/// even if the account data write fails; the first error is returned.
pub fn pin_or_unpin_event<D, S>(directory: &D, sink: &mut S, event: &PinnableEvent) -> Result<PinOutcome>
where
    D: RoomDirectory,
    S: PinSink,
{
    let Some(room) = directory.room(&event.room_id) else {
        trace!(room = %event.room_id, "Room unknown, nothing to pin");
        return Ok(PinOutcome::Skipped);
    };
    let Some(event_id) = event.event_id.as_ref() else {
        trace!(room = %event.room_id, "Event has no id yet, nothing to pin");
        return Ok(PinOutcome::Skipped);
    };

    let mut pinned = room.pinned_event_ids();

    if pinned.contains(event_id) {
        // The pinned list may hold the same id more than once
        pinned.retain(|id| id != event_id);
        debug!(room = %event.room_id, event = %event_id, remaining = pinned.len(), "Unpinning event");
        sink.send_pinned_events(&event.room_id, PinnedEventsContent { pinned })?;
        return Ok(PinOutcome::Unpinned);
    }

    pinned.push(event_id.clone());

    let mut read = room.read_pins();
    read.push(event_id.clone());

    debug!(room = %event.room_id, event = %event_id, total = pinned.len(), "Pinning event");
    let read_result = sink.set_read_pins(&event.room_id, ReadPinsContent { event_ids: read });
    sink.send_pinned_events(&event.room_id, PinnedEventsContent { pinned })?;
    read_result?;

    Ok(PinOutcome::Pinned)
}

/// Clear every pinned event in the room
pub fn unpin_all<D, S>(directory: &D, sink: &mut S, room_id: &RoomId) -> Result<()>
where
    D: RoomDirectory,
    S: PinSink,
{
    let room = directory
        .room(room_id)
        .ok_or_else(|| PinError::RoomNotFound(room_id.clone()))?;

    if !room.may_send_state_event(&EventType::RoomPinnedEvents) {
        return Err(PinError::Forbidden(room_id.clone()));
    }

    debug!(room = %room_id, "Unpinning all events");
    sink.send_pinned_events(room_id, PinnedEventsContent::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn event(event_type: EventType) -> PinnableEvent {
        PinnableEvent::new("$eventId", "!room:example.org", event_type)
    }

    #[rstest]
    #[case(EventType::RoomMessage)]
    #[case(EventType::PollStart)]
    #[case(EventType::UnstablePollStart)]
    #[case(EventType::Sticker)]
    fn test_pinnable_types(#[case] event_type: EventType) {
        let event = event(event_type);
        assert!(is_pinnable(&event));
        assert!(is_unpinnable(&event));
    }

    #[rstest]
    #[case(EventType::RoomCreate)]
    #[case(EventType::RoomPinnedEvents)]
    #[case(EventType::Other("m.room.topic".to_string()))]
    fn test_non_pinnable_types(#[case] event_type: EventType) {
        let event = event(event_type);
        assert!(!is_pinnable(&event));
        assert!(!is_unpinnable(&event));
    }

    #[test]
    fn test_redacted_event_is_unpinnable_but_not_pinnable() {
        let event = event(EventType::RoomMessage).redacted();
        assert!(!is_pinnable(&event));
        assert!(is_unpinnable(&event));
    }

    #[test]
    fn test_redacted_non_pinnable_type_is_still_unpinnable() {
        let event = event(EventType::RoomCreate).redacted();
        assert!(is_unpinnable(&event));
    }

    #[test]
    fn test_settings_default_enables_feature() {
        let settings = PinningSettings::default();
        assert!(settings.feature_enabled);
        assert!(!settings.is_guest);
    }
}
