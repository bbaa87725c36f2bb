//! Room, event and content types used by the pinning rules

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate common ID type implementations
macro_rules! impl_id_type {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name::new(s)
            }
        }
    };
}

/// Room identifier, e.g. `!room:example.org`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl_id_type!(RoomId);

/// Event identifier, e.g. `$eventId`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl_id_type!(EventId);

/// Account data type under which read pins are stored
pub const READ_PINS_EVENT_TYPE: &str = "im.vector.room.read_pins";

/// Room event types the pinning rules care about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    RoomMessage,
    Sticker,
    PollStart,
    /// Pre-stable name of the poll start event
    UnstablePollStart,
    RoomCreate,
    RoomPinnedEvents,
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::RoomMessage => "m.room.message",
            EventType::Sticker => "m.sticker",
            EventType::PollStart => "m.poll.start",
            EventType::UnstablePollStart => "org.matrix.msc3381.poll.start",
            EventType::RoomCreate => "m.room.create",
            EventType::RoomPinnedEvents => "m.room.pinned_events",
            EventType::Other(other) => other,
        }
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s {
            "m.room.message" => EventType::RoomMessage,
            "m.sticker" => EventType::Sticker,
            "m.poll.start" => EventType::PollStart,
            "org.matrix.msc3381.poll.start" => EventType::UnstablePollStart,
            "m.room.create" => EventType::RoomCreate,
            "m.room.pinned_events" => EventType::RoomPinnedEvents,
            other => EventType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of a room event that decide whether it can be pinned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnableEvent {
    /// Missing for local echoes that have not been sent yet
    pub event_id: Option<EventId>,
    pub room_id: RoomId,
    pub event_type: EventType,
    pub redacted: bool,
    /// Whether the event's content can be acted on (not a decryption failure, not empty)
    pub content_actionable: bool,
}

impl PinnableEvent {
    /// A sent, unredacted, actionable event
    pub fn new(event_id: impl Into<EventId>, room_id: impl Into<RoomId>, event_type: EventType) -> Self {
        Self {
            event_id: Some(event_id.into()),
            room_id: room_id.into(),
            event_type,
            redacted: false,
            content_actionable: true,
        }
    }

    pub fn without_event_id(mut self) -> Self {
        self.event_id = None;
        self
    }

    pub fn redacted(mut self) -> Self {
        self.redacted = true;
        self
    }

    pub fn with_content_actionable(mut self, actionable: bool) -> Self {
        self.content_actionable = actionable;
        self
    }
}

/// Content of the `m.room.pinned_events` state event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedEventsContent {
    #[serde(default)]
    pub pinned: Vec<EventId>,
}

/// Content of the read pins account data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadPinsContent {
    #[serde(default)]
    pub event_ids: Vec<EventId>,
}
