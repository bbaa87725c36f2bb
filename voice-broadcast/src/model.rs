//! Identity types for broadcasts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate common ID type implementations
macro_rules! impl_id_type {
    ($name:ident) => {
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

/// Identifier of a broadcast
///
/// This is the id of the event that announced the broadcast (its "info
/// event"), e.g. `$143273582443PhrSn:example.org`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BroadcastId(String);

impl BroadcastId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_id_type!(BroadcastId);

/// Opaque handle for the broadcast being played
///
/// The playback holder only reads it; callers share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BroadcastDescriptor {
    id: BroadcastId,
    room_id: String,
}

impl BroadcastDescriptor {
    pub fn new(id: impl Into<BroadcastId>, room_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            room_id: room_id.into(),
        }
    }

    /// Id of the broadcast's info event
    pub fn id(&self) -> &BroadcastId {
        &self.id
    }

    /// Room the broadcast was started in
    pub fn room_id(&self) -> &str {
        &self.room_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_id_conversions() {
        let from_str: BroadcastId = "$info:example.org".into();
        let from_string: BroadcastId = String::from("$info:example.org").into();

        assert_eq!(from_str, from_string);
        assert_eq!(from_str.as_str(), "$info:example.org");
        assert_eq!(from_str.to_string(), "$info:example.org");
    }

    #[test]
    fn test_descriptor_accessors() {
        let descriptor = BroadcastDescriptor::new("$info:example.org", "!room:example.org");

        assert_eq!(descriptor.id().as_str(), "$info:example.org");
        assert_eq!(descriptor.room_id(), "!room:example.org");
    }

    #[test]
    fn test_descriptor_serde_shape() {
        let descriptor = BroadcastDescriptor::new("$info:example.org", "!room:example.org");
        let json = serde_json::to_value(&descriptor).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "id": "$info:example.org", "room_id": "!room:example.org" })
        );
    }
}
