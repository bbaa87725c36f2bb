//! Change events for observed values
//!
//! A `ChangeEvent` carries the identity of the thing that changed together
//! with the value it changed to, so consumers on other threads never have to
//! read back from the source.

use std::time::Instant;

/// A change event emitted when an observed value transitions
///
/// # Example
///
/// ```rust,ignore
/// for event in holder.changes() {
///     println!("{} is now {:?}", event.entity_id, event.value);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ChangeEvent<Id, T> {
    /// The entity whose value changed
    pub entity_id: Id,

    /// The value after the transition
    pub value: T,

    /// When the change was delivered
    pub timestamp: Instant,
}

impl<Id, T> ChangeEvent<Id, T> {
    /// Create a new change event stamped with the current instant
    pub fn new(entity_id: Id, value: T) -> Self {
        Self {
            entity_id,
            value,
            timestamp: Instant::now(),
        }
    }

    /// Create a new change event with a specific timestamp
    pub fn with_timestamp(entity_id: Id, value: T, timestamp: Instant) -> Self {
        Self {
            entity_id,
            value,
            timestamp,
        }
    }
}

impl<Id: PartialEq, T: PartialEq> PartialEq for ChangeEvent<Id, T> {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp not included in equality
        self.entity_id == other.entity_id && self.value == other.value
    }
}
