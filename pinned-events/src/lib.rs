//! # Pinned Events
//!
//! Rules for pinning room events and keeping track of which pins a user has
//! seen. The hosting client supplies room state through [`RoomDirectory`]
//! and performs writes through [`PinSink`]; this crate does no I/O.
//!
//! ```rust,ignore
//! use pinned_events::{can_pin_or_unpin, pin_or_unpin_event, PinningSettings};
//!
//! if can_pin_or_unpin(&PinningSettings::default(), &client, &event) {
//!     pin_or_unpin_event(&client, &mut client_sink, &event)?;
//! }
//! ```

mod error;
mod model;
mod pinning;
mod read_pins;
mod room;

pub use error::{PinError, Result};
pub use model::{
    EventId, EventType, PinnableEvent, PinnedEventsContent, ReadPinsContent, RoomId,
    READ_PINS_EVENT_TYPE,
};
pub use pinning::{
    can_pin_or_unpin, is_pinnable, is_pinned, is_unpinnable, pin_or_unpin_event, unpin_all,
    PinOutcome, PinningSettings, PINNABLE_EVENT_TYPES,
};
pub use read_pins::{newly_read, PinnedPanel, ReadPinsTracker};
pub use room::{PinSink, RoomDirectory, RoomView};
