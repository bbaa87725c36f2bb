//! # Voice Broadcast - observable playback state
//!
//! Tracks whether a listener is playing a voice broadcast and tells
//! interested parties every time that changes.
//!
//! ```rust
//! use std::sync::Arc;
//! use voice_broadcast::{BroadcastDescriptor, PlaybackState, PlaybackStateHolder};
//!
//! let descriptor = Arc::new(BroadcastDescriptor::new("$info:example.org", "!room:example.org"));
//! let holder = PlaybackStateHolder::new(descriptor);
//!
//! let id = holder.subscribe(|state| println!("now {state}"));
//! holder.toggle();
//! assert_eq!(holder.state(), PlaybackState::Playing);
//!
//! holder.unsubscribe(id);
//! holder.destroy();
//! ```
//!
//! ## Transitions
//!
//! | From              | Operation  | To      |
//! |-------------------|------------|---------|
//! | any               | `start()`  | Playing |
//! | any               | `stop()`   | Stopped |
//! | Stopped           | `toggle()` | Playing |
//! | Playing or Paused | `toggle()` | Stopped |
//!
//! Every operation notifies, including ones that leave the state unchanged,
//! unless `PlaybackConfig::suppress_duplicate_notifications` is set.
//!
//! ## Architecture
//!
//! ```text
//! UI / audio engine
//!     ↓ start / stop / toggle        ↑ subscribe / changes()
//! PlaybackStateHolder (voice-broadcast)
//!     ↓
//! ObserverList + ChangeIterator (state-store)
//! ```

pub mod logging;

mod config;
mod error;
mod model;
mod playback;
mod state;

pub use config::PlaybackConfig;
pub use error::{PlaybackError, Result};
pub use model::{BroadcastDescriptor, BroadcastId};
pub use playback::{PlaybackChanges, PlaybackStateHolder};
pub use state::PlaybackState;

// Re-export the handle types callers need from state-store
pub use state_store::{ChangeEvent, SubscriptionId};
