//! Observable State Building Blocks
//!
//! Small, dependency-light primitives for components that own a value and
//! tell interested parties when it changes.
//!
//! # Features
//!
//! - **Ordered Observers**: Callbacks fire in registration order
//! - **Subscription Handles**: Every registration returns a `SubscriptionId`
//! - **Panic Isolation**: One failing observer cannot starve the others
//! - **Blocking Iteration**: Consume change events from another thread
//!
//! # Quick Start
//!
//! ```rust
//! use state_store::{deliver, ObserverList, PanicPolicy};
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let mut observers = ObserverList::<u8>::new();
//!
//! let sink = Arc::clone(&seen);
//! let id = observers.subscribe(move |value: &u8| sink.lock().unwrap().push(*value));
//!
//! deliver(&observers.snapshot(), &1, PanicPolicy::Isolate);
//! observers.unsubscribe(id);
//! deliver(&observers.snapshot(), &2, PanicPolicy::Isolate);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ObserverList<T>
//!     │
//!     ├── entries: Vec<(SubscriptionId, Arc<dyn Fn(&T)>)>
//!     │
//!     └── snapshot() ──► deliver(observers, value, PanicPolicy)
//!
//! ChangeIterator<Id, T>
//!     │
//!     └── mpsc::Receiver<ChangeEvent<Id, T>>  (+ detach hook on drop)
//! ```

// Modules
pub mod event;
pub mod iter;
pub mod observer;

// Re-exports - Public API
pub use event::ChangeEvent;
pub use iter::{ChangeIterator, TimeoutIter, TryIter};
pub use observer::{deliver, Delivery, Observer, ObserverList, PanicPolicy, SubscriptionId};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::event::ChangeEvent;
    pub use crate::iter::ChangeIterator;
    pub use crate::observer::{deliver, ObserverList, PanicPolicy, SubscriptionId};
}
