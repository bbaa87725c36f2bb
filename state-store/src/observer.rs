//! Ordered observer registration and synchronous delivery
//!
//! `ObserverList` keeps callbacks in registration order and hands out a
//! `SubscriptionId` for each one. Delivery works on a snapshot of the list so
//! observers can register or remove observers while being notified; such
//! changes take effect from the next round.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Handle returned by `ObserverList::subscribe`, used for later removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// An id that never matches a registration
    ///
    /// Handed out when a subscription is refused, so callers always get a
    /// handle they can pass back to `unsubscribe`.
    pub const INERT: SubscriptionId = SubscriptionId(0);

    /// Raw numeric value of the id
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Whether this id was refused at subscription time
    pub fn is_inert(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A registered callback
pub type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// How a panicking observer affects the rest of a delivery round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanicPolicy {
    /// Catch the panic, log it and keep notifying the remaining observers
    Isolate,
    /// Let the panic unwind into the caller; later observers are skipped
    Propagate,
}

/// Outcome of one delivery round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    /// Observers that returned normally
    pub delivered: usize,
    /// Observers that panicked (only counted under `PanicPolicy::Isolate`)
    pub panicked: usize,
}

/// Observers kept in registration order
pub struct ObserverList<T> {
    entries: Vec<(SubscriptionId, Observer<T>)>,
    next_id: u64,
}

impl<T> ObserverList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            // 0 is reserved for SubscriptionId::INERT
            next_id: 1,
        }
    }

    /// Register a callback, returning its handle
    ///
    /// Registering the same closure twice yields two independent entries
    /// that both fire.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Arc::new(observer)));
        id
    }

    /// Remove a callback, handing it back if it was registered
    ///
    /// The callback is returned rather than dropped so a caller holding a
    /// borrow of the list can release it first; dropping a callback may run
    /// arbitrary `Drop` code.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Option<Observer<T>> {
        let index = self.entries.iter().position(|(entry_id, _)| *entry_id == id)?;
        Some(self.entries.remove(index).1)
    }

    /// Check whether a handle is still registered
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    /// Remove every callback, handing the entries back in registration order
    pub fn clear(&mut self) -> Vec<(SubscriptionId, Observer<T>)> {
        std::mem::take(&mut self.entries)
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no callbacks are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cheap copy of the current callbacks, in registration order
    pub fn snapshot(&self) -> Vec<Observer<T>> {
        self.entries
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }
}

impl<T> Default for ObserverList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObserverList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("observer_count", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

/// Call every observer with `value`, in order
pub fn deliver<T>(observers: &[Observer<T>], value: &T, policy: PanicPolicy) -> Delivery {
    let mut outcome = Delivery::default();

    for observer in observers {
        match policy {
            PanicPolicy::Propagate => {
                observer(value);
                outcome.delivered += 1;
            }
            PanicPolicy::Isolate => match panic::catch_unwind(AssertUnwindSafe(|| observer(value))) {
                Ok(()) => outcome.delivered += 1,
                Err(payload) => {
                    outcome.panicked += 1;
                    tracing::warn!(
                        "Observer panicked during delivery, continuing: {}",
                        panic_message(payload.as_ref())
                    );
                }
            },
        }
    }

    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}
