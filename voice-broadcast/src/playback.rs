//! Observable playback state for a single broadcast
//!
//! `PlaybackStateHolder` owns the current `PlaybackState` and an ordered list
//! of observers. Every `start`, `stop` and `toggle` notifies each observer
//! synchronously, in registration order, before returning.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use voice_broadcast::{BroadcastDescriptor, PlaybackState, PlaybackStateHolder};
//!
//! let descriptor = Arc::new(BroadcastDescriptor::new("$info:example.org", "!room:example.org"));
//! let holder = PlaybackStateHolder::new(descriptor);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! holder.subscribe(move |state| sink.lock().unwrap().push(state));
//!
//! holder.toggle();
//! holder.toggle();
//! holder.start();
//! holder.start();
//!
//! assert_eq!(
//!     *seen.lock().unwrap(),
//!     vec![
//!         PlaybackState::Playing,
//!         PlaybackState::Stopped,
//!         PlaybackState::Playing,
//!         PlaybackState::Playing,
//!     ]
//! );
//! ```
//!
//! # Retirement
//!
//! After `destroy()` every operation is a silent no-op: the state is frozen,
//! nothing is emitted, `subscribe` hands back `SubscriptionId::INERT` and
//! `unsubscribe` returns `false`.
//!
//! # Threading
//!
//! All operations, including observer delivery, run under one re-entrant
//! lock. Observers may call back into the holder on the same thread;
//! registrations made during a delivery round apply from the next round.

use std::cell::RefCell;
use std::fmt;
use std::sync::{mpsc, Arc};

use parking_lot::ReentrantMutex;
use state_store::{deliver, ChangeEvent, ChangeIterator, ObserverList, PanicPolicy, SubscriptionId};
use tracing::{debug, trace, warn};

use crate::config::PlaybackConfig;
use crate::model::{BroadcastDescriptor, BroadcastId};
use crate::state::PlaybackState;

/// Blocking stream of state changes for one broadcast
pub type PlaybackChanges = ChangeIterator<BroadcastId, PlaybackState>;

struct Inner {
    state: PlaybackState,
    observers: ObserverList<PlaybackState>,
    destroyed: bool,
}

type Shared = ReentrantMutex<RefCell<Inner>>;

/// Holds the playback state of one broadcast and notifies observers
pub struct PlaybackStateHolder {
    descriptor: Arc<BroadcastDescriptor>,
    config: PlaybackConfig,
    shared: Arc<Shared>,
}

impl PlaybackStateHolder {
    /// Create a holder in the `Stopped` state with the default configuration
    pub fn new(descriptor: Arc<BroadcastDescriptor>) -> Self {
        Self::with_config(descriptor, PlaybackConfig::default())
    }

    /// Create a holder in the `Stopped` state
    pub fn with_config(descriptor: Arc<BroadcastDescriptor>, config: PlaybackConfig) -> Self {
        trace!(broadcast = %descriptor.id(), ?config, "Creating playback state holder");

        Self {
            descriptor,
            config,
            shared: Arc::new(ReentrantMutex::new(RefCell::new(Inner {
                state: PlaybackState::Stopped,
                observers: ObserverList::new(),
                destroyed: false,
            }))),
        }
    }

    /// Switch to `Playing`, notifying even if already playing
    pub fn start(&self) {
        self.apply("start", |_| PlaybackState::Playing);
    }

    /// Switch to `Stopped`, notifying even if already stopped
    pub fn stop(&self) {
        self.apply("stop", |_| PlaybackState::Stopped);
    }

    /// Start when stopped, otherwise stop
    pub fn toggle(&self) {
        self.apply("toggle", PlaybackState::toggled);
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        let guard = self.shared.lock();
        let state = guard.borrow().state;
        state
    }

    /// The broadcast this holder tracks
    pub fn descriptor(&self) -> &Arc<BroadcastDescriptor> {
        &self.descriptor
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Register an observer for every future transition
    ///
    /// Each call registers independently, so the same closure subscribed
    /// twice is called twice per transition.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(PlaybackState) + Send + Sync + 'static,
    {
        let guard = self.shared.lock();
        let mut inner = guard.borrow_mut();

        if inner.destroyed {
            debug!(broadcast = %self.descriptor.id(), "Ignoring subscribe on destroyed holder");
            return SubscriptionId::INERT;
        }

        let id = inner
            .observers
            .subscribe(move |state: &PlaybackState| observer(*state));
        trace!(broadcast = %self.descriptor.id(), subscription = %id, "Observer subscribed");
        id
    }

    /// Remove one observer, returning whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let guard = self.shared.lock();
        let mut inner = guard.borrow_mut();

        if inner.destroyed {
            debug!(broadcast = %self.descriptor.id(), subscription = %id, "Ignoring unsubscribe on destroyed holder");
            return false;
        }

        let removed = inner.observers.unsubscribe(id);
        drop(inner);

        let registered = removed.is_some();
        trace!(broadcast = %self.descriptor.id(), subscription = %id, registered, "Observer unsubscribed");

        // Dropped outside the borrow: the observer may own a `changes()`
        // iterator whose detach hook re-enters this holder
        drop(removed);
        registered
    }

    /// Release every observer and retire the holder
    ///
    /// Idempotent. Any `changes()` iterators end once drained.
    pub fn destroy(&self) {
        let guard = self.shared.lock();
        let mut inner = guard.borrow_mut();

        if inner.destroyed {
            return;
        }

        inner.destroyed = true;
        let released = inner.observers.clear();
        drop(inner);

        debug!(broadcast = %self.descriptor.id(), released = released.len(), "Playback state holder destroyed");
        drop(released);
    }

    pub fn is_destroyed(&self) -> bool {
        let guard = self.shared.lock();
        let destroyed = guard.borrow().destroyed;
        destroyed
    }

    /// Number of registered observers, including `changes()` feeds
    pub fn observer_count(&self) -> usize {
        let guard = self.shared.lock();
        let count = guard.borrow().observers.len();
        count
    }

    /// Blocking iterator over future state changes
    ///
    /// Backed by an observer that forwards into a channel, so the iterator
    /// can be consumed from another thread. Dropping the iterator removes
    /// that observer. On a destroyed holder the iterator is already closed.
    pub fn changes(&self) -> PlaybackChanges {
        let (tx, rx) = mpsc::channel();
        let broadcast_id = self.descriptor.id().clone();

        let id = self.subscribe(move |state| {
            // Receiver gone means the iterator is being dropped
            let _ = tx.send(ChangeEvent::new(broadcast_id.clone(), state));
        });

        let shared = Arc::downgrade(&self.shared);
        ChangeIterator::with_detach(rx, move || {
            if let Some(shared) = shared.upgrade() {
                let guard = shared.lock();
                let removed = guard.borrow_mut().observers.unsubscribe(id);
                drop(removed);
            }
        })
    }

    /// Run one transition and notify observers while holding the lock
    fn apply(&self, operation: &'static str, next: impl FnOnce(PlaybackState) -> PlaybackState) {
        let guard = self.shared.lock();

        let (previous, current, observers) = {
            let mut inner = guard.borrow_mut();

            if inner.destroyed {
                debug!(broadcast = %self.descriptor.id(), operation, "Ignoring operation on destroyed holder");
                return;
            }

            let previous = inner.state;
            inner.state = next(previous);
            (previous, inner.state, inner.observers.snapshot())
        };

        if previous == current && self.config.suppress_duplicate_notifications {
            trace!(broadcast = %self.descriptor.id(), operation, state = %current, "State unchanged, notification suppressed");
            return;
        }

        debug!(
            broadcast = %self.descriptor.id(),
            operation,
            from = %previous,
            to = %current,
            observers = observers.len(),
            "Playback state transition"
        );

        let policy = if self.config.isolate_observer_panics {
            PanicPolicy::Isolate
        } else {
            PanicPolicy::Propagate
        };

        let outcome = deliver(&observers, &current, policy);
        if outcome.panicked > 0 {
            warn!(
                broadcast = %self.descriptor.id(),
                operation,
                panicked = outcome.panicked,
                delivered = outcome.delivered,
                "Some observers panicked while handling a playback state change"
            );
        }
    }
}

impl fmt::Debug for PlaybackStateHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackStateHolder")
            .field("broadcast", self.descriptor.id())
            .field("state", &self.state())
            .field("observer_count", &self.observer_count())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn create_test_holder() -> PlaybackStateHolder {
        PlaybackStateHolder::new(Arc::new(BroadcastDescriptor::new(
            "$info:example.org",
            "!room:example.org",
        )))
    }

    fn record(holder: &PlaybackStateHolder) -> (SubscriptionId, Arc<Mutex<Vec<PlaybackState>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = holder.subscribe(move |state| sink.lock().unwrap().push(state));
        (id, seen)
    }

    #[test]
    fn test_initial_state_is_stopped() {
        let holder = create_test_holder();
        assert_eq!(holder.state(), PlaybackState::Stopped);
        assert_eq!(holder.observer_count(), 0);
        assert!(!holder.is_destroyed());
    }

    #[test]
    fn test_documented_sequence() {
        let holder = create_test_holder();
        let (_, seen) = record(&holder);

        holder.toggle();
        assert_eq!(holder.state(), PlaybackState::Playing);
        holder.toggle();
        assert_eq!(holder.state(), PlaybackState::Stopped);
        holder.start();
        holder.start();
        assert_eq!(holder.state(), PlaybackState::Playing);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                PlaybackState::Playing,
                PlaybackState::Stopped,
                PlaybackState::Playing,
                PlaybackState::Playing,
            ]
        );
    }

    #[test]
    fn test_stop_when_stopped_still_notifies() {
        let holder = create_test_holder();
        let (_, seen) = record(&holder);

        holder.stop();
        holder.stop();

        assert_eq!(*seen.lock().unwrap(), vec![PlaybackState::Stopped; 2]);
    }

    #[test]
    fn test_toggle_from_paused_stops() {
        let holder = create_test_holder();
        let (_, seen) = record(&holder);

        // Paused is only reachable from outside the public operations
        holder.shared.lock().borrow_mut().state = PlaybackState::Paused;
        holder.toggle();

        assert_eq!(holder.state(), PlaybackState::Stopped);
        assert_eq!(*seen.lock().unwrap(), vec![PlaybackState::Stopped]);
    }

    #[test]
    fn test_suppress_duplicates_when_configured() {
        let holder = PlaybackStateHolder::with_config(
            Arc::new(BroadcastDescriptor::new("$info", "!room")),
            PlaybackConfig::default().with_suppress_duplicate_notifications(true),
        );
        let (_, seen) = record(&holder);

        holder.stop();
        holder.start();
        holder.start();
        holder.toggle();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![PlaybackState::Playing, PlaybackState::Stopped]
        );
    }

    #[test]
    fn test_unsubscribe_only_affects_that_observer() {
        let holder = create_test_holder();
        let (first, first_seen) = record(&holder);
        let (_, second_seen) = record(&holder);

        holder.start();
        assert!(holder.unsubscribe(first));
        assert!(!holder.unsubscribe(first));
        holder.stop();

        assert_eq!(*first_seen.lock().unwrap(), vec![PlaybackState::Playing]);
        assert_eq!(
            *second_seen.lock().unwrap(),
            vec![PlaybackState::Playing, PlaybackState::Stopped]
        );
    }

    #[test]
    fn test_destroy_is_terminal_no_op() {
        let holder = create_test_holder();
        let (id, seen) = record(&holder);

        holder.start();
        holder.destroy();
        holder.destroy();

        holder.stop();
        holder.toggle();
        let late = holder.subscribe(|_| panic!("must never be called"));
        holder.start();

        assert!(holder.is_destroyed());
        assert_eq!(holder.state(), PlaybackState::Playing);
        assert_eq!(holder.observer_count(), 0);
        assert!(late.is_inert());
        assert!(!holder.unsubscribe(id));
        assert_eq!(*seen.lock().unwrap(), vec![PlaybackState::Playing]);
    }

    #[test]
    fn test_panicking_observer_is_isolated() {
        let holder = create_test_holder();
        holder.subscribe(|_| panic!("observer failure"));
        let (_, seen) = record(&holder);

        holder.start();

        assert_eq!(holder.state(), PlaybackState::Playing);
        assert_eq!(*seen.lock().unwrap(), vec![PlaybackState::Playing]);
    }

    #[test]
    fn test_panicking_observer_propagates_when_configured() {
        let holder = PlaybackStateHolder::with_config(
            Arc::new(BroadcastDescriptor::new("$info", "!room")),
            PlaybackConfig::default().with_isolate_observer_panics(false),
        );
        holder.subscribe(|_| panic!("observer failure"));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| holder.start()));

        assert!(result.is_err());
        // The transition happened before delivery and the lock was released
        assert_eq!(holder.state(), PlaybackState::Playing);
        holder.stop();
        assert_eq!(holder.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_observer_can_reenter_holder() {
        let holder = Arc::new(create_test_holder());
        let observed = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&holder);
        let sink = Arc::clone(&observed);
        holder.subscribe(move |state| {
            if let Some(holder) = weak.upgrade() {
                sink.lock().unwrap().push((state, holder.state()));
            }
        });

        holder.toggle();

        assert_eq!(
            *observed.lock().unwrap(),
            vec![(PlaybackState::Playing, PlaybackState::Playing)]
        );
    }

    #[test]
    fn test_subscribe_during_delivery_applies_next_round() {
        let holder = Arc::new(create_test_holder());
        let late_calls = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&holder);
        let counter = Arc::clone(&late_calls);
        let registered = Arc::new(AtomicUsize::new(0));
        holder.subscribe(move |_| {
            if registered.fetch_add(1, Ordering::SeqCst) == 0 {
                if let Some(holder) = weak.upgrade() {
                    let counter = Arc::clone(&counter);
                    holder.subscribe(move |_| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    });
                }
            }
        });

        holder.start();
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        holder.stop();
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_changes_iterator_receives_events() {
        let holder = create_test_holder();
        let changes = holder.changes();

        holder.toggle();
        holder.toggle();

        let events: Vec<_> = changes.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].entity_id.as_str(), "$info:example.org");
        assert_eq!(events[0].value, PlaybackState::Playing);
        assert_eq!(events[1].value, PlaybackState::Stopped);
    }

    #[test]
    fn test_changes_iterator_detaches_on_drop() {
        let holder = create_test_holder();
        let changes = holder.changes();
        assert_eq!(holder.observer_count(), 1);

        drop(changes);
        assert_eq!(holder.observer_count(), 0);
    }

    #[test]
    fn test_changes_iterator_ends_after_destroy() {
        let holder = create_test_holder();
        let changes = holder.changes();

        holder.start();
        holder.destroy();

        assert_eq!(changes.recv().map(|e| e.value), Some(PlaybackState::Playing));
        assert!(changes.recv_timeout(Duration::from_millis(50)).is_none());
        assert!(holder.changes().recv().is_none());
    }

    fn subscribe_owning_changes(holder: &PlaybackStateHolder) -> SubscriptionId {
        let owned = Mutex::new(holder.changes());
        holder.subscribe(move |_| {
            let changes = owned.lock().unwrap();
            while changes.try_recv().is_some() {}
        })
    }

    #[test]
    fn test_destroy_releases_observer_owning_changes() {
        let holder = create_test_holder();
        subscribe_owning_changes(&holder);
        assert_eq!(holder.observer_count(), 2);

        holder.start();
        holder.destroy();

        assert!(holder.is_destroyed());
        assert_eq!(holder.observer_count(), 0);
    }

    #[test]
    fn test_unsubscribe_releases_observer_owning_changes() {
        let holder = create_test_holder();
        let id = subscribe_owning_changes(&holder);

        assert!(holder.unsubscribe(id));
        // The owned iterator detached its own feed on drop
        assert_eq!(holder.observer_count(), 0);

        holder.start();
        assert_eq!(holder.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_changes_timeout_iter_stops_when_idle() {
        let holder = create_test_holder();
        let changes = holder.changes();

        holder.start();
        holder.stop();

        let values: Vec<_> = changes
            .timeout_iter(Duration::from_millis(20))
            .map(|event| event.value)
            .collect();
        assert_eq!(values, vec![PlaybackState::Playing, PlaybackState::Stopped]);
    }

    #[test]
    fn test_holder_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlaybackStateHolder>();
    }
}
