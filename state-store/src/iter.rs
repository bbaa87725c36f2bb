//! Channel-backed stream of change events
//!
//! A `ChangeIterator` wraps the receiving half of an `mpsc` channel that an
//! observer feeds. Pick the call that matches how long the consumer may wait:
//! `recv()` or plain `for` loops block, `try_recv()`/`try_iter()` drain what
//! is already queued, and `recv_timeout()`/`timeout_iter()` give up after a
//! quiet period.

use std::fmt;
use std::sync::mpsc;
use std::time::Duration;

use crate::event::ChangeEvent;

/// Called once when the iterator is dropped
type Detach = Box<dyn FnOnce() + Send>;

/// Receiving end of an observer-fed change stream
///
/// Iteration finishes when the last sender is dropped, which is how a
/// retired source closes the stream. An optional detach hook lets the
/// source unregister the feeding observer once nobody is listening.
///
/// ```rust,ignore
/// let changes = holder.changes();
/// std::thread::spawn(move || {
///     for event in changes {
///         render(event.value);
///     }
/// });
/// ```
pub struct ChangeIterator<Id, T> {
    rx: mpsc::Receiver<ChangeEvent<Id, T>>,
    detach: Option<Detach>,
}

impl<Id, T> ChangeIterator<Id, T> {
    /// Create a ChangeIterator from a receiver
    pub fn new(rx: mpsc::Receiver<ChangeEvent<Id, T>>) -> Self {
        Self { rx, detach: None }
    }

    /// Create a ChangeIterator that runs `detach` when dropped
    ///
    /// Sources use this to remove the observer feeding the channel.
    pub fn with_detach<F>(rx: mpsc::Receiver<ChangeEvent<Id, T>>, detach: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            rx,
            detach: Some(Box::new(detach)),
        }
    }

    /// Wait for the next event; `None` once the stream is closed
    pub fn recv(&self) -> Option<ChangeEvent<Id, T>> {
        self.rx.recv().ok()
    }

    /// Wait up to `timeout` for the next event
    ///
    /// `None` covers both an idle timeout and a closed stream.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ChangeEvent<Id, T>> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Next queued event, if any
    pub fn try_recv(&self) -> Option<ChangeEvent<Id, T>> {
        self.rx.try_recv().ok()
    }

    /// Drain the events already queued without waiting
    pub fn try_iter(&self) -> TryIter<'_, Id, T> {
        TryIter { inner: self }
    }

    /// Iterate until no event arrives within `timeout`
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIter<'_, Id, T> {
        TimeoutIter {
            inner: self,
            timeout,
        }
    }
}

impl<Id, T> Iterator for ChangeIterator<Id, T> {
    type Item = ChangeEvent<Id, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl<Id, T> Drop for ChangeIterator<Id, T> {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl<Id, T> fmt::Debug for ChangeIterator<Id, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeIterator")
            .field("detachable", &self.detach.is_some())
            .finish()
    }
}

/// Iterator over already-queued events
pub struct TryIter<'a, Id, T> {
    inner: &'a ChangeIterator<Id, T>,
}

impl<'a, Id, T> Iterator for TryIter<'a, Id, T> {
    type Item = ChangeEvent<Id, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Iterator that ends after a quiet period
pub struct TimeoutIter<'a, Id, T> {
    inner: &'a ChangeIterator<Id, T>,
    timeout: Duration,
}

impl<'a, Id, T> Iterator for TimeoutIter<'a, Id, T> {
    type Item = ChangeEvent<Id, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}
