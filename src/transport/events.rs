//! Event subscription table.
//!
//! Painter pushes unsolicited events (`EXPORT_FINISHED`, `PROJECT_OPENED`,
//! `QUIT`) on the same channel that carries replies. This module routes them
//! to subscribers:
//!
//! - [`Subscription`]: a cancellation handle returned by `subscribe`, so
//!   unsubscription removes exactly the entry it was issued for.
//! - [`EventWait`]: a one-shot registration that resolves on the first
//!   matching event and removes itself, used by long-running operations that
//!   signal completion via an event rather than a reply.
//!
//! Callbacks for one event type fire synchronously, in subscription order,
//! from the connection's event-loop task. The table lock is released before
//! any callback runs, so a callback may itself subscribe or unsubscribe.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::trace;

use crate::error::{Error, Result};
use crate::identifiers::SubscriptionId;

// ============================================================================
// Types
// ============================================================================

/// Event callback type.
///
/// Called with the event's parameter set for each matching event.
pub type EventCallback = Box<dyn Fn(&Value) + Send + Sync>;

/// Internal shared form of a callback; clonable so dispatch can invoke it
/// after releasing the table lock.
type SharedCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// One registered sink for an event type.
enum EventSink {
    /// Persistent callback; fires on every matching event.
    Callback(SharedCallback),
    /// One-shot waiter; consumed and removed on first delivery.
    Once(oneshot::Sender<Value>),
}

/// One entry in the subscription table.
struct Entry {
    id: SubscriptionId,
    sink: EventSink,
}

// ============================================================================
// EventRouter
// ============================================================================

/// Mapping from event-type name to its ordered subscriber list.
///
/// Shared between the [`Connection`](super::Connection) handle and its event
/// loop behind a mutex; entries are added and removed explicitly by calling
/// code, never by request lifecycle.
#[derive(Default)]
pub(crate) struct EventRouter {
    next_id: u64,
    entries: FxHashMap<String, Vec<Entry>>,
}

impl EventRouter {
    /// Adds a persistent callback, returning its subscription ID.
    pub(crate) fn subscribe(&mut self, event: &str, callback: EventCallback) -> SubscriptionId {
        let id = self.next_subscription_id();
        self.entries
            .entry(event.to_string())
            .or_default()
            .push(Entry {
                id,
                sink: EventSink::Callback(Arc::from(callback)),
            });
        id
    }

    /// Adds a one-shot waiter, returning its subscription ID.
    pub(crate) fn subscribe_once(
        &mut self,
        event: &str,
        tx: oneshot::Sender<Value>,
    ) -> SubscriptionId {
        let id = self.next_subscription_id();
        self.entries
            .entry(event.to_string())
            .or_default()
            .push(Entry {
                id,
                sink: EventSink::Once(tx),
            });
        id
    }

    /// Removes one entry; returns `true` if it was still registered.
    pub(crate) fn unsubscribe(&mut self, event: &str, id: SubscriptionId) -> bool {
        let Some(entries) = self.entries.get_mut(event) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() < before;

        if entries.is_empty() {
            self.entries.remove(event);
        }
        removed
    }

    /// Collects the sinks to invoke for one event, in subscription order.
    ///
    /// One-shot entries are taken out of the table here; persistent
    /// callbacks stay registered and are handed out as clones.
    fn take_deliveries(&mut self, event: &str) -> Vec<EventSink> {
        let Some(entries) = self.entries.get_mut(event) else {
            return Vec::new();
        };

        let mut deliveries = Vec::with_capacity(entries.len());
        let mut index = 0;
        while index < entries.len() {
            match &entries[index].sink {
                EventSink::Callback(callback) => {
                    deliveries.push(EventSink::Callback(Arc::clone(callback)));
                    index += 1;
                }
                EventSink::Once(_) => {
                    let entry = entries.remove(index);
                    deliveries.push(entry.sink);
                }
            }
        }

        if entries.is_empty() {
            self.entries.remove(event);
        }
        deliveries
    }

    /// Drops every entry; pending one-shot waiters observe a closed channel.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of entries registered for an event type.
    #[cfg(test)]
    pub(crate) fn subscriber_count(&self, event: &str) -> usize {
        self.entries.get(event).map_or(0, Vec::len)
    }

    fn next_subscription_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Delivers one event to all current subscribers, in subscription order.
///
/// The table lock is held only while snapshotting the subscriber list; the
/// sinks run unlocked, so a callback may call `subscribe`, `unsubscribe`, or
/// `wait_for` on the same connection. A subscription added during dispatch
/// does not see the event that triggered it.
pub(crate) fn dispatch_event(router: &Mutex<EventRouter>, event: &str, params: &Value) {
    let deliveries = router.lock().take_deliveries(event);

    if deliveries.is_empty() {
        trace!(event, "No subscribers for event");
        return;
    }

    for sink in deliveries {
        match sink {
            EventSink::Callback(callback) => callback(params),
            EventSink::Once(tx) => {
                let _ = tx.send(params.clone());
            }
        }
    }
}

// ============================================================================
// Subscription
// ============================================================================

/// Handle for one persistent event subscription.
///
/// Pass it back to [`Connection::unsubscribe`](super::Connection::unsubscribe)
/// to remove the entry. Consuming the handle makes double-unsubscription
/// unrepresentable.
#[derive(Debug)]
pub struct Subscription {
    pub(crate) event: String,
    pub(crate) id: SubscriptionId,
}

impl Subscription {
    /// The event-type name this subscription listens for.
    #[inline]
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The subscription's identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

// ============================================================================
// EventWait
// ============================================================================

/// A pending one-shot wait for a single event delivery.
///
/// Created by [`Connection::wait_for`](super::Connection::wait_for) *before*
/// the triggering call is sent, so completion cannot race the registration.
/// The table entry is removed on first delivery, on timeout, or when the
/// wait is dropped unfired.
pub struct EventWait {
    event: String,
    id: SubscriptionId,
    router: Arc<Mutex<EventRouter>>,
    rx: Option<oneshot::Receiver<Value>>,
}

impl fmt::Debug for EventWait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventWait")
            .field("event", &self.event)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl EventWait {
    pub(crate) fn new(
        event: String,
        id: SubscriptionId,
        router: Arc<Mutex<EventRouter>>,
        rx: oneshot::Receiver<Value>,
    ) -> Self {
        Self {
            event,
            id,
            router,
            rx: Some(rx),
        }
    }

    /// The event-type name being waited for.
    #[inline]
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Waits for the event's parameter set, up to `deadline`.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if no matching event arrives in time; the table
    ///   entry is removed first, so a later event triggers nothing.
    /// - [`Error::ConnectionClosed`] if the connection shuts down while
    ///   waiting.
    pub async fn wait(mut self, deadline: Duration) -> Result<Value> {
        let Some(rx) = self.rx.take() else {
            return Err(Error::protocol("event wait already consumed"));
        };

        match timeout(deadline, rx).await {
            Ok(Ok(params)) => Ok(params),
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                self.router.lock().unsubscribe(&self.event, self.id);
                Err(Error::timeout(
                    format!("wait for {} event", self.event),
                    deadline.as_millis() as u64,
                ))
            }
        }
    }
}

impl Drop for EventWait {
    fn drop(&mut self) {
        // Unfired waits must not leave a live table entry behind.
        // Removal is a no-op if dispatch or timeout already took it.
        self.router.lock().unsubscribe(&self.event, self.id);
    }
}

// ============================================================================
// Tests
// ============================================================================
