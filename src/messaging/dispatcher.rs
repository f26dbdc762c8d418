//! The event bus: listener registry and dispatch traversal.
//!
//! # Data Flow
//! ```text
//! attach(listener)
//!     → queue for the listener's pattern (sorted insert)
//!     → ListenerId handed back for detach
//!
//! notify(message)
//!     → snapshot matching queues (exact + wildcard, one merged ordering)
//!     → invoke actions in (priority desc, attach order asc)
//!     → honor message.stop(), skip listeners detached mid-flight
//!
//! notify_with_responses(message)
//!     → same traversal, non-None action returns collected in order
//! ```
//!
//! # Design Decisions
//! - The traversal iterates a snapshot taken at dispatch start, so actions
//!   may attach/detach listeners or emit nested messages without
//!   corrupting the in-flight iteration
//! - Listeners attached during a dispatch are not invoked for it;
//!   listeners detached during a dispatch are skipped
//! - detach of an unknown id is a surfaced error, never silent

use std::cmp::Reverse;
use std::collections::HashMap;

use thiserror::Error;

use super::listener::{Listener, ListenerId, ListenerPattern};
use super::message::{Message, MessageName, Response};
use super::queue::{ListenerQueue, QueueEntry};

/// Errors raised by dispatcher registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Detach referenced an id that was never attached or was already
    /// detached. Programmer error; surfaced, not retried.
    #[error("{0} is not attached")]
    ListenerNotFound(ListenerId),
}

/// The message bus.
///
/// Registration is expected to complete during boot; afterwards the
/// registry is only read per dispatch. Callers that mutate it across
/// threads must serialize access themselves.
#[derive(Default)]
pub struct MessageDispatcher {
    /// Queues for exact-name listeners.
    exact: HashMap<MessageName, ListenerQueue>,
    /// Queues for wildcard listeners, keyed by pattern.
    patterns: Vec<(ListenerPattern, ListenerQueue)>,
    /// Where each live listener is registered, for detach routing.
    locations: HashMap<ListenerId, ListenerPattern>,
    /// Attach counter; doubles as the FIFO tiebreak sequence.
    next_seq: u64,
}

impl MessageDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Returns the id used for detach.
    pub fn attach(&mut self, listener: Listener) -> ListenerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = ListenerId(seq);

        let Listener {
            pattern,
            priority,
            predicate,
            action,
        } = listener;

        let entry = QueueEntry {
            id,
            seq,
            priority,
            predicate,
            action,
        };

        match &pattern {
            ListenerPattern::Exact(name) => {
                self.exact.entry(name.clone()).or_default().insert(entry);
            }
            wildcard => {
                match self.patterns.iter_mut().find(|(p, _)| p == wildcard) {
                    Some((_, queue)) => queue.insert(entry),
                    None => {
                        let mut queue = ListenerQueue::default();
                        queue.insert(entry);
                        self.patterns.push((wildcard.clone(), queue));
                    }
                }
            }
        }

        tracing::debug!(id = %id, pattern = %pattern, priority, "listener attached");
        self.locations.insert(id, pattern);
        id
    }

    /// Remove a previously attached listener.
    pub fn detach(&mut self, id: ListenerId) -> Result<(), DispatchError> {
        let pattern = self
            .locations
            .remove(&id)
            .ok_or(DispatchError::ListenerNotFound(id))?;

        let removed = match &pattern {
            ListenerPattern::Exact(name) => {
                let removed = self
                    .exact
                    .get_mut(name)
                    .map(|queue| queue.remove(id))
                    .unwrap_or(false);
                if self.exact.get(name).is_some_and(ListenerQueue::is_empty) {
                    self.exact.remove(name);
                }
                removed
            }
            wildcard => {
                let removed = self
                    .patterns
                    .iter_mut()
                    .find(|(p, _)| p == wildcard)
                    .map(|(_, queue)| queue.remove(id))
                    .unwrap_or(false);
                self.patterns.retain(|(_, queue)| !queue.is_empty());
                removed
            }
        };
        debug_assert!(removed, "location map out of sync with queues");

        tracing::debug!(id = %id, pattern = %pattern, "listener detached");
        Ok(())
    }

    /// Dispatch a message; action return values are discarded.
    pub fn notify(&mut self, message: &mut Message) {
        self.dispatch(message, false);
    }

    /// Dispatch a message, collecting every non-`None` action return in
    /// invocation order. The responses accumulate on the message during
    /// the traversal (nested listeners may inspect them) and are drained
    /// out of the envelope on return.
    pub fn notify_with_responses(&mut self, message: &mut Message) -> Vec<Response> {
        self.dispatch(message, true);
        message.take_responses()
    }

    fn dispatch(&mut self, message: &mut Message, collect: bool) {
        let snapshot = self.snapshot(message.name());
        tracing::debug!(
            message = %message.name(),
            listeners = snapshot.len(),
            "dispatching message"
        );

        for entry in snapshot {
            if message.is_stopped() {
                tracing::debug!(message = %message.name(), "propagation stopped");
                break;
            }
            // Detached mid-dispatch by an earlier action.
            if !self.locations.contains_key(&entry.id) {
                continue;
            }
            if let Some(predicate) = entry.predicate.as_deref() {
                if !predicate(message) {
                    continue;
                }
            }
            let response = (entry.action.as_ref())(message, self);
            if collect {
                if let Some(response) = response {
                    message.push_response(response);
                }
            }
        }
    }

    /// Matching listeners for a name, in dispatch order. Each source
    /// queue is already sorted; sorting the concatenation merges the runs.
    fn snapshot(&self, name: &MessageName) -> Vec<QueueEntry> {
        let mut entries: Vec<QueueEntry> = Vec::new();
        if let Some(queue) = self.exact.get(name) {
            entries.extend_from_slice(queue.entries());
        }
        for (pattern, queue) in &self.patterns {
            if pattern.matches(name) {
                entries.extend_from_slice(queue.entries());
            }
        }
        entries.sort_by_key(|entry| (Reverse(entry.priority), entry.seq));
        entries
    }

    /// Number of live listeners across all queues.
    pub fn listener_count(&self) -> usize {
        self.locations.len()
    }

    /// True if at least one listener would receive the given name.
    pub fn has_listeners(&self, name: &MessageName) -> bool {
        self.exact.get(name).is_some_and(|queue| !queue.is_empty())
            || self.patterns.iter().any(|(pattern, _)| pattern.matches(name))
    }
}
