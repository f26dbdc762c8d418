//! Priority-ordered listener queue.
//!
//! # Responsibilities
//! - Hold the listeners registered under one name or pattern
//! - Keep entries sorted by (priority desc, attach-sequence asc)
//!
//! # Design Decisions
//! - Sorted incrementally at attach via binary search, not at dispatch
//! - Attach sequence is the stability tiebreak for equal priorities

use super::listener::{Action, ListenerId, Predicate, Priority};

/// A listener as stored by the dispatcher.
#[derive(Clone)]
pub(crate) struct QueueEntry {
    pub(crate) id: ListenerId,
    pub(crate) seq: u64,
    pub(crate) priority: Priority,
    pub(crate) predicate: Option<Predicate>,
    pub(crate) action: Action,
}

impl QueueEntry {
    /// True if `self` sorts before an entry with the given key.
    fn sorts_before(&self, priority: Priority, seq: u64) -> bool {
        self.priority > priority || (self.priority == priority && self.seq < seq)
    }
}

/// Listeners registered under one message name or pattern, in dispatch
/// order.
#[derive(Clone, Default)]
pub(crate) struct ListenerQueue {
    entries: Vec<QueueEntry>,
}

impl ListenerQueue {
    /// Insert at the position dictated by (priority desc, seq asc).
    pub(crate) fn insert(&mut self, entry: QueueEntry) {
        let at = self
            .entries
            .partition_point(|existing| existing.sorts_before(entry.priority, entry.seq));
        self.entries.insert(at, entry);
    }

    /// Remove by id. Returns false if the id is not present.
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(at) => {
                self.entries.remove(at);
                true
            }
            None => false,
        }
    }

    pub(crate) fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
