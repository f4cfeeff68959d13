//! # Topic registry.
//!
//! Maps each [`Topic`] to the ordered list of handlers registered under it.
//!
//! ## Rules
//! - Insertion order is invocation order.
//! - Duplicate registrations are kept as separate entries.
//! - `remove` drops at most one entry (the earliest matching one).
//! - A topic whose list becomes empty is dropped from the map.
//! - Readers take a [`snapshot`](Registry::snapshot); later mutations never
//!   reach an emission that already started.
//!
//! The registry itself is not synchronized; [`EventBus`](crate::EventBus)
//! guards it with a lock.

use std::collections::HashMap;

use crate::bus::{Handler, Topic};

/// Ordered handler lists keyed by topic.
pub(crate) struct Registry<P> {
    topics: HashMap<Topic, Vec<Handler<P>>>,
}

impl<P> Registry<P> {
    pub(crate) fn new() -> Self {
        Self {
            topics: HashMap::new(),
        }
    }

    /// Appends a handler and returns the new handler count for `topic`.
    pub(crate) fn insert(&mut self, topic: Topic, handler: Handler<P>) -> usize {
        let list = self.topics.entry(topic).or_default();
        list.push(handler);
        list.len()
    }

    /// Removes the first entry identical to `handler`.
    ///
    /// Returns `false` when the topic or the handler is unknown.
    pub(crate) fn remove(&mut self, topic: &str, handler: &Handler<P>) -> bool {
        let Some(list) = self.topics.get_mut(topic) else {
            return false;
        };
        let Some(pos) = list.iter().position(|h| h.same(handler)) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.topics.remove(topic);
        }
        true
    }

    /// Removes every handler registered under `topic`; returns how many were dropped.
    pub(crate) fn remove_topic(&mut self, topic: &str) -> usize {
        self.topics.remove(topic).map_or(0, |list| list.len())
    }

    /// Copies the current handler list for `topic`.
    pub(crate) fn snapshot(&self, topic: &str) -> Vec<Handler<P>> {
        self.topics.get(topic).cloned().unwrap_or_default()
    }

    pub(crate) fn count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }

    pub(crate) fn topics(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self.topics.keys().cloned().collect();
        topics.sort();
        topics
    }

    pub(crate) fn clear(&mut self) {
        self.topics.clear();
    }
}
