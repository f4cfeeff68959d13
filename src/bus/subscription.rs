//! # Scoped registrations.
//!
//! A [`Subscription`] is the guard returned by [`EventBus::subscribe`](crate::EventBus::subscribe):
//! dropping it performs exactly one `off` for the registration it stands for.
//! A [`SubscriptionGroup`] collects the guards of one container so they can be
//! released together when the container goes away (unmount).
//!
//! Guards hold a weak reference: they never keep a bus alive, and releasing a
//! guard after its bus is gone does nothing.

use std::sync::Weak;

use crate::bus::event_bus::Inner;
use crate::bus::{Handler, Topic};

/// Registration guard; unregisters on drop.
pub struct Subscription<P> {
    bus: Weak<Inner<P>>,
    topic: Topic,
    handler: Handler<P>,
    active: bool,
}

impl<P> Subscription<P> {
    pub(crate) fn new(bus: Weak<Inner<P>>, topic: Topic, handler: Handler<P>) -> Self {
        Self {
            bus,
            topic,
            handler,
            active: true,
        }
    }

    /// Topic this registration lives under.
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// The registered handler.
    pub fn handler(&self) -> &Handler<P> {
        &self.handler
    }

    /// Unregisters now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keeps the handler registered for the lifetime of the bus.
    pub fn forget(mut self) {
        self.active = false;
    }

    fn release(&mut self) {
        if !std::mem::replace(&mut self.active, false) {
            return;
        }
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.topic.as_str(), &self.handler);
        }
    }
}

impl<P> Drop for Subscription<P> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<P> std::fmt::Debug for Subscription<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("handler", &self.handler.name())
            .field("active", &self.active)
            .finish()
    }
}

/// All subscriptions owned by one container.
pub struct SubscriptionGroup<P> {
    subs: Vec<Subscription<P>>,
}

impl<P> Default for SubscriptionGroup<P> {
    fn default() -> Self {
        Self { subs: Vec::new() }
    }
}

impl<P> SubscriptionGroup<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a guard.
    pub fn push(&mut self, sub: Subscription<P>) {
        self.subs.push(sub);
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Unregisters everything (the group stays usable).
    pub fn clear(&mut self) {
        self.subs.clear();
    }
}

impl<P> Extend<Subscription<P>> for SubscriptionGroup<P> {
    fn extend<I: IntoIterator<Item = Subscription<P>>>(&mut self, iter: I) {
        self.subs.extend(iter);
    }
}
