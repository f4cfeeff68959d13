//! # Handlers and the event view they receive.
//!
//! [`Handler`] wraps a closure `F: Fn(Event<'_, P>) -> HandlerResult` behind an
//! `Arc`. Cloning a handler shares the closure, and the bus identifies a
//! registration by that shared pointer, not by what the closure does:
//!
//! ```rust
//! use mappingbus::{EventBus, Handler};
//!
//! let bus: EventBus<i32> = EventBus::new();
//! let h: Handler<i32> = Handler::from_fn("counter", |_ev| {});
//!
//! bus.on("x", &h);
//! bus.on("x", &h.clone());           // same identity, second registration
//! bus.on("x", &Handler::from_fn("counter", |_ev| {})); // different identity
//!
//! bus.off("x", &h);                  // removes exactly one of the first two
//! assert_eq!(bus.listener_count("x"), 2);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::bus::Topic;
use crate::error::HandlerError;

/// Result returned by every handler.
pub type HandlerResult = Result<(), HandlerError>;

type HandlerFn<P> = dyn for<'a> Fn(Event<'a, P>) -> HandlerResult + Send + Sync;

/// What a handler sees for one emission.
///
/// Topic-specific handlers usually only read [`payload`](Self::payload);
/// wildcard handlers also need [`topic`](Self::topic) to tell emissions apart.
pub struct Event<'a, P> {
    /// The emitted topic (never `*` for wildcard handlers unless `*` itself was emitted).
    pub topic: &'a Topic,
    /// The emitted payload.
    pub payload: &'a P,
}

impl<P> Clone for Event<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Event<'_, P> {}

impl<P: fmt::Debug> fmt::Debug for Event<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("topic", self.topic)
            .field("payload", self.payload)
            .finish()
    }
}

/// Shared callback registered on the bus.
pub struct Handler<P> {
    name: Cow<'static, str>,
    f: Arc<HandlerFn<P>>,
}

impl<P: 'static> Handler<P> {
    /// Creates a fallible handler.
    ///
    /// Returned errors are collected by the bus; they never stop the pass.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: for<'a> Fn(Event<'a, P>) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Creates a handler that cannot fail (panics are still caught by the bus).
    pub fn from_fn<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: for<'a> Fn(Event<'a, P>) + Send + Sync + 'static,
    {
        Self::new(name, move |ev: Event<'_, P>| {
            f(ev);
            Ok(())
        })
    }
}

impl<P> Handler<P> {
    /// Name used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `other` is the same registration target (pointer identity).
    #[inline]
    pub fn same(&self, other: &Handler<P>) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }

    #[inline]
    pub(crate) fn call(&self, ev: Event<'_, P>) -> HandlerResult {
        (self.f)(ev)
    }
}

impl<P> Clone for Handler<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            f: Arc::clone(&self.f),
        }
    }
}

impl<P> fmt::Debug for Handler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("ptr", &Arc::as_ptr(&self.f).cast::<()>())
            .finish()
    }
}
