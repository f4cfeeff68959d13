//! # Synchronous publish/subscribe bus.
//!
//! [`EventBus`] keeps a registry of handlers per [`Topic`] and dispatches
//! emissions on the caller's thread.
//!
//! ## Architecture
//! ```text
//! emit(topic, payload)
//!     │
//!     ├─► read lock ─► snapshot(topic) + snapshot("*") ─► unlock
//!     │
//!     ├─► handler 1 (topic)   ──┐
//!     ├─► handler 2 (topic)     ├─ each call isolated (Err / panic recorded)
//!     ├─► handler 1 ("*")       │
//!     └─► handler N ("*")     ──┘
//!     │
//!     └─► Delivery { invoked, failures }
//! ```
//!
//! ## Rules
//! - **Registration order**: handlers run in the order they were added.
//! - **Wildcard last**: `*` handlers run after the topic's own handlers.
//! - **Snapshot**: `on`/`off` during a pass only affect later passes.
//! - **Isolation**: a failing or panicking handler never stops the pass.
//! - **No lock held while calling handlers**: handlers may re-enter the bus.
//! - **Never fails on registration**: unknown `off` targets are no-ops.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::bus::registry::Registry;
use crate::bus::subscription::Subscription;
use crate::bus::{Event, Handler, Topic};
use crate::config::BusConfig;
use crate::error::{BusError, HandlerError, HandlerFailure};

/// Payloads that know which topic they belong to.
///
/// Implemented by typed message enums so callers can [`EventBus::publish`]
/// without repeating the topic name.
pub trait Routed {
    /// Topic this payload is emitted on.
    fn topic(&self) -> Topic;
}

pub(crate) struct Inner<P> {
    registry: RwLock<Registry<P>>,
    warned: Mutex<HashSet<Topic>>,
    cfg: BusConfig,
}

impl<P> Inner<P> {
    pub(crate) fn remove(&self, topic: &str, handler: &Handler<P>) -> bool {
        let removed = self.registry.write().remove(topic, handler);
        if removed {
            debug!(topic = %topic, handler = %handler.name(), "handler unregistered");
        } else {
            trace!(topic = %topic, handler = %handler.name(), "unregister ignored: not registered");
        }
        removed
    }
}

/// In-process event bus.
///
/// Cheap to clone: clones share one registry.
pub struct EventBus<P> {
    inner: Arc<Inner<P>>,
}

impl<P> Clone for EventBus<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: 'static> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: 'static> EventBus<P> {
    /// Creates a bus with [`BusConfig::default`].
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Creates a bus with the given configuration.
    pub fn with_config(cfg: BusConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: RwLock::new(Registry::new()),
                warned: Mutex::new(HashSet::new()),
                cfg,
            }),
        }
    }

    /// Returns the configuration this bus was built with.
    pub fn config(&self) -> &BusConfig {
        &self.inner.cfg
    }

    /// Registers `handler` under `topic`.
    ///
    /// Registering the same handler twice creates two entries; each is invoked.
    /// Use [`Topic::WILDCARD`] to observe every emission.
    pub fn on(&self, topic: impl Into<Topic>, handler: &Handler<P>) {
        let topic = topic.into();
        let count = self
            .inner
            .registry
            .write()
            .insert(topic.clone(), handler.clone());
        debug!(topic = %topic, handler = %handler.name(), count, "handler registered");

        if let Some(limit) = self.inner.cfg.listener_limit() {
            if count > limit && self.inner.warned.lock().insert(topic.clone()) {
                warn!(
                    topic = %topic,
                    count,
                    limit,
                    "possible handler leak: listener count exceeds max_listeners"
                );
            }
        }
    }

    /// Removes one registration of `handler` from `topic`.
    ///
    /// Unknown topics and handlers are ignored.
    pub fn off(&self, topic: impl AsRef<str>, handler: &Handler<P>) {
        self.inner.remove(topic.as_ref(), handler);
    }

    /// Registers `handler` and returns a guard that unregisters it on drop.
    #[must_use = "dropping the subscription unregisters the handler immediately"]
    pub fn subscribe(&self, topic: impl Into<Topic>, handler: Handler<P>) -> Subscription<P> {
        let topic = topic.into();
        self.on(topic.clone(), &handler);
        Subscription::new(Arc::downgrade(&self.inner), topic, handler)
    }

    /// Removes every handler registered under `topic`.
    pub fn off_all(&self, topic: impl AsRef<str>) -> usize {
        let topic = topic.as_ref();
        let removed = self.inner.registry.write().remove_topic(topic);
        debug!(topic = %topic, removed, "topic cleared");
        removed
    }

    /// Removes every handler on every topic.
    pub fn clear(&self) {
        self.inner.registry.write().clear();
        self.inner.warned.lock().clear();
        debug!("bus cleared");
    }

    /// Number of handlers registered under `topic` (wildcard handlers not included).
    pub fn listener_count(&self, topic: impl AsRef<str>) -> usize {
        self.inner.registry.read().count(topic.as_ref())
    }

    /// Topics with at least one handler, sorted by name.
    pub fn topics(&self) -> Vec<Topic> {
        self.inner.registry.read().topics()
    }

    /// Invokes every handler of `topic`, then every wildcard handler.
    ///
    /// Runs synchronously and returns once all handlers of this pass have run.
    /// The returned [`Delivery`] may be ignored; failures are also logged.
    pub fn emit(&self, topic: impl Into<Topic>, payload: &P) -> Delivery {
        let topic = topic.into();
        let (direct, wildcard) = {
            let registry = self.inner.registry.read();
            let direct = if topic.is_wildcard() {
                Vec::new()
            } else {
                registry.snapshot(topic.as_str())
            };
            (direct, registry.snapshot(Topic::WILDCARD))
        };

        let mut delivery = Delivery::new(topic.clone());
        if direct.is_empty() && wildcard.is_empty() {
            trace!(topic = %topic, "emit without handlers");
            return delivery;
        }

        let ev = Event {
            topic: &topic,
            payload,
        };
        let wildcard_topic = Topic::wildcard();
        let passes = direct
            .iter()
            .map(|h| (&topic, h))
            .chain(wildcard.iter().map(|h| (&wildcard_topic, h)));

        for (position, (registered_on, handler)) in passes.enumerate() {
            delivery.invoked += 1;
            if let Err(error) = self.invoke(handler, ev) {
                warn!(
                    topic = %topic,
                    handler = %handler.name(),
                    label = error.as_label(),
                    error = %error,
                    "handler failed"
                );
                delivery.failures.push(HandlerFailure {
                    registered_on: registered_on.clone(),
                    position,
                    error,
                });
            }
        }

        trace!(
            topic = %topic,
            invoked = delivery.invoked,
            failed = delivery.failures.len(),
            "emit complete"
        );
        delivery
    }

    fn invoke(&self, handler: &Handler<P>, ev: Event<'_, P>) -> Result<(), HandlerError> {
        if !self.inner.cfg.catch_panics {
            return handler.call(ev);
        }
        match panic::catch_unwind(AssertUnwindSafe(|| handler.call(ev))) {
            Ok(result) => result,
            Err(payload) => Err(HandlerError::from_panic(payload.as_ref())),
        }
    }
}

impl<P: Routed + 'static> EventBus<P> {
    /// Emits `payload` on the topic it routes to.
    pub fn publish(&self, payload: P) -> Delivery {
        let topic = payload.topic();
        self.emit(topic, &payload)
    }
}

/// Outcome of one [`EventBus::emit`] pass.
#[derive(Debug)]
pub struct Delivery {
    /// Emitted topic.
    pub topic: Topic,
    /// Number of handlers invoked (topic-specific plus wildcard).
    pub invoked: usize,
    /// Failures in invocation order.
    pub failures: Vec<HandlerFailure>,
}

impl Delivery {
    fn new(topic: Topic) -> Self {
        Self {
            topic,
            invoked: 0,
            failures: Vec::new(),
        }
    }

    /// Whether every invoked handler succeeded.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Converts the report into a `Result`, returning the invocation count on success.
    pub fn into_result(self) -> Result<usize, BusError> {
        if self.failures.is_empty() {
            Ok(self.invoked)
        } else {
            Err(BusError::HandlersFailed {
                topic: self.topic,
                failures: self.failures,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recorder(log: &Log, name: &'static str) -> Handler<i32> {
        let log = Arc::clone(log);
        Handler::from_fn(name, move |ev: Event<'_, i32>| {
            log.lock().push(format!("{name}:{}:{}", ev.topic, ev.payload));
        })
    }

    #[test]
    fn test_on_then_emit_invokes_once() {
        let bus: EventBus<i32> = EventBus::new();
        let log = Log::default();
        bus.on("reload", &recorder(&log, "a"));

        let delivery = bus.emit("reload", &1);
        assert_eq!(delivery.invoked, 1);
        assert!(delivery.is_ok());
        assert_eq!(*log.lock(), vec!["a:reload:1"]);
    }

    #[test]
    fn test_off_prevents_invocation() {
        let bus: EventBus<i32> = EventBus::new();
        let log = Log::default();
        let a = recorder(&log, "a");
        bus.on("x", &a);
        bus.off("x", &a);

        assert_eq!(bus.emit("x", &1).invoked, 0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_registration_order_then_wildcard() {
        let bus: EventBus<i32> = EventBus::new();
        let log = Log::default();
        bus.on("*", &recorder(&log, "wild"));
        bus.on("y", &recorder(&log, "first"));
        bus.on("y", &recorder(&log, "second"));

        bus.emit("y", &7);
        assert_eq!(*log.lock(), vec!["first:y:7", "second:y:7", "wild:y:7"]);
    }

    #[test]
    fn test_emitting_wildcard_runs_wildcard_once() {
        let bus: EventBus<i32> = EventBus::new();
        let log = Log::default();
        bus.on("*", &recorder(&log, "wild"));

        assert_eq!(bus.emit("*", &0).invoked, 1);
        assert_eq!(*log.lock(), vec!["wild:*:0"]);
    }

    #[test]
    fn test_failure_does_not_stop_pass() {
        let bus: EventBus<i32> = EventBus::new();
        let ran = Arc::new(AtomicUsize::new(0));
        let ran2 = Arc::clone(&ran);

        bus.on("t", &Handler::new("bad", |_| Err(HandlerError::fail("boom"))));
        bus.on("t", &Handler::from_fn("panics", |_| panic!("kaboom")));
        bus.on(
            "t",
            &Handler::from_fn("good", move |_| {
                ran2.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let delivery = bus.emit("t", &0);
        assert_eq!(delivery.invoked, 3);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(delivery.failures.len(), 2);
        assert_eq!(delivery.failures[0].position, 0);
        assert_eq!(delivery.failures[0].error, HandlerError::fail("boom"));
        assert_eq!(
            delivery.failures[1].error,
            HandlerError::Panicked {
                info: "kaboom".into()
            }
        );

        let err = delivery.into_result().unwrap_err();
        assert_eq!(err.as_label(), "bus_handlers_failed");
    }

    #[test]
    fn test_wildcard_failure_is_attributed_to_wildcard() {
        let bus: EventBus<i32> = EventBus::new();
        bus.on("*", &Handler::new("bad", |_| Err(HandlerError::fail("no"))));

        let delivery = bus.emit("t", &0);
        assert!(delivery.failures[0].registered_on.is_wildcard());
    }

    #[test]
    fn test_listener_queries() {
        let bus: EventBus<i32> = EventBus::new();
        let h = Handler::from_fn("h", |_| {});
        bus.on("b", &h);
        bus.on("a", &h);
        bus.on("a", &h);

        assert_eq!(bus.listener_count("a"), 2);
        assert_eq!(bus.topics(), vec![Topic::from("a"), Topic::from("b")]);
        assert_eq!(bus.off_all("a"), 2);
        bus.clear();
        assert!(bus.topics().is_empty());
    }

    #[test]
    fn test_clones_share_registry() {
        let bus: EventBus<i32> = EventBus::new();
        let other = bus.clone();
        other.on("t", &Handler::from_fn("h", |_| {}));
        assert_eq!(bus.emit("t", &1).invoked, 1);
    }
}
