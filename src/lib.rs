//! # mappingbus
//!
//! **mappingbus** is a topic-keyed publish/subscribe bus for the containers of
//! a mapping editor workview.
//!
//! Containers never hold references to each other. Instead they register
//! handlers under topic names and emit messages; the bus routes every emission
//! to the handlers of its topic and to the wildcard (`"*"`) handlers.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  EditTracker │   │   RuleView   │   │   RuleView   │
//!     │ (workview)   │   │  (row "a")   │   │  (row "b")   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ on / subscribe   │ publish          │ on / subscribe
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventBus<P>                                                      │
//! │  - Registry: topic ──► [Handler, Handler, ...] (insertion order)  │
//! │  - emit: snapshot under read lock, invoke with the lock released  │
//! │  - per-handler isolation (Err / panic ──► Delivery::failures)     │
//! └──────┬──────────────────┬─────────────────────────────┬───────────┘
//!        ▼                  ▼                             ▼
//!   topic handlers    "*" handlers               SubscriberSet ("*")
//!   (sync, in order)  (after topic handlers)      ┌───────┼───────┐
//!                                                 ▼       ▼       ▼
//!                                              worker1 worker2 workerN
//!                                              (bounded queues, tokio)
//! ```
//!
//! ### Emit
//! ```text
//! emit(topic, payload)
//!   ├─► snapshot handlers[topic]            (empty if topic == "*")
//!   ├─► snapshot handlers["*"]
//!   ├─► release lock
//!   ├─► for h in topic snapshot ++ wildcard snapshot:
//!   │       ├─ Ok     ──► invoked += 1
//!   │       ├─ Err(e) ──► failures.push(e), continue
//!   │       └─ panic  ──► failures.push(Panicked), continue
//!   └─► Delivery { topic, invoked, failures }
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                         |
//! |-------------------|---------------------------------------------------------------|--------------------------------------------|
//! | **Bus**           | Register, unregister and emit by topic name.                  | [`EventBus`], [`Topic`], [`Handler`]       |
//! | **Scoping**       | Handlers released on drop.                                    | [`Subscription`], [`SubscriptionGroup`]    |
//! | **Messages**      | The mapping editor topic contract as a typed enum.            | [`Message`], [`topics`], [`MappingBus`]    |
//! | **Async**         | Queue emissions to async subscribers.                         | [`Subscribe`], [`SubscriberSet`]           |
//! | **Workview**      | Edit tracking and rule row state driven by the bus.           | [`workview::EditTracker`], [`workview::RuleView`] |
//! | **Errors**        | Typed handler and payload failures.                           | [`BusError`], [`HandlerError`], [`PayloadError`] |
//! | **Configuration** | Listener leak warning, panic isolation, queue capacity.       | [`BusConfig`]                              |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use mappingbus::{Event, Handler, MappingBus, Message, RuleId, topics};
//!
//! let bus = MappingBus::new();
//! let opened = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&opened);
//! let on_open = Handler::from_fn("count-open", move |ev: Event<'_, Message>| {
//!     if ev.payload.rule_id() == Some(&RuleId::from("person")) {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     }
//! });
//! bus.on(topics::RULE_VIEW_CHANGE, &on_open);
//!
//! let delivery = bus.publish(Message::change("person"));
//! assert!(delivery.is_ok());
//! assert_eq!(opened.load(Ordering::SeqCst), 1);
//!
//! bus.off(topics::RULE_VIEW_CHANGE, &on_open);
//! bus.publish(Message::change("person"));
//! assert_eq!(opened.load(Ordering::SeqCst), 1);
//! ```
mod bus;
mod config;
mod error;
mod messages;
mod subscribers;
pub mod workview;

// ---- Public re-exports ----

pub use bus::{
    Delivery, Event, EventBus, Handler, HandlerResult, Routed, Subscription, SubscriptionGroup,
    Topic,
};
pub use config::BusConfig;
pub use error::{BusError, HandlerError, HandlerFailure, PayloadError};
pub use messages::{
    CreateMapping, CreateRule, MappingBus, Message, OrderRequest, Reload, ReloadTicket,
    RemoveClick, RuleId, RuleRef, RuleType, SuggestionsProgress, ToggleRule, ToggleTarget,
    Visibility, bus, topics,
};
pub use subscribers::{Published, Subscribe, SubscriberSet, SubscriberStats};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
