//! Event bus: topics, handlers, registry and scoped subscriptions.
//!
//! ## Contents
//! - [`Topic`] opaque string key; `"*"` is the wildcard
//! - [`Handler`], [`Event`] shared callback and the view it is called with
//! - [`EventBus`] `on` / `off` / `emit`, plus typed [`EventBus::publish`]
//! - [`Subscription`], [`SubscriptionGroup`] drop-to-unregister guards
//!
//! ## Quick reference
//! - **Producers**: any container calling `emit`/`publish`.
//! - **Consumers**: handlers registered with `on`/`subscribe`, the async
//!   [`SubscriberSet`](crate::SubscriberSet) bridge, and the workview state
//!   machines in [`workview`](crate::workview).

mod event_bus;
mod handler;
mod registry;
mod subscription;
mod topic;

pub use event_bus::{Delivery, EventBus, Routed};
pub use handler::{Event, Handler, HandlerResult};
pub use subscription::{Subscription, SubscriptionGroup};
pub use topic::Topic;
