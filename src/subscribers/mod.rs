//! # Async subscribers.
//!
//! The bus dispatches synchronously; subscribers whose reaction is async plug
//! in through the [`Subscribe`] trait and a [`SubscriberSet`].
//!
//! ## Architecture
//! ```text
//! Container ── emit ──► EventBus ──► sync handlers (on/subscribe)
//!                           │
//!                           └──► "*" ──► SubscriberSet ──► [queue] ──► Subscribe::on_event
//!                                                            ├──► Reloader
//!                                                            ├──► LogWriter
//!                                                            └──► Custom
//! ```

mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
mod log;

pub use subscriber::{Published, Subscribe};
pub use subscriber_set::{SubscriberSet, SubscriberStats};

#[cfg(feature = "logging")]
pub use log::LogWriter;
