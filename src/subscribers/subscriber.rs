//! # Async subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for handlers whose reaction is
//! asynchronous (reloading rule data, saving suggestions) and must not run on
//! the emitting thread.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (tokio)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and logged, the worker keeps going)
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the emission **for this subscriber only**.
//! - Emissions are processed sequentially (FIFO) per subscriber.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use mappingbus::{Message, Published, Subscribe, Topic, topics};
//!
//! struct Reloader;
//!
//! #[async_trait]
//! impl Subscribe<Message> for Reloader {
//!     async fn on_event(&self, ev: &Published<Message>) {
//!         if let Message::Reload(_) = ev.payload {
//!             // fetch the rule tree from the mapping service
//!         }
//!     }
//!
//!     fn accepts(&self, topic: &Topic) -> bool { topic == topics::RELOAD }
//!     fn name(&self) -> &'static str { "reloader" }
//! }
//! ```

use async_trait::async_trait;

use crate::bus::Topic;

/// An emission handed over to async subscribers.
///
/// Owns a clone of the payload; one allocation is shared by all subscribers.
#[derive(Debug, Clone)]
pub struct Published<P> {
    pub topic: Topic,
    pub payload: P,
}

/// Asynchronous consumer of bus emissions.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe<P: Send + Sync + 'static>: Send + Sync + 'static {
    /// Processes one emission, called from the subscriber's worker task.
    async fn on_event(&self, ev: &Published<P>);

    /// Filter applied on the emitting thread, before the payload is queued.
    ///
    /// Default: every topic.
    fn accepts(&self, _topic: &Topic) -> bool {
        true
    }

    /// Name used in logs and overflow statistics.
    ///
    /// The default uses `type_name::<Self>()`; override it with something short.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred queue capacity.
    ///
    /// `None` uses [`BusConfig::subscriber_queue_capacity`](crate::BusConfig::subscriber_queue_capacity).
    /// The runtime clamps capacity to a minimum of 1.
    fn queue_capacity(&self) -> Option<usize> {
        None
    }
}
