//! # Bus configuration.
//!
//! Provides [`BusConfig`], the settings shared by an [`EventBus`](crate::EventBus)
//! and the [`SubscriberSet`](crate::SubscriberSet) attached to it.
//!
//! ## Sentinel values
//! - `max_listeners = 0` → no listener-count warning
//! - `subscriber_queue_capacity = 0` → clamped to 1

/// Configuration for an event bus.
///
/// ## Field semantics
/// - `max_listeners`: warn once per topic when its handler count exceeds this (`0` = never)
/// - `catch_panics`: isolate panicking handlers instead of unwinding through `emit`
/// - `subscriber_queue_capacity`: default per-subscriber queue size for the async bridge
///
/// ## Notes
/// All fields are public. Prefer the accessors to avoid sprinkling sentinel checks.
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Per-topic handler count above which a leak warning is logged.
    ///
    /// Containers register on mount and unregister on unmount; a steadily
    /// growing count usually means a missing `off`.
    pub max_listeners: usize,

    /// Catch panics raised by handlers.
    ///
    /// When `true` a panic is recorded as [`HandlerError::Panicked`](crate::HandlerError::Panicked)
    /// and the pass continues. When `false` the panic propagates out of `emit`.
    pub catch_panics: bool,

    /// Default queue capacity for async subscribers that do not override
    /// [`Subscribe::queue_capacity`](crate::Subscribe::queue_capacity).
    pub subscriber_queue_capacity: usize,
}

impl BusConfig {
    /// Returns the listener warning threshold as an `Option`.
    ///
    /// - `None` → warning disabled
    /// - `Some(n)` → warn when a topic holds more than `n` handlers
    #[inline]
    pub fn listener_limit(&self) -> Option<usize> {
        if self.max_listeners == 0 {
            None
        } else {
            Some(self.max_listeners)
        }
    }

    /// Returns the subscriber queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn subscriber_queue_capacity_clamped(&self) -> usize {
        self.subscriber_queue_capacity.max(1)
    }
}

impl Default for BusConfig {
    /// Default configuration:
    ///
    /// - `max_listeners = 10`
    /// - `catch_panics = true`
    /// - `subscriber_queue_capacity = 1024`
    fn default() -> Self {
        Self {
            max_listeners: 10,
            catch_panics: true,
            subscriber_queue_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        let mut cfg = BusConfig::default();
        assert_eq!(cfg.listener_limit(), Some(10));

        cfg.max_listeners = 0;
        cfg.subscriber_queue_capacity = 0;
        assert_eq!(cfg.listener_limit(), None);
        assert_eq!(cfg.subscriber_queue_capacity_clamped(), 1);
    }
}
