//! # Non-blocking fan-out from the bus to async subscribers.
//!
//! [`SubscriberSet`] attaches to an [`EventBus`] as one wildcard handler and
//! forwards every accepted emission to per-subscriber queues.
//!
//! ## Architecture
//! ```text
//! bus.emit(topic, payload)
//!     │
//!     └──► wildcard handler ──► Arc<Published> (one clone of the payload)
//!              │
//!              ├──► [queue 1] ──► worker 1 ──► sub1.on_event()
//!              │    (bounded)         └──────► panic → logged, counted
//!              └──► [queue N] ──► worker N ──► subN.on_event()
//! ```
//!
//! ## Rules
//! - **Non-blocking**: the handler uses `try_send`; `emit` never waits on a subscriber.
//! - **Overflow**: emission dropped for that subscriber only, logged and counted.
//! - **Per-subscriber FIFO**; no ordering across subscribers.
//! - **Isolation**: a slow or panicking subscriber doesn't affect others.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber panics while holding a lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use parking_lot::RwLock;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

use crate::bus::{Event, EventBus, Handler, Subscription, Topic};
use crate::error::panic_message;
use crate::subscribers::{Published, Subscribe};

/// Per-subscriber channel metadata.
struct SubscriberChannel<P: Send + Sync + 'static> {
    sub: Arc<dyn Subscribe<P>>,
    sender: mpsc::Sender<Arc<Published<P>>>,
    stats: Arc<SubscriberCounters>,
}

#[derive(Default)]
struct SubscriberCounters {
    dropped: AtomicU64,
    panicked: AtomicU64,
}

/// Counters of one subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberStats {
    pub name: &'static str,
    /// Emissions dropped because the queue was full or closed.
    pub dropped: u64,
    /// Emissions whose processing panicked.
    pub panicked: u64,
}

/// Fan-out coordinator for async subscribers of one bus.
pub struct SubscriberSet<P: Send + Sync + 'static> {
    channels: Arc<RwLock<Vec<SubscriberChannel<P>>>>,
    workers: Vec<JoinHandle<()>>,
    subscription: Option<Subscription<P>>,
}

impl<P> SubscriberSet<P>
where
    P: Clone + Send + Sync + 'static,
{
    /// Spawns one worker per subscriber and attaches the set to `bus`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use = "dropping the set detaches it from the bus"]
    pub fn attach(bus: &EventBus<P>, subs: Vec<Arc<dyn Subscribe<P>>>) -> Self {
        let default_cap = bus.config().subscriber_queue_capacity_clamped();
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().unwrap_or(default_cap).max(1);
            let (tx, mut rx) = mpsc::channel::<Arc<Published<P>>>(cap);
            let stats = Arc::new(SubscriberCounters::default());
            let s = Arc::clone(&sub);
            let worker_stats = Arc::clone(&stats);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = s.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        worker_stats.panicked.fetch_add(1, Ordering::Relaxed);
                        warn!(
                            subscriber = s.name(),
                            topic = %ev.topic,
                            info = %panic_message(panic_err.as_ref()),
                            "subscriber panicked"
                        );
                    }
                }
                debug!(subscriber = s.name(), "subscriber worker stopped");
            });
            channels.push(SubscriberChannel {
                sub,
                sender: tx,
                stats,
            });
            workers.push(handle);
        }

        let channels = Arc::new(RwLock::new(channels));
        let shared = Arc::clone(&channels);
        let handler = Handler::from_fn("subscriber-set", move |ev: Event<'_, P>| {
            fan_out(&shared.read(), ev);
        });

        Self {
            channels,
            workers,
            subscription: Some(bus.subscribe(Topic::wildcard(), handler)),
        }
    }

    /// Number of attached subscribers.
    pub fn len(&self) -> usize {
        self.channels.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current counters, in attach order.
    pub fn stats(&self) -> Vec<SubscriberStats> {
        self.channels
            .read()
            .iter()
            .map(|ch| SubscriberStats {
                name: ch.sub.name(),
                dropped: ch.stats.dropped.load(Ordering::Relaxed),
                panicked: ch.stats.panicked.load(Ordering::Relaxed),
            })
            .collect()
    }

    /// Detaches from the bus and waits for every worker to drain its queue.
    ///
    /// 1. Unregisters the wildcard handler (no new emissions are queued)
    /// 2. Drops all senders (workers see the channel closed)
    /// 3. Awaits all workers
    pub async fn shutdown(mut self) {
        if let Some(sub) = self.subscription.take() {
            sub.unsubscribe();
        }
        self.channels.write().clear();

        for h in std::mem::take(&mut self.workers) {
            let _ = h.await;
        }
    }
}

impl<P: Send + Sync + 'static> Drop for SubscriberSet<P> {
    fn drop(&mut self) {
        self.subscription.take();
        self.channels.write().clear();
    }
}

fn fan_out<P>(channels: &[SubscriberChannel<P>], ev: Event<'_, P>)
where
    P: Clone + Send + Sync + 'static,
{
    let mut item: Option<Arc<Published<P>>> = None;

    for channel in channels {
        if !channel.sub.accepts(ev.topic) {
            continue;
        }
        let item = item.get_or_insert_with(|| {
            Arc::new(Published {
                topic: ev.topic.clone(),
                payload: ev.payload.clone(),
            })
        });

        let reason = match channel.sender.try_send(Arc::clone(item)) {
            Ok(()) => continue,
            Err(mpsc::error::TrySendError::Full(_)) => "full",
            Err(mpsc::error::TrySendError::Closed(_)) => "closed",
        };
        channel.stats.dropped.fetch_add(1, Ordering::Relaxed);
        warn!(
            subscriber = channel.sub.name(),
            topic = %ev.topic,
            reason,
            "subscriber overflow: emission dropped"
        );
    }
}
