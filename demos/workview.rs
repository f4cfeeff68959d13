//! # Workview Example
//!
//! Drives a small mapping workview through the bus:
//! - a root [`EditTracker`] and two rule rows
//! - a custom async subscriber counting reloads
//! - the built-in [`LogWriter`] printing every message
//!
//! ## Run
//! ```bash
//! cargo run --example workview --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use mappingbus::workview::{EditTracker, Navigation, RuleView, request_order};
use mappingbus::{
    LogWriter, MappingBus, Message, Published, Subscribe, SubscriberSet, Topic, ToggleTarget,
    topics,
};
use mappingbus::{Reload, RuleType};

struct ReloadCounter {
    full: AtomicU64,
    quiet: AtomicU64,
}

impl ReloadCounter {
    fn new() -> Self {
        Self {
            full: AtomicU64::new(0),
            quiet: AtomicU64::new(0),
        }
    }

    fn print_stats(&self) {
        println!();
        println!("Reloads:");
        println!(" ├─► Full:  {}", self.full.load(Ordering::Relaxed));
        println!(" └─► Quiet: {}", self.quiet.load(Ordering::Relaxed));
    }
}

#[async_trait::async_trait]
impl Subscribe<Message> for ReloadCounter {
    async fn on_event(&self, ev: &Published<Message>) {
        match ev.payload {
            Message::Reload(Reload::Full) => {
                self.full.fetch_add(1, Ordering::Relaxed);
            }
            Message::Reload(_) => {
                self.quiet.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    fn accepts(&self, topic: &Topic) -> bool {
        topic == topics::RELOAD
    }

    fn name(&self) -> &'static str {
        "reload-counter"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let bus = MappingBus::new();
    let counter = Arc::new(ReloadCounter::new());
    let subs = vec![
        Arc::new(LogWriter::new()) as Arc<dyn Subscribe<Message>>,
        Arc::clone(&counter) as Arc<dyn Subscribe<Message>>,
    ];
    let set = SubscriberSet::attach(&bus, subs);

    let tracker = EditTracker::mount(&bus, "root");
    let name = RuleView::mount(&bus, "name", RuleType::Direct);
    let address = RuleView::mount(&bus, "address", RuleType::Object);

    bus.publish(Message::toggle(true, ToggleTarget::All));
    name.open_editor();

    match tracker.navigate("address") {
        Navigation::AskForDiscard(target) => {
            println!("open edits block navigation to {target}, discarding");
            tracker.discard_changes();
        }
        other => println!("navigation: {other:?}"),
    }
    println!("current rule: {}", tracker.current_rule());
    println!("address expanded: {}", address.is_expanded());

    request_order(&bus, 1, 0);
    bus.publish(Message::Reload(Reload::Full));
    bus.publish(Message::reload());

    // let the workers drain their queues
    tokio::time::sleep(Duration::from_millis(50)).await;
    set.shutdown().await;
    counter.print_stats();
}
