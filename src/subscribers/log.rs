//! # LogWriter: message logger
//!
//! A minimal subscriber that logs every [`Message`] through `tracing` at `info`.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [toggle] id=All expanded=true
//! [edit-open] id=person
//! [edit-unchanged] id=person
//! [reload] mode=Full
//! [order] from=2 to=0 reload=true
//! [discard-all]
//! ```

use async_trait::async_trait;
use tracing::info;

use crate::messages::Message;
use crate::subscribers::{Published, Subscribe};

/// Message writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe<Message> for LogWriter {
    async fn on_event(&self, ev: &Published<Message>) {
        match &ev.payload {
            Message::RuleViewToggle(t) => info!("[toggle] id={:?} expanded={}", t.id, t.expanded),
            Message::RuleViewChange(r) => info!("[edit-open] id={}", r.id),
            Message::RuleViewUnchanged(r) => info!("[edit-unchanged] id={}", r.id),
            Message::RuleViewClose(r) => info!("[edit-close] id={}", r.id),
            Message::RuleViewDiscardAll => info!("[discard-all]"),
            Message::RuleRequestOrder(o) => {
                info!("[order] from={} to={} reload={}", o.from_pos, o.to_pos, o.reload)
            }
            Message::Reload(r) => info!("[reload] mode={r:?}"),
            Message::ToggleVisibility(v) => info!("[navigation] visible={:?}", v.visible),
            Message::MappingCreate(c) => info!(
                "[create] type={:?} new_rule={:?} parent={:?}",
                c.rule_type, c.new_rule_id, c.parent_id
            ),
            Message::ShowSuggestions => info!("[suggestions]"),
            Message::RuleIdCreate(c) => info!("[create-id] type={:?}", c.rule_type),
            Message::SuggestionsProgress(p) => {
                info!("[suggestions-progress] {}% {}", p.progress_number, p.last_update)
            }
            Message::ButtonRemoveClick(r) => {
                info!("[remove] id={} type={:?} parent={:?}", r.id, r.rule_type, r.parent)
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
