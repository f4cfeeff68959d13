//! # Edit tracking for the mapping workview.
//!
//! [`EditTracker`] is the root container's view of which rules are in edit
//! mode. It listens on the bus and decides whether navigating to another rule
//! can happen right away or needs the user to discard open edits first.
//!
//! ## Transitions
//! ```text
//! ruleView.change    { id } ──► editing += id (if absent)
//! ruleView.unchanged { id } ──► editing -= id (if present)
//! ruleView.close     { id } ──► editing -= id (if present)
//! button.removeClick        ──► editing cleared
//!
//! navigate(target):
//!   target == current       ──► Stay
//!   editing is empty        ──► Switched(target)        (current = target)
//!   otherwise               ──► AskForDiscard(target)   (pending = target)
//!
//! discard_changes():
//!   draft (0) editing? ──► emit ruleView.unchanged { id: 0 }
//!   editing cleared, current = pending (if any), pending cleared
//!   emit ruleView.discardAll
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::bus::{Event, Handler, SubscriptionGroup};
use crate::messages::{MappingBus, Message, RuleId, topics};

/// Outcome of [`EditTracker::navigate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Target is already the current rule.
    Stay,
    /// No open edits; the current rule changed.
    Switched(RuleId),
    /// Open edits block navigation until [`EditTracker::discard_changes`] or
    /// [`EditTracker::cancel_discard`] is called.
    AskForDiscard(RuleId),
}

#[derive(Debug, Default)]
struct EditState {
    editing: Vec<RuleId>,
    current: RuleId,
    pending: Option<RuleId>,
}

/// Bus-driven edit-mode bookkeeping of the workview.
///
/// Unregisters its handlers when dropped.
pub struct EditTracker {
    bus: MappingBus,
    state: Arc<Mutex<EditState>>,
    _subs: SubscriptionGroup<Message>,
}

impl EditTracker {
    /// Registers the tracker on `bus` with `current` as the displayed rule.
    pub fn mount(bus: &MappingBus, current: impl Into<RuleId>) -> Self {
        let state = Arc::new(Mutex::new(EditState {
            current: current.into(),
            ..EditState::default()
        }));
        let mut subs = SubscriptionGroup::new();

        let open = Arc::clone(&state);
        subs.push(bus.subscribe(
            topics::RULE_VIEW_CHANGE,
            Handler::from_fn("edit-tracker.open", move |ev: Event<'_, Message>| {
                if let Some(id) = ev.payload.rule_id() {
                    let mut st = open.lock();
                    if !st.editing.contains(id) {
                        st.editing.push(id.clone());
                    }
                }
            }),
        ));

        let close = Handler::from_fn("edit-tracker.close", {
            let state = Arc::clone(&state);
            move |ev: Event<'_, Message>| {
                if let Some(id) = ev.payload.rule_id() {
                    state.lock().editing.retain(|e| e != id);
                }
            }
        });
        subs.push(bus.subscribe(topics::RULE_VIEW_UNCHANGED, close.clone()));
        subs.push(bus.subscribe(topics::RULE_VIEW_CLOSE, close));

        let remove = Arc::clone(&state);
        subs.push(bus.subscribe(
            topics::BUTTON_REMOVE_CLICK,
            Handler::from_fn("edit-tracker.remove", move |_| {
                remove.lock().editing.clear();
            }),
        ));

        Self {
            bus: bus.clone(),
            state,
            _subs: subs,
        }
    }

    /// Rules in edit mode, in the order they were opened.
    pub fn editing(&self) -> Vec<RuleId> {
        self.state.lock().editing.clone()
    }

    pub fn is_editing(&self, id: &RuleId) -> bool {
        self.state.lock().editing.contains(id)
    }

    /// Whether any editor is open.
    pub fn has_open_edits(&self) -> bool {
        !self.state.lock().editing.is_empty()
    }

    pub fn current_rule(&self) -> RuleId {
        self.state.lock().current.clone()
    }

    /// Navigation target waiting for a discard decision.
    pub fn pending_navigation(&self) -> Option<RuleId> {
        self.state.lock().pending.clone()
    }

    /// Requests to show `target` as the current container rule.
    pub fn navigate(&self, target: impl Into<RuleId>) -> Navigation {
        let target = target.into();
        let mut st = self.state.lock();
        if target == st.current {
            return Navigation::Stay;
        }
        if st.editing.is_empty() {
            st.current = target.clone();
            debug!(rule = %target, "navigated");
            return Navigation::Switched(target);
        }
        debug!(rule = %target, open = st.editing.len(), "navigation blocked by open edits");
        st.pending = Some(target.clone());
        Navigation::AskForDiscard(target)
    }

    /// Drops every open edit and completes a pending navigation.
    pub fn discard_changes(&self) {
        let draft_open = self.is_editing(&RuleId::DRAFT);
        if draft_open {
            self.bus.publish(Message::unchanged(RuleId::DRAFT));
        }
        {
            let mut st = self.state.lock();
            st.editing.clear();
            if let Some(target) = st.pending.take() {
                st.current = target;
            }
        }
        self.bus.publish(Message::RuleViewDiscardAll);
    }

    /// Keeps the open edits and forgets the pending navigation.
    pub fn cancel_discard(&self) {
        self.state.lock().pending = None;
    }
}
