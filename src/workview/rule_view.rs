//! # Per-rule row state.
//!
//! [`RuleView`] holds the local state of one rule row in the mapping list:
//! whether its details are expanded and whether its editor is open. Both flags
//! follow bus traffic so sibling containers can open, close or collapse rows
//! without references to them.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::bus::{Delivery, Event, Handler, SubscriptionGroup};
use crate::messages::{MappingBus, Message, OrderRequest, RuleId, RuleType, topics};

/// Result of [`RuleView::toggle_expand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// The row is now expanded (`true`) or collapsed (`false`).
    Expanded(bool),
    /// The row has an open editor; the user must decide on discarding first.
    NeedsDiscard,
}

#[derive(Debug, Default, Clone, Copy)]
struct RowState {
    expanded: bool,
    editing: bool,
}

/// Bus-driven state of one rule row.
pub struct RuleView {
    id: RuleId,
    rule_type: RuleType,
    bus: MappingBus,
    state: Arc<Mutex<RowState>>,
    _subs: SubscriptionGroup<Message>,
}

impl RuleView {
    /// Registers the row's handlers on `bus`.
    pub fn mount(bus: &MappingBus, id: impl Into<RuleId>, rule_type: RuleType) -> Self {
        let id = id.into();
        let state = Arc::new(Mutex::new(RowState::default()));
        let mut subs = SubscriptionGroup::new();

        let (row, st) = (id.clone(), Arc::clone(&state));
        subs.push(bus.subscribe(
            topics::RULE_VIEW_TOGGLE,
            Handler::from_fn("rule-view.toggle", move |ev: Event<'_, Message>| {
                if let Message::RuleViewToggle(t) = ev.payload {
                    if t.id.matches(&row) {
                        st.lock().expanded = t.expanded;
                    }
                }
            }),
        ));

        let (row, st) = (id.clone(), Arc::clone(&state));
        subs.push(bus.subscribe(
            topics::RULE_VIEW_CHANGE,
            Handler::from_fn("rule-view.open", move |ev: Event<'_, Message>| {
                if ev.payload.rule_id() == Some(&row) {
                    st.lock().editing = true;
                }
            }),
        ));

        let (row, st) = (id.clone(), Arc::clone(&state));
        subs.push(bus.subscribe(
            topics::RULE_VIEW_CLOSE,
            Handler::from_fn("rule-view.close", move |ev: Event<'_, Message>| {
                if ev.payload.rule_id() == Some(&row) {
                    st.lock().editing = false;
                }
            }),
        ));

        let st = Arc::clone(&state);
        subs.push(bus.subscribe(
            topics::RULE_VIEW_DISCARD_ALL,
            Handler::from_fn("rule-view.discard", move |_| {
                st.lock().editing = false;
            }),
        ));

        Self {
            id,
            rule_type,
            bus: bus.clone(),
            state,
            _subs: subs,
        }
    }

    pub fn id(&self) -> &RuleId {
        &self.id
    }

    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    pub fn is_expanded(&self) -> bool {
        self.state.lock().expanded
    }

    pub fn is_editing(&self) -> bool {
        self.state.lock().editing
    }

    /// Flips the expanded flag unless an editor is open.
    pub fn toggle_expand(&self) -> ExpandOutcome {
        let mut st = self.state.lock();
        if st.editing {
            return ExpandOutcome::NeedsDiscard;
        }
        st.expanded = !st.expanded;
        ExpandOutcome::Expanded(st.expanded)
    }

    /// Opens the editor of this rule (`ruleView.change`).
    pub fn open_editor(&self) -> Delivery {
        self.bus.publish(Message::change(self.id.clone()))
    }

    /// Leaves the editor without saving (`ruleView.unchanged`, then `ruleView.close`).
    pub fn close_editor(&self) {
        self.bus.publish(Message::unchanged(self.id.clone()));
        self.bus.publish(Message::close(self.id.clone()));
    }
}

/// Asks the list to move a rule; a move onto the same position sends nothing.
pub fn request_order(bus: &MappingBus, from_pos: usize, to_pos: usize) -> Option<Delivery> {
    let req = OrderRequest {
        from_pos,
        to_pos,
        reload: true,
    };
    if req.is_noop() {
        return None;
    }
    Some(bus.publish(Message::RuleRequestOrder(req)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ToggleTarget;
    use crate::workview::EditTracker;

    #[test]
    fn test_toggle_targets_row_or_all() {
        let bus = MappingBus::new();
        let a = RuleView::mount(&bus, "a", RuleType::Direct);
        let b = RuleView::mount(&bus, "b", RuleType::Object);

        bus.publish(Message::toggle(true, ToggleTarget::Rule("a".into())));
        assert!(a.is_expanded());
        assert!(!b.is_expanded());

        bus.publish(Message::toggle(true, ToggleTarget::All));
        assert!(b.is_expanded());

        bus.publish(Message::toggle(false, ToggleTarget::All));
        assert!(!a.is_expanded() && !b.is_expanded());
    }

    #[test]
    fn test_editor_lifecycle_with_tracker() {
        let bus = MappingBus::new();
        let tracker = EditTracker::mount(&bus, "root");
        let row = RuleView::mount(&bus, "a", RuleType::Direct);

        assert_eq!(row.open_editor().invoked, 2);
        assert!(row.is_editing());
        assert!(tracker.is_editing(&"a".into()));
        assert_eq!(row.toggle_expand(), ExpandOutcome::NeedsDiscard);

        row.close_editor();
        assert!(!row.is_editing());
        assert!(!tracker.has_open_edits());
        assert_eq!(row.toggle_expand(), ExpandOutcome::Expanded(true));
    }

    #[test]
    fn test_discard_all_closes_every_editor() {
        let bus = MappingBus::new();
        let a = RuleView::mount(&bus, "a", RuleType::Direct);
        let b = RuleView::mount(&bus, 7_u64, RuleType::Complex);
        a.open_editor();
        b.open_editor();

        bus.publish(Message::RuleViewDiscardAll);
        assert!(!a.is_editing());
        assert!(!b.is_editing());
    }

    #[test]
    fn test_request_order_skips_noop() {
        let bus = MappingBus::new();
        assert!(request_order(&bus, 2, 2).is_none());
        assert_eq!(request_order(&bus, 2, 0).map(|d| d.invoked), Some(0));
    }
}
