//! # Typed messages of the mapping editor.
//!
//! [`Message`] closes the topic space: one variant per topic in
//! [`topics`](crate::messages::topics), each carrying the payload record its
//! producers and consumers agree on. It implements [`Routed`], so
//! [`EventBus::publish`](crate::EventBus::publish) picks the topic by itself.
//!
//! ## Example
//! ```rust
//! use mappingbus::{Event, Handler, MappingBus, Message, RuleId, topics};
//!
//! let bus = MappingBus::new();
//! bus.on(topics::RULE_VIEW_CHANGE, &Handler::from_fn("tracker", |ev: Event<'_, Message>| {
//!     if let Message::RuleViewChange(r) = ev.payload {
//!         assert_eq!(r.id, RuleId::from("person"));
//!     }
//! }));
//!
//! let delivery = bus.publish(Message::change("person"));
//! assert_eq!(delivery.invoked, 1);
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::bus::{Routed, Topic};
use crate::error::PayloadError;
use crate::messages::payload::{
    CreateMapping, CreateRule, OrderRequest, Reload, RemoveClick, RuleId, RuleRef,
    SuggestionsProgress, ToggleRule, ToggleTarget, Visibility,
};
use crate::messages::topics;

/// A payload together with the topic it travels on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    RuleViewToggle(ToggleRule),
    RuleViewChange(RuleRef),
    RuleViewUnchanged(RuleRef),
    RuleViewClose(RuleRef),
    RuleViewDiscardAll,
    RuleRequestOrder(OrderRequest),
    Reload(Reload),
    ToggleVisibility(Visibility),
    MappingCreate(CreateMapping),
    ShowSuggestions,
    RuleIdCreate(CreateRule),
    SuggestionsProgress(SuggestionsProgress),
    ButtonRemoveClick(RemoveClick),
}

impl Message {
    /// Topic name of this message.
    pub fn name(&self) -> &'static str {
        match self {
            Message::RuleViewToggle(_) => topics::RULE_VIEW_TOGGLE,
            Message::RuleViewChange(_) => topics::RULE_VIEW_CHANGE,
            Message::RuleViewUnchanged(_) => topics::RULE_VIEW_UNCHANGED,
            Message::RuleViewClose(_) => topics::RULE_VIEW_CLOSE,
            Message::RuleViewDiscardAll => topics::RULE_VIEW_DISCARD_ALL,
            Message::RuleRequestOrder(_) => topics::RULE_REQUEST_ORDER,
            Message::Reload(_) => topics::RELOAD,
            Message::ToggleVisibility(_) => topics::TOGGLE_VISIBILITY,
            Message::MappingCreate(_) => topics::MAPPING_CREATE,
            Message::ShowSuggestions => topics::SHOW_SUGGESTIONS,
            Message::RuleIdCreate(_) => topics::RULE_ID_CREATE,
            Message::SuggestionsProgress(_) => topics::SUGGESTIONS_PROGRESS,
            Message::ButtonRemoveClick(_) => topics::BUTTON_REMOVE_CLICK,
        }
    }

    /// `ruleView.change { id }`.
    pub fn change(id: impl Into<RuleId>) -> Self {
        Message::RuleViewChange(RuleRef::new(id))
    }

    /// `ruleView.unchanged { id }`.
    pub fn unchanged(id: impl Into<RuleId>) -> Self {
        Message::RuleViewUnchanged(RuleRef::new(id))
    }

    /// `ruleView.close { id }`.
    pub fn close(id: impl Into<RuleId>) -> Self {
        Message::RuleViewClose(RuleRef::new(id))
    }

    /// `ruleView.toggle { expanded, id }`.
    pub fn toggle(expanded: bool, id: ToggleTarget) -> Self {
        Message::RuleViewToggle(ToggleRule { expanded, id })
    }

    /// `reload true`.
    pub fn reload() -> Self {
        Message::Reload(Reload::Full)
    }

    /// Decodes a raw payload received on `topic`.
    ///
    /// Topics without payload ignore `value`. For `{ id }` and
    /// `toggleVisibility` payloads a missing value (`null`) means the default record.
    pub fn from_json(topic: &str, value: Value) -> Result<Self, PayloadError> {
        let msg = match topic {
            topics::RULE_VIEW_TOGGLE => Message::RuleViewToggle(decode(topics::RULE_VIEW_TOGGLE, value)?),
            topics::RULE_VIEW_CHANGE => Message::RuleViewChange(decode_or_default(topics::RULE_VIEW_CHANGE, value)?),
            topics::RULE_VIEW_UNCHANGED => {
                Message::RuleViewUnchanged(decode_or_default(topics::RULE_VIEW_UNCHANGED, value)?)
            }
            topics::RULE_VIEW_CLOSE => Message::RuleViewClose(decode_or_default(topics::RULE_VIEW_CLOSE, value)?),
            topics::RULE_VIEW_DISCARD_ALL => Message::RuleViewDiscardAll,
            topics::RULE_REQUEST_ORDER => Message::RuleRequestOrder(decode(topics::RULE_REQUEST_ORDER, value)?),
            topics::RELOAD => Message::Reload(decode(topics::RELOAD, value)?),
            topics::TOGGLE_VISIBILITY => {
                Message::ToggleVisibility(decode_or_default(topics::TOGGLE_VISIBILITY, value)?)
            }
            topics::MAPPING_CREATE => Message::MappingCreate(decode(topics::MAPPING_CREATE, value)?),
            topics::SHOW_SUGGESTIONS => Message::ShowSuggestions,
            topics::RULE_ID_CREATE => Message::RuleIdCreate(decode(topics::RULE_ID_CREATE, value)?),
            topics::SUGGESTIONS_PROGRESS => {
                Message::SuggestionsProgress(decode(topics::SUGGESTIONS_PROGRESS, value)?)
            }
            topics::BUTTON_REMOVE_CLICK => {
                Message::ButtonRemoveClick(decode(topics::BUTTON_REMOVE_CLICK, value)?)
            }
            other => {
                return Err(PayloadError::UnknownTopic {
                    topic: other.to_string(),
                });
            }
        };
        Ok(msg)
    }

    /// Encodes the payload in its wire shape (`null` for topics without payload).
    pub fn payload_json(&self) -> Value {
        match self {
            Message::RuleViewToggle(p) => encode(p),
            Message::RuleViewChange(p) | Message::RuleViewUnchanged(p) | Message::RuleViewClose(p) => {
                encode(p)
            }
            Message::RuleViewDiscardAll | Message::ShowSuggestions => Value::Null,
            Message::RuleRequestOrder(p) => encode(p),
            Message::Reload(p) => encode(p),
            Message::ToggleVisibility(p) => encode(p),
            Message::MappingCreate(p) => encode(p),
            Message::RuleIdCreate(p) => encode(p),
            Message::SuggestionsProgress(p) => encode(p),
            Message::ButtonRemoveClick(p) => encode(p),
        }
    }

    /// The rule this message is about, for the `{ id }` shaped topics.
    pub fn rule_id(&self) -> Option<&RuleId> {
        match self {
            Message::RuleViewChange(r) | Message::RuleViewUnchanged(r) | Message::RuleViewClose(r) => {
                Some(&r.id)
            }
            Message::ButtonRemoveClick(r) => Some(&r.id),
            _ => None,
        }
    }
}

impl Routed for Message {
    fn topic(&self) -> Topic {
        Topic::from(self.name())
    }
}

fn decode<T: DeserializeOwned>(topic: &'static str, value: Value) -> Result<T, PayloadError> {
    serde_json::from_value(value).map_err(|source| PayloadError::Invalid { topic, source })
}

fn decode_or_default<T: DeserializeOwned + Default>(
    topic: &'static str,
    value: Value,
) -> Result<T, PayloadError> {
    if value.is_null() {
        return Ok(T::default());
    }
    decode(topic, value)
}

fn encode<T: Serialize>(payload: &T) -> Value {
    serde_json::to_value(payload).unwrap_or_default()
}
