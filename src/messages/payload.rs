//! # Payload records agreed per topic.
//!
//! Field names follow the camelCase JSON shapes the containers exchange, so a
//! raw payload can be decoded with [`Message::from_json`](crate::Message::from_json).
//!
//! ## Example
//! ```rust
//! use mappingbus::{RuleId, ToggleRule, ToggleTarget};
//!
//! let toggle: ToggleRule = serde_json::from_str(r#"{"expanded":true,"id":true}"#).unwrap();
//! assert_eq!(toggle.id, ToggleTarget::All);
//!
//! let one: ToggleRule = serde_json::from_str(r#"{"expanded":false,"id":"person"}"#).unwrap();
//! assert_eq!(one.id, ToggleTarget::Rule(RuleId::from("person")));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a mapping rule.
///
/// Rules are named by the mapping service; the numeric form is used for
/// transient views, where `0` stands for the draft of a rule being created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleId {
    Index(u64),
    Name(String),
}

impl RuleId {
    /// The draft (create form) rule.
    pub const DRAFT: RuleId = RuleId::Index(0);

    #[inline]
    pub fn is_draft(&self) -> bool {
        *self == Self::DRAFT
    }
}

impl Default for RuleId {
    fn default() -> Self {
        Self::DRAFT
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleId::Index(n) => write!(f, "{n}"),
            RuleId::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for RuleId {
    fn from(name: &str) -> Self {
        RuleId::Name(name.to_string())
    }
}

impl From<String> for RuleId {
    fn from(name: String) -> Self {
        RuleId::Name(name)
    }
}

impl From<u64> for RuleId {
    fn from(n: u64) -> Self {
        RuleId::Index(n)
    }
}

/// Kind of mapping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleType {
    Root,
    Object,
    Direct,
    Complex,
    Uri,
    ComplexUri,
}

impl RuleType {
    /// Root and object rules contain child rules; the rest map values.
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(self, RuleType::Root | RuleType::Object)
    }
}

/// Payload naming a single rule (`{ id }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRef {
    #[serde(default)]
    pub id: RuleId,
}

impl RuleRef {
    pub fn new(id: impl Into<RuleId>) -> Self {
        Self { id: id.into() }
    }
}

/// Which rows a toggle applies to: every row (`true` on the wire) or one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ToggleTargetRepr", into = "ToggleTargetRepr")]
pub enum ToggleTarget {
    All,
    Rule(RuleId),
}

impl ToggleTarget {
    /// Whether the toggle concerns the rule `id`.
    pub fn matches(&self, id: &RuleId) -> bool {
        match self {
            ToggleTarget::All => true,
            ToggleTarget::Rule(target) => target == id,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ToggleTargetRepr {
    Flag(bool),
    Rule(RuleId),
}

impl TryFrom<ToggleTargetRepr> for ToggleTarget {
    type Error = &'static str;

    fn try_from(repr: ToggleTargetRepr) -> Result<Self, Self::Error> {
        match repr {
            ToggleTargetRepr::Flag(true) => Ok(ToggleTarget::All),
            ToggleTargetRepr::Flag(false) => Err("toggle target `false` selects no rule"),
            ToggleTargetRepr::Rule(id) => Ok(ToggleTarget::Rule(id)),
        }
    }
}

impl From<ToggleTarget> for ToggleTargetRepr {
    fn from(target: ToggleTarget) -> Self {
        match target {
            ToggleTarget::All => ToggleTargetRepr::Flag(true),
            ToggleTarget::Rule(id) => ToggleTargetRepr::Rule(id),
        }
    }
}

/// `ruleView.toggle` payload (`{ expanded, id }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleRule {
    pub expanded: bool,
    pub id: ToggleTarget,
}

/// `rule.requestOrder` payload (`{ fromPos, toPos, reload }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub from_pos: usize,
    pub to_pos: usize,
    #[serde(default)]
    pub reload: bool,
}

impl OrderRequest {
    /// A move onto the same position changes nothing.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.from_pos == self.to_pos
    }
}

/// Opaque handle for a completion callback attached to a reload request.
///
/// Callbacks do not cross the payload boundary; the requester keeps the
/// closure and matches the ticket when the reload finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReloadTicket(pub u64);

/// `reload` payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<ReloadRepr>", into = "Option<ReloadRepr>")]
pub enum Reload {
    /// Reload including the navigation tree (`true`).
    Full,
    /// Reload the current view only (no payload).
    #[default]
    Quiet,
    /// Reload and report completion (`{ onFinish }`).
    WithCallback(ReloadTicket),
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum ReloadRepr {
    Flag(bool),
    Callback {
        #[serde(rename = "onFinish")]
        on_finish: ReloadTicket,
    },
}

impl From<Option<ReloadRepr>> for Reload {
    fn from(repr: Option<ReloadRepr>) -> Self {
        match repr {
            Some(ReloadRepr::Flag(true)) => Reload::Full,
            Some(ReloadRepr::Flag(false)) | None => Reload::Quiet,
            Some(ReloadRepr::Callback { on_finish }) => Reload::WithCallback(on_finish),
        }
    }
}

impl From<Reload> for Option<ReloadRepr> {
    fn from(reload: Reload) -> Self {
        match reload {
            Reload::Full => Some(ReloadRepr::Flag(true)),
            Reload::Quiet => None,
            Reload::WithCallback(on_finish) => Some(ReloadRepr::Callback { on_finish }),
        }
    }
}

/// `toggleVisibility` payload; `None` flips the current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// `mapping.create` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMapping {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_rule_id: Option<RuleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<RuleId>,
}

/// `ruleId.create` payload (`{ type }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRule {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
}

/// `rule.suggestions.progress` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsProgress {
    /// Percentage in `0..=100`.
    pub progress_number: u8,
    pub last_update: String,
}

impl SuggestionsProgress {
    /// Progress after `count` of `total` suggested rules were saved.
    pub fn saved(count: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            ((count.min(total) as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            progress_number: percent,
            last_update: format!("Saved {count} of {total} rules."),
        }
    }
}

/// `button.removeClick` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveClick {
    pub id: RuleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<RuleId>,
}
