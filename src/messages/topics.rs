//! Topic names shared by the mapping editor containers.
//!
//! These strings are the integration contract between independently written
//! containers and must stay byte-for-byte stable.

/// Expand/collapse one rule row or all of them.
pub const RULE_VIEW_TOGGLE: &str = "ruleView.toggle";
/// A rule entered edit mode.
pub const RULE_VIEW_CHANGE: &str = "ruleView.change";
/// A rule left edit mode without pending changes.
pub const RULE_VIEW_UNCHANGED: &str = "ruleView.unchanged";
/// A rule editor was closed.
pub const RULE_VIEW_CLOSE: &str = "ruleView.close";
/// Every open editor must drop its changes.
pub const RULE_VIEW_DISCARD_ALL: &str = "ruleView.discardAll";
/// Move a rule to another position in its parent.
pub const RULE_REQUEST_ORDER: &str = "rule.requestOrder";
/// Reload rule data from the mapping service.
pub const RELOAD: &str = "reload";
/// Show/hide the navigation tree.
pub const TOGGLE_VISIBILITY: &str = "toggleVisibility";
/// Open the create form for a new mapping rule.
pub const MAPPING_CREATE: &str = "mapping.create";
/// Open the suggestion list.
pub const SHOW_SUGGESTIONS: &str = "showSuggestions";
/// A new rule of a given type is being created.
pub const RULE_ID_CREATE: &str = "ruleId.create";
/// Progress of saving accepted suggestions.
pub const SUGGESTIONS_PROGRESS: &str = "rule.suggestions.progress";
/// The remove button of a rule was clicked.
pub const BUTTON_REMOVE_CLICK: &str = "button.removeClick";

/// Every topic of the contract.
pub const ALL: [&str; 13] = [
    RULE_VIEW_TOGGLE,
    RULE_VIEW_CHANGE,
    RULE_VIEW_UNCHANGED,
    RULE_VIEW_CLOSE,
    RULE_VIEW_DISCARD_ALL,
    RULE_REQUEST_ORDER,
    RELOAD,
    TOGGLE_VISIBILITY,
    MAPPING_CREATE,
    SHOW_SUGGESTIONS,
    RULE_ID_CREATE,
    SUGGESTIONS_PROGRESS,
    BUTTON_REMOVE_CLICK,
];
