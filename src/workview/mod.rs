//! Workview state machines driven by the mapping bus.
//!
//! - [`EditTracker`] which rules have open editors; navigation guard
//! - [`RuleView`] expand / edit flags of a single rule row
//! - [`request_order`] list reordering request
//!
//! Each container registers on mount and releases its handlers on drop.

mod edit_tracker;
mod rule_view;

pub use edit_tracker::{EditTracker, Navigation};
pub use rule_view::{ExpandOutcome, RuleView, request_order};
