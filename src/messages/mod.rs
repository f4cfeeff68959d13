//! Mapping editor message contract.
//!
//! - [`topics`] topic names, verbatim
//! - [`Message`] closed enum, one variant per topic
//! - payload records ([`RuleRef`], [`ToggleRule`], [`OrderRequest`], ...)
//! - [`bus`] the process-wide [`MappingBus`]

mod message;
mod payload;
pub mod topics;

use std::sync::LazyLock;

use crate::bus::EventBus;

pub use message::Message;
pub use payload::{
    CreateMapping, CreateRule, OrderRequest, Reload, ReloadTicket, RemoveClick, RuleId, RuleRef,
    RuleType, SuggestionsProgress, ToggleRule, ToggleTarget, Visibility,
};

/// Event bus carrying mapping editor [`Message`]s.
pub type MappingBus = EventBus<Message>;

static BUS: LazyLock<MappingBus> = LazyLock::new(MappingBus::new);

/// The process-wide mapping bus.
///
/// Created on first use with [`BusConfig::default`](crate::BusConfig::default)
/// and alive until the process exits. Containers that need isolation (tests,
/// embedded editors) can build their own [`MappingBus`] instead.
pub fn bus() -> &'static MappingBus {
    &BUS
}
