//! Error types used by the bus, its handlers and the message boundary.
//!
//! This module defines three enums:
//!
//! - [`BusError`]: failures observed by a caller of [`EventBus::emit`](crate::EventBus::emit).
//! - [`HandlerError`]: failures raised by individual handlers.
//! - [`PayloadError`]: failures decoding raw JSON into a typed [`Message`](crate::Message).
//!
//! All of them provide `as_label` (stable snake_case for logs) and `as_message`.

use thiserror::Error;

use crate::bus::Topic;

/// # Errors surfaced by the bus after an emission pass.
///
/// The bus never aborts a pass early; this error only summarizes
/// what went wrong once every handler had its turn.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BusError {
    /// One or more handlers failed while the rest of the pass still ran.
    #[error("{} handler(s) failed on topic {topic}", .failures.len())]
    HandlersFailed {
        /// Topic that was emitted.
        topic: Topic,
        /// Every failure collected during the pass, in invocation order.
        failures: Vec<HandlerFailure>,
    },
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use mappingbus::{BusError, Topic};
    ///
    /// let err = BusError::HandlersFailed { topic: Topic::new("reload"), failures: vec![] };
    /// assert_eq!(err.as_label(), "bus_handlers_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::HandlersFailed { .. } => "bus_handlers_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BusError::HandlersFailed { topic, failures } => {
                let reasons: Vec<String> = failures.iter().map(|f| f.error.as_message()).collect();
                format!("topic={topic} failed={reasons:?}")
            }
        }
    }
}

/// A single failed handler invocation.
#[derive(Debug)]
pub struct HandlerFailure {
    /// Topic the handler was registered under (`*` for wildcard handlers).
    pub registered_on: Topic,
    /// Zero-based position of the handler in the emission pass.
    pub position: usize,
    /// What went wrong.
    pub error: HandlerError,
}

/// # Errors produced by handler invocations.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler returned an error.
    #[error("handler failed: {reason}")]
    Failed {
        /// The underlying error message.
        reason: String,
    },

    /// The handler panicked; the panic was caught by the bus.
    #[error("handler panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    pub fn fail(reason: impl Into<String>) -> Self {
        HandlerError::Failed {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use mappingbus::HandlerError;
    ///
    /// assert_eq!(HandlerError::fail("boom").as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Panicked { .. } => "handler_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { reason } => format!("error: {reason}"),
            HandlerError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Builds a [`HandlerError::Panicked`] from a caught panic payload.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        HandlerError::Panicked {
            info: panic_message(payload),
        }
    }
}

/// # Errors produced when decoding raw payloads into typed messages.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PayloadError {
    /// The topic is not part of the mapping editor contract.
    #[error("unknown topic {topic:?}")]
    UnknownTopic {
        /// The offending topic name.
        topic: String,
    },

    /// The payload does not match the shape agreed for the topic.
    #[error("invalid payload for {topic}: {source}")]
    Invalid {
        /// Topic whose payload failed to decode.
        topic: &'static str,
        /// The serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl PayloadError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            PayloadError::UnknownTopic { .. } => "payload_unknown_topic",
            PayloadError::Invalid { .. } => "payload_invalid",
        }
    }
}

/// Renders a panic payload (`&str` / `String`) as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let s: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");

        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");

        let other: Box<dyn std::any::Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }

    #[test]
    fn test_handlers_failed_message_lists_reasons() {
        let err = BusError::HandlersFailed {
            topic: Topic::new("reload"),
            failures: vec![HandlerFailure {
                registered_on: Topic::new("reload"),
                position: 0,
                error: HandlerError::fail("boom"),
            }],
        };
        assert_eq!(err.to_string(), "1 handler(s) failed on topic reload");
        assert!(err.as_message().contains("error: boom"));
    }
}
