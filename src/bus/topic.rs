//! # Topic keys.
//!
//! A [`Topic`] is an opaque string identifier. The bus never interprets it
//! beyond one special value, [`Topic::WILDCARD`] (`"*"`), whose handlers see
//! every emission.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Name of a bus channel.
///
/// Cheap to clone (`Arc<str>` inside). Compares and hashes by content.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic(Arc<str>);

impl Topic {
    /// Literal name of the wildcard topic.
    pub const WILDCARD: &'static str = "*";

    /// Creates a topic from any string.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// The wildcard topic (`"*"`).
    pub fn wildcard() -> Self {
        Self::new(Self::WILDCARD)
    }

    /// Returns the topic name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the wildcard topic.
    #[inline]
    pub fn is_wildcard(&self) -> bool {
        &*self.0 == Self::WILDCARD
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Topic({:?})", &*self.0)
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Topic {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&Topic> for Topic {
    fn from(topic: &Topic) -> Self {
        topic.clone()
    }
}

impl Borrow<str> for Topic {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Topic {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Topic {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_wildcard_detection() {
        assert!(Topic::wildcard().is_wildcard());
        assert!(Topic::from("*").is_wildcard());
        assert!(!Topic::from("reload").is_wildcard());
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Topic::from("ruleView.toggle"), 1);
        assert_eq!(map.get("ruleView.toggle"), Some(&1));
        assert_eq!(Topic::from("reload"), "reload");
    }
}
