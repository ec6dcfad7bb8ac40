//! Hierarchical signal keys
//!
//! Keys are dot-separated paths ("combat.attack.heavy"). A subscription can
//! ask for an exact key or for the key together with everything beneath it,
//! selected by [`MatchMode`]. An empty key counts as unset.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How an incoming signal key is compared against a subscribed key
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
)]
pub enum MatchMode {
    /// The signal key must equal the subscribed key
    #[default]
    Exact,
    /// The signal key may also be any key strictly beneath the subscribed one
    WithDescendants,
}

/// Opaque hierarchical identifier for triggers and completion signals
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SignalKey(String);

impl SignalKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The unset key
    pub fn none() -> Self {
        Self(String::new())
    }

    /// An empty key is unset and never matches anything
    pub fn is_set(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `self` lies strictly beneath `other` in the hierarchy
    pub fn is_descendant_of(&self, other: &SignalKey) -> bool {
        other.is_set()
            && self.0.len() > other.0.len()
            && self.0.starts_with(other.0.as_str())
            && self.0.as_bytes()[other.0.len()] == b'.'
    }

    /// Match an incoming key (`self`) against a subscribed key
    pub fn matches(&self, subscribed: &SignalKey, mode: MatchMode) -> bool {
        if !self.is_set() || !subscribed.is_set() {
            return false;
        }
        match mode {
            MatchMode::Exact => self == subscribed,
            MatchMode::WithDescendants => self == subscribed || self.is_descendant_of(subscribed),
        }
    }
}

impl fmt::Display for SignalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SignalKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for SignalKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}
