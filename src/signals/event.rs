//! Wire types carried by the signal bus
//!
//! A `Trigger` travels from the runner to an external target's watcher and
//! asks it to perform an action. A `Signal` travels the other way and
//! announces an outcome. Both carry the opaque payload unmodified.

use std::fmt;
use std::time::SystemTime;

use crate::queue::ActionPayload;
use crate::signals::key::SignalKey;

/// Identifier an external actor registers itself under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ActorId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Opaque handle to a registered target, obtained from the bus registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetHandle(pub(crate) u64);

/// Completion announcement delivered to matching subscriptions
#[derive(Clone)]
pub struct Signal {
    pub key: SignalKey,
    pub target: TargetHandle,
    pub payload: Option<ActionPayload>,
    pub timestamp: SystemTime,
}

impl Signal {
    pub fn new(target: TargetHandle, key: SignalKey, payload: Option<ActionPayload>) -> Self {
        Self {
            key,
            target,
            payload,
            timestamp: SystemTime::now(),
        }
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("key", &self.key)
            .field("target", &self.target)
            .field("payload", &self.payload.as_ref().map(|_| "<opaque>"))
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/// Action request delivered to a target's trigger watchers
#[derive(Clone)]
pub struct Trigger {
    pub key: SignalKey,
    pub target: TargetHandle,
    pub payload: Option<ActionPayload>,
    pub timestamp: SystemTime,
}

impl Trigger {
    pub fn new(target: TargetHandle, key: SignalKey, payload: Option<ActionPayload>) -> Self {
        Self {
            key,
            target,
            payload,
            timestamp: SystemTime::now(),
        }
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("key", &self.key)
            .field("target", &self.target)
            .field("payload", &self.payload.as_ref().map(|_| "<opaque>"))
            .field("timestamp", &self.timestamp)
            .finish()
    }
}
