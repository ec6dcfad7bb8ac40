//! Queue item data model
//!
//! A [`QueueItem`] is one unit of work: a named action identified by a
//! trigger key, optionally carrying the two completion keys a runner waits
//! on, a priority, and an opaque payload handed through to dispatch.
//!
//! Two items are the same logical work unit when their name, trigger key and
//! open flag match; priority, payload and task id never participate in
//! duplicate detection. The task id is a secondary, always-unique key for
//! direct lookup.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::signals::SignalKey;

/// Opaque user payload, passed through to the dispatch call unmodified
pub type ActionPayload = Arc<dyn Any + Send + Sync>;

/// Globally unique task identifier, assigned at construction and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(uuid::Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How an item's priority value is derived at enqueue time
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
pub enum QueueMode {
    /// Ascending by the caller-set priority; ties keep insertion order
    #[default]
    Priority,
    /// Insertion order: the queue assigns an incrementing counter
    Fifo,
    /// Reverse insertion order: the queue assigns a decrementing counter
    Filo,
}

/// Queue configuration, fixed at (or shortly after) construction
///
/// Changing the configuration after the first enqueue is undefined behaviour
/// at the contract level; it is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub mode: QueueMode,
    /// When true, an item whose key already exists in the queue is rejected
    pub ignore_duplicates: bool,
    /// Maximum number of items, 0 means unbounded
    pub max_size: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            mode: QueueMode::Priority,
            ignore_duplicates: true,
            max_size: 0,
        }
    }
}

/// The equality key defining duplicate detection and find-by-key lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub name: String,
    pub trigger_key: SignalKey,
    pub is_open: bool,
}

/// One unit of work in the queue
#[derive(Clone)]
pub struct QueueItem {
    /// Descriptive identifier, required non-empty
    pub name: String,
    /// Key dispatched to the external target to request the action
    pub trigger_key: SignalKey,
    /// Key announcing successful completion, absent means never completes
    pub success_key: Option<SignalKey>,
    /// Key announcing failed completion
    pub fail_key: Option<SignalKey>,
    /// Classification flag, part of the equality key, used for statistics
    pub is_open: bool,
    /// Ordering field; overwritten by the queue in Fifo/Filo mode
    pub priority: i32,
    /// Unique lookup id, assigned at construction
    pub task_id: TaskId,
    /// True while the item is linked into queue storage; informational
    pub is_enqueued: bool,
    /// Opaque payload, passed through to dispatch unmodified
    pub payload: Option<ActionPayload>,
}

impl QueueItem {
    pub fn new(name: impl Into<String>, trigger_key: impl Into<SignalKey>) -> Self {
        Self {
            name: name.into(),
            trigger_key: trigger_key.into(),
            success_key: None,
            fail_key: None,
            is_open: false,
            priority: 0,
            task_id: TaskId::new(),
            is_enqueued: false,
            payload: None,
        }
    }

    pub fn with_completion(
        mut self,
        success_key: impl Into<SignalKey>,
        fail_key: impl Into<SignalKey>,
    ) -> Self {
        self.success_key = Some(success_key.into());
        self.fail_key = Some(fail_key.into());
        self
    }

    pub fn with_success_key(mut self, key: impl Into<SignalKey>) -> Self {
        self.success_key = Some(key.into());
        self
    }

    pub fn with_fail_key(mut self, key: impl Into<SignalKey>) -> Self {
        self.fail_key = Some(key.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }

    pub fn with_payload(mut self, payload: ActionPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// The (name, trigger key, open flag) triple identifying this work unit
    pub fn key(&self) -> ItemKey {
        ItemKey {
            name: self.name.clone(),
            trigger_key: self.trigger_key.clone(),
            is_open: self.is_open,
        }
    }

    /// True when the other item is the same logical work unit
    pub fn matches_key(&self, other: &QueueItem) -> bool {
        self.name == other.name
            && self.trigger_key == other.trigger_key
            && self.is_open == other.is_open
    }

    /// An item is valid when its name is non-empty and its trigger key is set
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.trigger_key.is_set()
    }

    /// True when at least one completion key is set
    pub fn can_complete(&self) -> bool {
        self.success_key.as_ref().is_some_and(SignalKey::is_set)
            || self.fail_key.as_ref().is_some_and(SignalKey::is_set)
    }
}

impl fmt::Debug for QueueItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueItem")
            .field("name", &self.name)
            .field("trigger_key", &self.trigger_key)
            .field("success_key", &self.success_key)
            .field("fail_key", &self.fail_key)
            .field("is_open", &self.is_open)
            .field("priority", &self.priority)
            .field("task_id", &self.task_id)
            .field("is_enqueued", &self.is_enqueued)
            .field("payload", &self.payload.as_ref().map(|_| "<opaque>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_ids_are_unique() {
        let a = QueueItem::new("a", "action.run");
        let b = QueueItem::new("a", "action.run");
        assert_ne!(a.task_id, b.task_id);
    }

    #[test]
    fn test_equality_key_ignores_priority_and_payload() {
        let a = QueueItem::new("guard", "combat.attack").with_priority(5);
        let b = QueueItem::new("guard", "combat.attack")
            .with_priority(-3)
            .with_payload(Arc::new(42u32));
        assert!(a.matches_key(&b));
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_equality_key_includes_open_flag() {
        let a = QueueItem::new("guard", "combat.attack").open(true);
        let b = QueueItem::new("guard", "combat.attack").open(false);
        assert!(!a.matches_key(&b));
    }

    #[test]
    fn test_mode_renders_its_variant_name() {
        assert_eq!(QueueMode::Priority.to_string(), "Priority");
        assert_eq!(QueueMode::Fifo.to_string(), "Fifo");
        assert_eq!(QueueMode::Filo.to_string(), "Filo");
    }

    #[test]
    fn test_validation_requires_name_and_trigger() {
        assert!(QueueItem::new("guard", "combat.attack").is_valid());
        assert!(!QueueItem::new("", "combat.attack").is_valid());
        assert!(!QueueItem::new("guard", "").is_valid());
    }

    #[test]
    fn test_can_complete_requires_a_set_key() {
        let bare = QueueItem::new("guard", "combat.attack");
        assert!(!bare.can_complete());

        let with_success = QueueItem::new("guard", "combat.attack").with_success_key("combat.done");
        assert!(with_success.can_complete());

        let empty_keys = QueueItem::new("guard", "combat.attack").with_completion("", "");
        assert!(!empty_keys.can_complete());
    }

    #[test]
    fn test_config_defaults() {
        let config = QueueConfig::default();
        assert_eq!(config.mode, QueueMode::Priority);
        assert!(config.ignore_duplicates);
        assert_eq!(config.max_size, 0);
    }

    #[test]
    fn test_queue_mode_serde_round_trip() {
        let json = serde_json::to_string(&QueueMode::Filo).unwrap();
        let mode: QueueMode = serde_json::from_str(&json).unwrap();
        assert_eq!(mode, QueueMode::Filo);
    }
}
