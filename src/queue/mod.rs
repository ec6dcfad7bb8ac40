//! Ordered Action Queue Component
//!
//! A thread-safe, mode-configurable work queue for deferred actions. Items
//! carry a name, a hierarchical trigger key, completion keys, an open flag
//! and a priority; the queue keeps them in a stable order and hands them out
//! one at a time to whoever drains it.
//!
//! # Overview
//!
//! Three ordering modes are supported, selected at initialization:
//!
//! - **Priority**: items dequeue lowest priority value first; ties keep
//!   their insertion order
//! - **FIFO**: items dequeue in arrival order
//! - **FILO**: items dequeue in reverse arrival order
//!
//! FIFO and FILO are implemented on top of the priority ordering by stamping
//! each accepted item with a synthetic priority from a monotonic counter, so
//! a single storage structure serves all three modes.
//!
//! The facade also enforces the two admission policies: optional duplicate
//! suppression keyed on (name, trigger key, open flag), and a configurable
//! maximum size with 0 meaning unbounded.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use actionq::queue::api::{ActionQueue, QueueConfig, QueueItem, QueueMode};
//!
//! let queue = ActionQueue::new();
//! queue.initialize(QueueConfig {
//!     mode: QueueMode::Priority,
//!     ignore_duplicates: true,
//!     max_size: 0,
//! });
//!
//! queue.enqueue(QueueItem::new("reload", "action.weapon.reload").with_priority(5));
//! queue.enqueue(QueueItem::new("dodge", "action.movement.dodge").with_priority(1));
//!
//! // "dodge" comes out first: lower priority value wins
//! let next = queue.dequeue();
//! assert_eq!(next.map(|item| item.name), Some("dodge".to_string()));
//! ```

pub mod api;
mod error;
mod facade;
mod item;
mod storage;

pub use error::{QueueError, QueueResult};
pub use facade::ActionQueue;
pub use item::{ActionPayload, ItemKey, QueueConfig, QueueItem, QueueMode, TaskId};
pub use storage::OrderedQueue;

#[cfg(test)]
mod tests;
