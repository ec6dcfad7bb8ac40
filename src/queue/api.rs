//! Public API for the action queue
//!
//! External modules should import from here rather than directly from
//! internal modules. See the module documentation for usage examples.

// Queue facade and raw ordered storage
pub use crate::queue::facade::ActionQueue;
pub use crate::queue::storage::OrderedQueue;

// Item types and configuration
pub use crate::queue::item::{ActionPayload, ItemKey, QueueConfig, QueueItem, QueueMode, TaskId};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};
