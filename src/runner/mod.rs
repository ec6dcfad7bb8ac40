//! Sequential Action Runner Component
//!
//! Bridges the ordered queue and the signal transport: a runner drains the
//! queue one item at a time, dispatching each item's trigger and holding
//! position until a success or fail signal comes back. The drain produces a
//! single aggregate outcome, true only when every item succeeded.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use actionq::queue::api::{ActionQueue, QueueConfig, QueueItem};
//! use actionq::runner::api::ActionRunner;
//! use actionq::signals::api::{ActorId, SignalBus};
//!
//! # async fn example() {
//! let queue = Arc::new(ActionQueue::new());
//! queue.initialize(QueueConfig::default());
//! queue.enqueue(
//!     QueueItem::new("dodge", "action.movement.dodge")
//!         .with_completion("action.movement.done", "action.movement.failed"),
//! );
//!
//! let bus = SignalBus::new();
//! bus.register_target(ActorId::new("player-1"));
//!
//! let handle = ActionRunner::new(queue, &bus, ActorId::new("player-1")).start();
//! // ... the target watches triggers and emits completion signals ...
//! let outcome = handle.finished().await;
//! # let _ = outcome;
//! # }
//! ```

pub mod api;
mod runner;

pub use runner::{ActionRunner, RunnerHandle};

#[cfg(test)]
mod tests;
