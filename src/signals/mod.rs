//! Signal Transport Component
//!
//! The in-process transport between action runners and the external targets
//! that perform the actions. A target registers under an [`ActorId`] and
//! watches for [`Trigger`]s; when an action finishes it emits a [`Signal`]
//! on the item's success or fail key, which a [`WaitForSignal`] picks up.
//!
//! Keys are hierarchical, dot-separated strings. A subscription can match
//! exactly or include descendant keys, so a waiter bound to
//! `"action.attack"` with [`MatchMode::WithDescendants`] also completes on
//! `"action.attack.heavy"`.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use actionq::signals::api::{ActorId, MatchMode, SignalBus, SignalKey, WaitForSignal};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bus = SignalBus::new();
//! let target = bus.register_target(ActorId::new("player-1"));
//!
//! let mut waiter = WaitForSignal::with_keys(
//!     &bus,
//!     SignalKey::new("action.attack.done"),
//!     SignalKey::new("action.attack.failed"),
//!     target,
//!     true,
//!     MatchMode::Exact,
//! )?;
//!
//! bus.emit(target, SignalKey::new("action.attack.done"), None);
//! let outcome = waiter.wait().await;
//! assert!(outcome.is_success());
//! # Ok(())
//! # }
//! ```

pub mod api;
mod bus;
mod error;
mod event;
mod key;
mod waiter;

pub use bus::{SignalBus, Subscription, TriggerWatch};
pub use error::{SignalError, SignalResult};
pub use event::{ActorId, Signal, TargetHandle, Trigger};
pub use key::{MatchMode, SignalKey};
pub use waiter::{WaitForSignal, WaitOutcome};

#[cfg(test)]
mod tests;
