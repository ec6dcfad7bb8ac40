//! Public API for the signal transport
//!
//! External modules should import from here rather than directly from
//! internal modules. See the module documentation for usage examples.

// Bus, registry and channel halves
pub use crate::signals::bus::{SignalBus, Subscription, TriggerWatch};

// Keys and matching
pub use crate::signals::key::{MatchMode, SignalKey};

// Wire types
pub use crate::signals::event::{ActorId, Signal, TargetHandle, Trigger};

// Completion waiter
pub use crate::signals::waiter::{WaitForSignal, WaitOutcome};

// Error handling
pub use crate::signals::error::{SignalError, SignalResult};
