//! Error types for the signal bus

use thiserror::Error;

pub type SignalResult<T> = Result<T, SignalError>;

#[derive(Debug, Error)]
pub enum SignalError {
    /// No target has been registered under the given actor id
    #[error("No capable target registered for actor '{actor}'")]
    TargetNotFound { actor: String },

    /// A subscription was requested for an unset key
    #[error("Cannot subscribe to an unset signal key")]
    KeyNotSet,

    /// The bus has been dropped while a handle to it was still in use
    #[error("Signal bus is no longer available")]
    BusClosed,

    /// A bus lock was poisoned by a panicking thread
    #[error("Signal bus lock poisoned: {detail}")]
    LockPoisoned { detail: String },
}
