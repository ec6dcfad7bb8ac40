//! Queue Error Types
//!
//! Ordinary rejections (full, duplicate, invalid item, uninitialized) are
//! expected control flow and reported through bool/Option returns plus a
//! diagnostic record. Only conditions that indicate a bug inside the queue
//! itself surface as errors.

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Queue structure corrupted: {detail}")]
    CorruptedStructure { detail: String },

    #[error("Queue lock poisoned: {detail}")]
    LockPoisoned { detail: String },
}

/// Result type for queue operations that can fail hard
pub type QueueResult<T> = Result<T, QueueError>;
