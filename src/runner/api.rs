//! Public API for the action runner
//!
//! External modules should import from here rather than directly from
//! internal modules. See the module documentation for usage examples.

pub use crate::runner::runner::{ActionRunner, RunnerHandle};
