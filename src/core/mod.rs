//! Core services and infrastructure

pub mod diagnostics;
pub mod logging;
pub mod sync;
