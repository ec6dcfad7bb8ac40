pub mod core;
pub mod queue;
pub mod runner;
pub mod signals;
