//! Test modules for the signal transport

mod waiter;
