//! Test modules for the action queue
//!
//! Tests are organized by functional area: ordering semantics, admission
//! policies, lookup operations, structural integrity and concurrency.

mod ordering;
