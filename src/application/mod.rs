//! Application layer
//!
//! Use cases that wrap domain services with the concerns of a single request:
//! input parsing, deadlines, cancellation and metrics.

pub mod account;
