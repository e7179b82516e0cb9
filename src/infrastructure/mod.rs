//! Infrastructure layer
//!
//! Concrete adapters behind the domain ports: PostgreSQL storage, Argon2
//! hashing, JWT signing, plus configuration and metrics.

pub mod config;
pub mod metrics;
pub mod persistence;
pub mod security;
