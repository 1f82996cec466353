//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod claims;
pub mod clock;
pub mod documents;
pub mod memory_store;
pub mod ports;
pub mod sqlite_store;
