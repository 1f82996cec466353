//! Port traits for infrastructure boundaries.
//!
//! Use cases depend on these traits. Adapters live beside them in
//! `infrastructure`: the in-memory and SQLite document stores, configured
//! admin claims, and the system clock.

mod error;
mod external;
mod repos;
mod subscription;
mod testing;

// =============================================================================
// Document Store Ports
// =============================================================================
pub use repos::{AdminSettingsRepo, CharacterRecord, CharacterRepo};
pub use subscription::{CharacterSubscription, Snapshot, SnapshotPublisher};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::ClaimsPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockAdminSettingsRepo, MockCharacterRepo};

#[cfg(test)]
pub use external::MockClaimsPort;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{ClaimsError, RepoError};
