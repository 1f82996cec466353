//! Document store port traits.
//!
//! Every call carries the authenticated caller; adapters enforce the store's
//! access rules against it and answer `RepoError::PermissionDenied`.

use async_trait::async_trait;
use eragenetica_domain::{
    AdminSettings, AdminSettingsPatch, Character, CharacterPatch, Identity, RosterItem, UserId,
};

use super::error::RepoError;
use super::subscription::CharacterSubscription;

/// One character document together with its id (the owner's user id).
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRecord {
    pub id: UserId,
    pub character: Character,
}

impl CharacterRecord {
    pub fn new(id: UserId, character: Character) -> Self {
        Self { id, character }
    }
}

impl RosterItem for CharacterRecord {
    fn roster_id(&self) -> &UserId {
        &self.id
    }

    fn roster_name(&self) -> &str {
        self.character.name()
    }
}

// =============================================================================
// Characters collection
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    /// Point read. `Ok(None)` when the document does not exist; a document
    /// that exists but cannot be decoded is `RepoError::Serialization`.
    async fn get(&self, caller: &Identity, id: &UserId) -> Result<Option<Character>, RepoError>;

    /// Field-level merge write; fields absent from `patch` are untouched.
    /// Creates the document when it does not exist.
    async fn merge(
        &self,
        caller: &Identity,
        id: &UserId,
        patch: &CharacterPatch,
    ) -> Result<(), RepoError>;

    /// Every readable character document. Admin only.
    async fn list_all(&self, caller: &Identity) -> Result<Vec<CharacterRecord>, RepoError>;

    /// Live full-collection snapshots. Admin only.
    async fn subscribe(&self, caller: &Identity) -> Result<CharacterSubscription, RepoError>;
}

// =============================================================================
// Admin settings collection
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminSettingsRepo: Send + Sync {
    async fn get(&self, caller: &Identity, id: &UserId)
        -> Result<Option<AdminSettings>, RepoError>;

    async fn merge(
        &self,
        caller: &Identity,
        id: &UserId,
        patch: &AdminSettingsPatch,
    ) -> Result<(), RepoError>;
}
