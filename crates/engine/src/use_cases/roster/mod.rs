//! Admin roster use cases.
//!
//! The roster shows every character, ordered by the admin's saved
//! `characterOrder`; characters the order does not mention follow by name.
//! Each store snapshot is re-sorted from scratch, so a snapshot arriving
//! after a local reorder may briefly show older server state.

mod error;

pub use error::RosterError;

use std::sync::Arc;

use eragenetica_domain::{
    move_item, sort_characters, AdminSettingsPatch, Confirmation, Identity, UserId,
};
use eragenetica_shared::{ErrorCode, ErrorInfo, RosterEntryData, RosterView};

use crate::infrastructure::ports::{
    AdminSettingsRepo, CharacterRecord, CharacterRepo, CharacterSubscription, RepoError, Snapshot,
};

/// Container for roster use cases.
pub struct RosterUseCases {
    characters: Arc<dyn CharacterRepo>,
    settings: Arc<dyn AdminSettingsRepo>,
}

impl RosterUseCases {
    pub fn new(characters: Arc<dyn CharacterRepo>, settings: Arc<dyn AdminSettingsRepo>) -> Self {
        Self {
            characters,
            settings,
        }
    }

    /// Open the roster for an admin.
    pub fn open(&self, admin: Identity) -> Result<AdminRoster, RosterError> {
        if !admin.is_admin() {
            return Err(RosterError::NotAdmin(admin.uid().clone()));
        }
        Ok(AdminRoster {
            identity: admin,
            characters: self.characters.clone(),
            settings: self.settings.clone(),
            snapshot: Vec::new(),
            order: Vec::new(),
            display: Vec::new(),
            loading: true,
            error: None,
        })
    }
}

pub struct AdminRoster {
    identity: Identity,
    characters: Arc<dyn CharacterRepo>,
    settings: Arc<dyn AdminSettingsRepo>,
    /// Last-known unsorted collection.
    snapshot: Snapshot,
    /// Live `characterOrder`.
    order: Vec<UserId>,
    /// What the admin sees, in order.
    display: Vec<CharacterRecord>,
    loading: bool,
    error: Option<ErrorInfo>,
}

impl AdminRoster {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn characters(&self) -> &[CharacterRecord] {
        &self.display
    }

    pub fn order(&self) -> &[UserId] {
        &self.order
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    /// Read the saved order once, then subscribe to the collection.
    ///
    /// Failing to read the order is logged and the roster starts from an
    /// empty order. Failing to subscribe is recorded on the roster.
    pub async fn subscribe(&mut self) -> Result<CharacterSubscription, RosterError> {
        let uid = self.identity.uid().clone();
        match self.settings.get(&self.identity, &uid).await {
            Ok(settings) => {
                self.order = settings.map(|s| s.character_order).unwrap_or_default();
            }
            Err(e) => {
                tracing::warn!(admin_id = %uid, error = %e, "Failed to read character order, starting unordered");
                self.order = Vec::new();
            }
        }

        match self.characters.subscribe(&self.identity).await {
            Ok(subscription) => {
                tracing::info!(admin_id = %uid, ordered = self.order.len(), "Roster subscribed");
                Ok(subscription)
            }
            Err(e) => {
                self.record_failure(&e);
                Err(RosterError::Load(e))
            }
        }
    }

    /// Replace the roster with a fresh collection snapshot.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> &[CharacterRecord] {
        self.snapshot = snapshot;
        self.resort();
        self.loading = false;
        &self.display
    }

    /// One-off read of the collection, for when no subscription is running.
    pub async fn refresh(&mut self) -> Result<(), RosterError> {
        match self.characters.list_all(&self.identity).await {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.record_failure(&e);
                Err(RosterError::Load(e))
            }
        }
    }

    /// Record a failed load or a broken subscription on the roster.
    pub fn record_failure(&mut self, error: &RepoError) {
        tracing::warn!(admin_id = %self.identity.uid(), error = %error, "Roster load failed");
        let uid = self.identity.uid();
        self.error = Some(if error.is_permission_denied() {
            RosterError::NotAdmin(uid.clone()).user_message(uid)
        } else {
            ErrorInfo::new(ErrorCode::RosterLoadFailed)
        });
        self.loading = false;
    }

    /// Move the card at `from` to `to` and persist the resulting order.
    ///
    /// The display changes immediately. A failed write is logged and shown
    /// inline; the display keeps the new order.
    pub async fn reorder(&mut self, from: usize, to: usize) -> Result<(), RosterError> {
        move_item(&mut self.display, from, to)?;
        self.order = self.display_ids();
        tracing::info!(admin_id = %self.identity.uid(), from, to, "Roster reordered");

        let patch = AdminSettingsPatch::character_order(self.order.clone());
        self.save(patch).await
    }

    /// Persist the displayed order as the default order. Returns whether
    /// anything was written.
    pub async fn save_default_order(
        &mut self,
        confirmation: Confirmation,
    ) -> Result<bool, RosterError> {
        if !confirmation.is_confirmed() {
            return Ok(false);
        }
        let patch = AdminSettingsPatch::default_character_order(self.display_ids());
        self.save(patch).await?;
        tracing::info!(admin_id = %self.identity.uid(), "Default character order saved");
        Ok(true)
    }

    /// Make the saved default order the live order. Returns whether anything
    /// was written.
    pub async fn reset_to_default_order(
        &mut self,
        confirmation: Confirmation,
    ) -> Result<bool, RosterError> {
        if !confirmation.is_confirmed() {
            return Ok(false);
        }
        let uid = self.identity.uid().clone();
        let default_order = match self.settings.get(&self.identity, &uid).await {
            Ok(settings) => settings
                .map(|s| s.default_character_order)
                .unwrap_or_default(),
            Err(e) => {
                let error = RosterError::Load(e);
                self.error = Some(error.user_message(&uid));
                return Err(error);
            }
        };

        self.order = default_order;
        self.resort();
        tracing::info!(admin_id = %uid, ordered = self.order.len(), "Roster reset to default order");

        let patch = AdminSettingsPatch::character_order(self.order.clone());
        self.save(patch).await?;
        Ok(true)
    }

    pub fn view(&self) -> RosterView {
        RosterView {
            characters: self
                .display
                .iter()
                .map(|r| RosterEntryData::from_character(r.id.as_str(), &r.character))
                .collect(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    fn resort(&mut self) {
        self.display = sort_characters(&self.snapshot, &self.order);
    }

    fn display_ids(&self) -> Vec<UserId> {
        self.display.iter().map(|r| r.id.clone()).collect()
    }

    async fn save(&mut self, patch: AdminSettingsPatch) -> Result<(), RosterError> {
        let uid = self.identity.uid().clone();
        match self.settings.merge(&self.identity, &uid, &patch).await {
            Ok(()) => {
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(admin_id = %uid, error = %e, "Failed to save character order");
                let error = RosterError::Save(e);
                self.error = Some(error.user_message(&uid));
                Err(error)
            }
        }
    }
}
