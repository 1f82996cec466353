//! Character sheet use cases.
//!
//! A [`CharacterSheet`] is one player's open sheet: the in-memory character
//! plus its synchronization with `characters/{uid}`.
//!
//! Writes are optimistic. The in-memory character changes first, then only
//! the changed field is merged into the document. A failed write records a
//! user-visible error and leaves the in-memory change in place; nothing is
//! retried.

mod error;

pub use error::CharacterSheetError;

use std::sync::Arc;

use eragenetica_domain::{
    Character, CharacterPatch, DomainError, Identity, Jutsu, JutsuId, NewJutsu, ProfileChanges,
    ProfileDraft,
};
use eragenetica_shared::{CharacterData, CharacterSheetView, ErrorInfo};

use crate::infrastructure::ports::{CharacterRepo, ClockPort, RepoError};

// =============================================================================
// Result Types
// =============================================================================

/// Outcome of using a jutsu.
///
/// Both deductions are applied in memory before two independent writes.
/// Either write may fail on its own, so each has its own result.
#[derive(Debug)]
pub struct JutsuUse {
    pub jutsu: Jutsu,
    pub chakra: Result<(), CharacterSheetError>,
    pub health: Result<(), CharacterSheetError>,
}

impl JutsuUse {
    /// Both writes reached the store.
    pub fn is_complete(&self) -> bool {
        self.chakra.is_ok() && self.health.is_ok()
    }
}

// =============================================================================
// Use Cases
// =============================================================================

/// Container for character sheet use cases.
pub struct CharacterSheetUseCases {
    characters: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CharacterSheetUseCases {
    pub fn new(characters: Arc<dyn CharacterRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { characters, clock }
    }

    /// Open the caller's own sheet. Nothing is read until [`CharacterSheet::load`].
    pub fn open(&self, identity: Identity) -> CharacterSheet {
        CharacterSheet {
            identity,
            characters: self.characters.clone(),
            clock: self.clock.clone(),
            character: None,
            draft: None,
            first_time: false,
            error: None,
        }
    }
}

pub struct CharacterSheet {
    identity: Identity,
    characters: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
    character: Option<Character>,
    /// Staging copy while the profile editor is open.
    draft: Option<ProfileDraft>,
    /// No document existed when the sheet was loaded and the profile has not
    /// been saved since.
    first_time: bool,
    error: Option<ErrorInfo>,
}

impl CharacterSheet {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.character.is_some()
    }

    pub fn is_first_time(&self) -> bool {
        self.first_time
    }

    pub fn draft(&self) -> Option<&ProfileDraft> {
        self.draft.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Fetch the caller's document.
    ///
    /// A missing document yields a fresh default character and opens the
    /// profile editor for first-time setup; nothing is written until the
    /// player saves. A failed load clears the sheet.
    pub async fn load(&mut self) -> Result<(), CharacterSheetError> {
        let uid = self.identity.uid().clone();
        match self.characters.get(&self.identity, &uid).await {
            Ok(Some(character)) => {
                tracing::info!(user_id = %uid, jutsus = character.jutsus().len(), "Character loaded");
                self.character = Some(character);
                self.draft = None;
                self.first_time = false;
                self.error = None;
                Ok(())
            }
            Ok(None) => {
                let character = Character::new_default();
                tracing::info!(user_id = %uid, "No character document, starting first-time setup");
                self.draft = Some(character.profile());
                self.character = Some(character);
                self.first_time = true;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                if e.is_malformed() {
                    tracing::warn!(user_id = %uid, error = %e, "Character document is malformed");
                } else {
                    tracing::warn!(user_id = %uid, error = %e, "Failed to load character");
                }
                self.character = None;
                self.draft = None;
                Err(self.fail(CharacterSheetError::Load(e)))
            }
        }
    }

    // =========================================================================
    // Resources
    // =========================================================================

    /// Apply a health delta, clamped to `[0, max]`. Returns the new value.
    pub async fn adjust_health(&mut self, delta: i32) -> Result<i32, CharacterSheetError> {
        let value = self.character_mut()?.adjust_health(delta);
        self.write(CharacterPatch::current_health(value)).await?;
        Ok(value)
    }

    /// Apply a chakra delta, clamped to `[0, max]`. Returns the new value.
    pub async fn adjust_chakra(&mut self, delta: i32) -> Result<i32, CharacterSheetError> {
        let value = self.character_mut()?.adjust_chakra(delta);
        self.write(CharacterPatch::current_chakra(value)).await?;
        Ok(value)
    }

    // =========================================================================
    // Jutsus
    // =========================================================================

    /// Append a new jutsu with a fresh timestamp id and persist the list.
    pub async fn add_jutsu(&mut self, new_jutsu: NewJutsu) -> Result<Jutsu, CharacterSheetError> {
        let now_millis = self.clock.now().timestamp_millis();
        let character = self.character_mut()?;
        let jutsu = new_jutsu.into_jutsu(character.next_jutsu_id(now_millis))?;
        character.push_jutsu(jutsu.clone());
        let patch = CharacterPatch::jutsus(character.jutsus());

        tracing::debug!(jutsu_id = %jutsu.id, name = %jutsu.name, "Jutsu added");
        self.write(patch).await?;
        Ok(jutsu)
    }

    /// Replace the jutsu with `id`, keeping its position, and persist the list.
    /// Only adding validates the name.
    pub async fn update_jutsu(
        &mut self,
        id: JutsuId,
        changes: NewJutsu,
    ) -> Result<Jutsu, CharacterSheetError> {
        let character = self.character_mut()?;
        let jutsu = changes.with_id(id);
        character.replace_jutsu(jutsu.clone())?;
        let patch = CharacterPatch::jutsus(character.jutsus());

        self.write(patch).await?;
        Ok(jutsu)
    }

    /// Remove the jutsu with `id` and persist the list.
    pub async fn delete_jutsu(&mut self, id: &JutsuId) -> Result<Jutsu, CharacterSheetError> {
        let character = self.character_mut()?;
        let removed = character.remove_jutsu(id)?;
        let patch = CharacterPatch::jutsus(character.jutsus());

        self.write(patch).await?;
        Ok(removed)
    }

    /// Deduct a jutsu's costs.
    ///
    /// Refused without any change unless the jutsu is usable. The two
    /// resources are written independently and concurrently; the result
    /// reports each write.
    pub async fn use_jutsu(&mut self, id: &JutsuId) -> Result<JutsuUse, CharacterSheetError> {
        let character = self.character_mut()?;
        let jutsu = character
            .find_jutsu(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Jutsu", id.as_str()))?;
        if !character.can_use(&jutsu) {
            return Err(CharacterSheetError::NotUsable(id.clone()));
        }
        let chakra = character.adjust_chakra(-jutsu.chakra_cost);
        let health = character.adjust_health(-jutsu.health_cost);

        let uid = self.identity.uid();
        let chakra_patch = CharacterPatch::current_chakra(chakra);
        let health_patch = CharacterPatch::current_health(health);
        let (chakra_result, health_result) = tokio::join!(
            self.characters.merge(&self.identity, uid, &chakra_patch),
            self.characters.merge(&self.identity, uid, &health_patch),
        );

        tracing::debug!(
            jutsu_id = %jutsu.id,
            chakra,
            health,
            chakra_saved = chakra_result.is_ok(),
            health_saved = health_result.is_ok(),
            "Jutsu used"
        );

        let chakra_outcome = self.settle(chakra_result);
        let health_outcome = self.settle(health_result);
        if chakra_outcome.is_ok() && health_outcome.is_ok() {
            self.error = None;
        }

        Ok(JutsuUse {
            jutsu,
            chakra: chakra_outcome,
            health: health_outcome,
        })
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Open the profile editor with a copy of the current profile.
    pub fn begin_profile_edit(&mut self) -> Result<&ProfileDraft, CharacterSheetError> {
        let draft = self
            .character()
            .map(Character::profile)
            .ok_or(CharacterSheetError::NotLoaded)?;
        let draft: &ProfileDraft = self.draft.insert(draft);
        Ok(draft)
    }

    /// Change fields of the staging copy. Nothing is written.
    pub fn edit_profile(
        &mut self,
        changes: ProfileChanges,
    ) -> Result<&ProfileDraft, CharacterSheetError> {
        let draft = self.draft.as_mut().ok_or(CharacterSheetError::NotEditing)?;
        draft.apply(changes);
        let draft: &ProfileDraft = draft;
        Ok(draft)
    }

    /// Commit the staging copy as one write of the whole character, which is
    /// also what persists a first-time sheet.
    pub async fn save_profile(&mut self) -> Result<(), CharacterSheetError> {
        if self.character.is_none() {
            return Err(CharacterSheetError::NotLoaded);
        }
        let draft = self.draft.take().ok_or(CharacterSheetError::NotEditing)?;
        let character = self.character_mut()?;
        character.apply_profile(draft);
        let patch = CharacterPatch::full(character);

        self.write(patch).await?;
        if self.first_time {
            tracing::info!(user_id = %self.identity.uid(), "First-time setup saved");
        }
        self.first_time = false;
        Ok(())
    }

    /// Close the profile editor, discarding the staging copy.
    pub fn cancel_profile_edit(&mut self) {
        self.draft = None;
    }

    // =========================================================================
    // Notes
    // =========================================================================

    pub async fn save_notes(&mut self, notes: impl Into<String>) -> Result<(), CharacterSheetError> {
        let notes = notes.into();
        self.character_mut()?.set_notes(notes.clone());
        self.write(CharacterPatch::notes(notes)).await
    }

    // =========================================================================
    // View
    // =========================================================================

    pub fn view(&self) -> CharacterSheetView {
        CharacterSheetView {
            character: self.character.as_ref().map(CharacterData::from_character),
            editing: self.draft.is_some(),
            first_time: self.first_time,
            draft: self.draft.clone(),
            error: self.error.clone(),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn character_mut(&mut self) -> Result<&mut Character, CharacterSheetError> {
        self.character.as_mut().ok_or(CharacterSheetError::NotLoaded)
    }

    async fn write(&mut self, patch: CharacterPatch) -> Result<(), CharacterSheetError> {
        let result = self
            .characters
            .merge(&self.identity, self.identity.uid(), &patch)
            .await;
        self.settle(result)?;
        self.error = None;
        Ok(())
    }

    /// Turn a write result into a sheet result, recording failures.
    fn settle(&mut self, result: Result<(), RepoError>) -> Result<(), CharacterSheetError> {
        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(user_id = %self.identity.uid(), error = %e, "Failed to save character");
                Err(self.fail(CharacterSheetError::Save(e)))
            }
        }
    }

    fn fail(&mut self, error: CharacterSheetError) -> CharacterSheetError {
        self.error = Some(error.user_message());
        error
    }
}
