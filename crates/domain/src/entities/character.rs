//! Character entity - one player's sheet
//!
//! # Invariants
//!
//! - `0 <= current <= max` for health and chakra holds after every
//!   `adjust_*` call. Direct writes (profile edits, stored documents) are not
//!   clamped.
//! - Jutsu ids are unique within `jutsus` when minted through
//!   [`Character::next_jutsu_id`].

use serde::{Deserialize, Serialize};

use crate::entities::jutsu::Jutsu;
use crate::error::DomainError;
use crate::ids::JutsuId;
use crate::value_objects::resource;

/// Name given to a freshly synthesized character.
pub const DEFAULT_CHARACTER_NAME: &str = "Novo Aventureiro";

pub const DEFAULT_MAX_HEALTH: i32 = 100;
pub const DEFAULT_MAX_CHAKRA: i32 = 50;
pub const DEFAULT_LEVEL: i32 = 1;

/// A player's character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    name: String,
    photo: String,
    level: i32,
    max_health: i32,
    current_health: i32,
    max_chakra: i32,
    current_chakra: i32,
    jutsus: Vec<Jutsu>,
    notes: String,
}

impl Default for Character {
    fn default() -> Self {
        Self::new_default()
    }
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// The sheet a player starts with before their first save.
    ///
    /// ```
    /// use eragenetica_domain::Character;
    ///
    /// let character = Character::new_default();
    /// assert_eq!(character.current_health(), 100);
    /// assert_eq!(character.max_chakra(), 50);
    /// assert!(character.jutsus().is_empty());
    /// ```
    pub fn new_default() -> Self {
        Self {
            name: DEFAULT_CHARACTER_NAME.to_string(),
            photo: String::new(),
            level: DEFAULT_LEVEL,
            max_health: DEFAULT_MAX_HEALTH,
            current_health: DEFAULT_MAX_HEALTH,
            max_chakra: DEFAULT_MAX_CHAKRA,
            current_chakra: DEFAULT_MAX_CHAKRA,
            jutsus: Vec::new(),
            notes: String::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn photo(&self) -> &str {
        &self.photo
    }

    #[inline]
    pub fn level(&self) -> i32 {
        self.level
    }

    #[inline]
    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    #[inline]
    pub fn current_health(&self) -> i32 {
        self.current_health
    }

    #[inline]
    pub fn max_chakra(&self) -> i32 {
        self.max_chakra
    }

    #[inline]
    pub fn current_chakra(&self) -> i32 {
        self.current_chakra
    }

    #[inline]
    pub fn jutsus(&self) -> &[Jutsu] {
        &self.jutsus
    }

    #[inline]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn find_jutsu(&self, id: &JutsuId) -> Option<&Jutsu> {
        self.jutsus.iter().find(|j| &j.id == id)
    }

    pub fn health_percentage(&self) -> f64 {
        resource::fill_percentage(self.current_health, self.max_health)
    }

    pub fn chakra_percentage(&self) -> f64 {
        resource::fill_percentage(self.current_chakra, self.max_chakra)
    }

    // =========================================================================
    // Builders (used when rebuilding from stored documents and in tests)
    // =========================================================================

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = photo.into();
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_health(mut self, current: i32, max: i32) -> Self {
        self.current_health = current;
        self.max_health = max;
        self
    }

    pub fn with_chakra(mut self, current: i32, max: i32) -> Self {
        self.current_chakra = current;
        self.max_chakra = max;
        self
    }

    pub fn with_jutsus(mut self, jutsus: Vec<Jutsu>) -> Self {
        self.jutsus = jutsus;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    // =========================================================================
    // Resources
    // =========================================================================

    /// Apply a health delta, clamped into `[0, max_health]`. Returns the new value.
    pub fn adjust_health(&mut self, delta: i32) -> i32 {
        self.current_health = resource::adjust(self.current_health, delta, self.max_health);
        self.current_health
    }

    /// Apply a chakra delta, clamped into `[0, max_chakra]`. Returns the new value.
    pub fn adjust_chakra(&mut self, delta: i32) -> i32 {
        self.current_chakra = resource::adjust(self.current_chakra, delta, self.max_chakra);
        self.current_chakra
    }

    pub fn can_use(&self, jutsu: &Jutsu) -> bool {
        resource::is_usable(
            self.current_chakra,
            self.current_health,
            jutsu.chakra_cost,
            jutsu.health_cost,
        )
    }

    // =========================================================================
    // Jutsu list
    // =========================================================================

    /// Mint an id from a millisecond timestamp, bumping it past any id
    /// already present in the list.
    pub fn next_jutsu_id(&self, now_millis: i64) -> JutsuId {
        let mut millis = now_millis;
        loop {
            let candidate = JutsuId::from_millis(millis);
            if self.find_jutsu(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }

    pub fn push_jutsu(&mut self, jutsu: Jutsu) {
        self.jutsus.push(jutsu);
    }

    /// Replace the jutsu carrying the same id, keeping its position.
    pub fn replace_jutsu(&mut self, jutsu: Jutsu) -> Result<(), DomainError> {
        let slot = self
            .jutsus
            .iter_mut()
            .find(|j| j.id == jutsu.id)
            .ok_or_else(|| DomainError::not_found("Jutsu", jutsu.id.as_str()))?;
        *slot = jutsu;
        Ok(())
    }

    pub fn remove_jutsu(&mut self, id: &JutsuId) -> Result<Jutsu, DomainError> {
        let index = self
            .jutsus
            .iter()
            .position(|j| &j.id == id)
            .ok_or_else(|| DomainError::not_found("Jutsu", id.as_str()))?;
        Ok(self.jutsus.remove(index))
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Copy of the profile fields, used as the staging copy while editing.
    pub fn profile(&self) -> ProfileDraft {
        ProfileDraft {
            name: self.name.clone(),
            level: self.level,
            max_health: self.max_health,
            max_chakra: self.max_chakra,
            photo: self.photo.clone(),
        }
    }

    /// Overwrite the profile fields. Current values are left alone even when
    /// they now exceed the new maximums.
    pub fn apply_profile(&mut self, draft: ProfileDraft) {
        self.name = draft.name;
        self.level = draft.level;
        self.max_health = draft.max_health;
        self.max_chakra = draft.max_chakra;
        self.photo = draft.photo;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }
}

/// Staging copy of the editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub name: String,
    pub level: i32,
    pub max_health: i32,
    pub max_chakra: i32,
    pub photo: String,
}

/// Partial update of a [`ProfileDraft`]; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub max_health: Option<i32>,
    #[serde(default)]
    pub max_chakra: Option<i32>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl ProfileDraft {
    pub fn apply(&mut self, changes: ProfileChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(level) = changes.level {
            self.level = level;
        }
        if let Some(max_health) = changes.max_health {
            self.max_health = max_health;
        }
        if let Some(max_chakra) = changes.max_chakra {
            self.max_chakra = max_chakra;
        }
        if let Some(photo) = changes.photo {
            self.photo = photo;
        }
    }
}
