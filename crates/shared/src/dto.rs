//! Wire-format DTOs for the REST API.
//!
//! Ids travel as plain strings. Field names are camelCase to match the
//! stored documents.

use serde::{Deserialize, Serialize};

use eragenetica_domain::{Character, Jutsu, ProfileDraft};

use crate::user_messages::ErrorInfo;

// =============================================================================
// Session
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_id: String,
    pub admin: bool,
    /// Route the client should land on for this caller.
    pub landing: String,
}

// =============================================================================
// Character sheet
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JutsuData {
    pub id: String,
    pub name: String,
    pub chakra_cost: i32,
    pub health_cost: i32,
    pub action_type: String,
    /// Whether the owning character can currently afford it.
    pub usable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    pub name: String,
    pub photo: String,
    pub level: i32,
    pub max_health: i32,
    pub current_health: i32,
    pub max_chakra: i32,
    pub current_chakra: i32,
    pub health_percentage: f64,
    pub chakra_percentage: f64,
    pub jutsus: Vec<JutsuData>,
    pub notes: String,
}

impl CharacterData {
    pub fn from_character(character: &Character) -> Self {
        Self {
            name: character.name().to_string(),
            photo: character.photo().to_string(),
            level: character.level(),
            max_health: character.max_health(),
            current_health: character.current_health(),
            max_chakra: character.max_chakra(),
            current_chakra: character.current_chakra(),
            health_percentage: character.health_percentage(),
            chakra_percentage: character.chakra_percentage(),
            jutsus: character
                .jutsus()
                .iter()
                .map(|j| jutsu_data(character, j))
                .collect(),
            notes: character.notes().to_string(),
        }
    }
}

fn jutsu_data(owner: &Character, jutsu: &Jutsu) -> JutsuData {
    JutsuData {
        id: jutsu.id.to_string(),
        name: jutsu.name.clone(),
        chakra_cost: jutsu.chakra_cost,
        health_cost: jutsu.health_cost,
        action_type: jutsu.action_type.label().to_string(),
        usable: owner.can_use(jutsu),
    }
}

/// Everything the sheet view needs to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheetView {
    /// `None` while loading or after a failed load.
    pub character: Option<CharacterData>,
    /// The profile editor is open.
    pub editing: bool,
    /// The sheet has never been saved (first-time setup).
    pub first_time: bool,
    /// Staging copy while the profile editor is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<ProfileDraft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Outcome of one field write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum WriteStatus {
    Saved,
    Failed { error: ErrorInfo },
}

/// Result of using a jutsu: the two resource writes are reported separately
/// because they are not atomic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JutsuUseData {
    pub chakra: WriteStatus,
    pub health: WriteStatus,
    pub sheet: CharacterSheetView,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustRequest {
    pub delta: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub confirm: bool,
}

// =============================================================================
// Roster
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntryData {
    pub id: String,
    pub name: String,
    pub photo: String,
    pub level: i32,
    pub max_health: i32,
    pub current_health: i32,
    pub max_chakra: i32,
    pub current_chakra: i32,
    pub health_percentage: f64,
    pub chakra_percentage: f64,
}

impl RosterEntryData {
    pub fn from_character(id: impl Into<String>, character: &Character) -> Self {
        Self {
            id: id.into(),
            name: character.name().to_string(),
            photo: character.photo().to_string(),
            level: character.level(),
            max_health: character.max_health(),
            current_health: character.current_health(),
            max_chakra: character.max_chakra(),
            current_chakra: character.current_chakra(),
            health_percentage: character.health_percentage(),
            chakra_percentage: character.chakra_percentage(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterView {
    pub characters: Vec<RosterEntryData>,
    pub loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}
