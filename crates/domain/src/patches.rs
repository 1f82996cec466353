//! Merge-write payloads for character documents.
//!
//! A patch names only the fields it changes; the store merges them into the
//! existing document. `jutsus` is always written as a whole list.

use serde::Serialize;

use crate::entities::{Character, Jutsu};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_health: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_health: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chakra: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_chakra: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jutsus: Option<Vec<Jutsu>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CharacterPatch {
    /// Every field of the character. Used when committing a profile edit,
    /// which is also the first write of a brand-new sheet.
    pub fn full(character: &Character) -> Self {
        Self {
            name: Some(character.name().to_string()),
            photo: Some(character.photo().to_string()),
            level: Some(character.level()),
            max_health: Some(character.max_health()),
            current_health: Some(character.current_health()),
            max_chakra: Some(character.max_chakra()),
            current_chakra: Some(character.current_chakra()),
            jutsus: Some(character.jutsus().to_vec()),
            notes: Some(character.notes().to_string()),
        }
    }

    pub fn current_health(value: i32) -> Self {
        Self {
            current_health: Some(value),
            ..Default::default()
        }
    }

    pub fn current_chakra(value: i32) -> Self {
        Self {
            current_chakra: Some(value),
            ..Default::default()
        }
    }

    pub fn jutsus(jutsus: &[Jutsu]) -> Self {
        Self {
            jutsus: Some(jutsus.to_vec()),
            ..Default::default()
        }
    }

    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_field_patch_serializes_one_key() {
        let value = serde_json::to_value(CharacterPatch::current_health(42)).unwrap();
        assert_eq!(value, serde_json::json!({ "currentHealth": 42 }));
    }

    #[test]
    fn full_patch_covers_every_document_field() {
        let value = serde_json::to_value(CharacterPatch::full(&Character::new_default())).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 9);
        assert_eq!(value["currentChakra"], 50);
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(CharacterPatch::default().is_empty());
        assert!(!CharacterPatch::notes("").is_empty());
    }
}
