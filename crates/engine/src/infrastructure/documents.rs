//! Document handling shared by the store adapters: access rules, merge
//! writes and decoding.
//!
//! Access rules:
//! - `characters/{uid}`: read/write by the owner or any admin
//! - `characters` as a collection (list, subscribe): admin only
//! - `adminSettings/{uid}`: read/write only by `uid` itself, holding the admin claim

use serde::Serialize;
use serde_json::{Map, Value};

use eragenetica_domain::{AdminSettings, Character, CharacterDocument, Identity, UserId};

use crate::infrastructure::ports::{CharacterRecord, RepoError};

pub const CHARACTERS: &str = "characters";
pub const ADMIN_SETTINGS: &str = "adminSettings";

// =============================================================================
// Access rules
// =============================================================================

pub fn authorize_character(caller: &Identity, id: &UserId) -> Result<(), RepoError> {
    if caller.can_access(id) {
        Ok(())
    } else {
        Err(RepoError::permission_denied(CHARACTERS, id))
    }
}

pub fn authorize_collection(caller: &Identity) -> Result<(), RepoError> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(RepoError::permission_denied(CHARACTERS, "*"))
    }
}

pub fn authorize_admin_settings(caller: &Identity, id: &UserId) -> Result<(), RepoError> {
    if caller.is_admin() && caller.uid() == id {
        Ok(())
    } else {
        Err(RepoError::permission_denied(ADMIN_SETTINGS, id))
    }
}

// =============================================================================
// Merge writes
// =============================================================================

/// Overlay the top-level fields of `patch` onto `existing`.
///
/// A missing or non-object existing document is replaced by the patch fields
/// alone.
pub fn merge_document<P: Serialize>(existing: Option<Value>, patch: &P) -> Result<Value, RepoError> {
    let patch = match serde_json::to_value(patch).map_err(RepoError::serialization)? {
        Value::Object(fields) => fields,
        other => {
            return Err(RepoError::serialization(format!(
                "patch must be an object, got {other}"
            )))
        }
    };

    let mut document = match existing {
        Some(Value::Object(fields)) => fields,
        _ => Map::new(),
    };
    for (key, value) in patch {
        document.insert(key, value);
    }
    Ok(Value::Object(document))
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode and migrate a stored character document.
pub fn decode_character(id: &str, body: Value) -> Result<Character, RepoError> {
    serde_json::from_value::<CharacterDocument>(body)
        .map(Character::from)
        .map_err(|e| RepoError::serialization(format!("{CHARACTERS}/{id}: {e}")))
}

/// Decode a whole collection. Documents that cannot be decoded are logged and
/// left out so one bad document does not hide the rest.
pub fn decode_collection<I>(documents: I) -> Vec<CharacterRecord>
where
    I: IntoIterator<Item = (String, Value)>,
{
    documents
        .into_iter()
        .filter_map(|(id, body)| {
            let uid = match UserId::new(id.as_str()) {
                Ok(uid) => uid,
                Err(e) => {
                    tracing::warn!(document_id = %id, error = %e, "Skipping character with invalid id");
                    return None;
                }
            };
            match decode_character(&id, body) {
                Ok(character) => Some(CharacterRecord::new(uid, character)),
                Err(e) => {
                    tracing::warn!(document_id = %id, error = %e, "Skipping malformed character document");
                    None
                }
            }
        })
        .collect()
}

/// Decode a stored admin settings document. A malformed document reads as
/// absent.
pub fn decode_admin_settings(id: &str, body: Value) -> Option<AdminSettings> {
    match serde_json::from_value(body) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(document_id = %id, error = %e, "Ignoring malformed admin settings document");
            None
        }
    }
}
