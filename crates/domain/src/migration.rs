//! Reading stored character documents.
//!
//! Documents are schemaless and older ones predate some fields:
//!
//! - jutsus written before `healthCost` existed carry `damage` instead; the
//!   value moves over (default 0) and `damage` is dropped;
//! - jutsus without `actionType` read as `Standard`;
//! - any top-level field missing from the document takes the value a fresh
//!   sheet would have.
//!
//! Numbers may come back as floats from clients that do not distinguish
//! them; they are truncated to integers.

use serde::{Deserialize, Deserializer};

use crate::entities::{ActionType, Character, Jutsu};
use crate::ids::JutsuId;

/// A character document as stored, before migration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterDocument {
    pub name: Option<String>,
    pub photo: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub level: Option<i32>,
    #[serde(deserialize_with = "lenient_int")]
    pub max_health: Option<i32>,
    #[serde(deserialize_with = "lenient_int")]
    pub current_health: Option<i32>,
    #[serde(deserialize_with = "lenient_int")]
    pub max_chakra: Option<i32>,
    #[serde(deserialize_with = "lenient_int")]
    pub current_chakra: Option<i32>,
    pub jutsus: Option<Vec<JutsuDocument>>,
    pub notes: Option<String>,
}

/// A stored jutsu, possibly in the legacy shape.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JutsuDocument {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub chakra_cost: Option<i32>,
    #[serde(deserialize_with = "lenient_int")]
    pub health_cost: Option<i32>,
    /// Legacy name of `health_cost`.
    #[serde(deserialize_with = "lenient_int")]
    pub damage: Option<i32>,
    pub action_type: Option<ActionType>,
}

impl From<JutsuDocument> for Jutsu {
    fn from(doc: JutsuDocument) -> Self {
        Jutsu {
            id: JutsuId::new(doc.id.unwrap_or_default()),
            name: doc.name.unwrap_or_default(),
            chakra_cost: doc.chakra_cost.unwrap_or(0),
            health_cost: doc.health_cost.or(doc.damage).unwrap_or(0),
            action_type: doc.action_type.unwrap_or_default(),
        }
    }
}

impl From<CharacterDocument> for Character {
    fn from(doc: CharacterDocument) -> Self {
        let base = Character::new_default();
        let jutsus = doc
            .jutsus
            .unwrap_or_default()
            .into_iter()
            .map(Jutsu::from)
            .collect();

        Character::new_default()
            .with_name(doc.name.unwrap_or_else(|| base.name().to_string()))
            .with_photo(doc.photo.unwrap_or_default())
            .with_level(doc.level.unwrap_or(base.level()))
            .with_health(
                doc.current_health.unwrap_or(base.current_health()),
                doc.max_health.unwrap_or(base.max_health()),
            )
            .with_chakra(
                doc.current_chakra.unwrap_or(base.current_chakra()),
                doc.max_chakra.unwrap_or(base.max_chakra()),
            )
            .with_jutsus(jutsus)
            .with_notes(doc.notes.unwrap_or_default())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Int(i64),
    Float(f64),
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<NumberRepr>::deserialize(deserializer)?;
    Ok(repr.map(|n| match n {
        NumberRepr::Int(i) => i.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
        NumberRepr::Float(f) => f as i32,
    }))
}
