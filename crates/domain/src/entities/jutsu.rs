//! Jutsu (ability) entity embedded in a character's list.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::JutsuId;

/// How much of a turn using the jutsu takes.
///
/// Stored with its Portuguese table label. Unknown or empty labels read back
/// as `Standard`, the same value a missing label gets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    #[default]
    Standard,
    Movement,
    Partial,
}

impl ActionType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Padrão",
            Self::Movement => "Movimento",
            Self::Partial => "Parcial",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for ActionType {
    fn from(value: String) -> Self {
        match value.trim() {
            "Movimento" => Self::Movement,
            "Parcial" => Self::Partial,
            _ => Self::Standard,
        }
    }
}

impl From<ActionType> for String {
    fn from(value: ActionType) -> Self {
        value.label().to_string()
    }
}

/// A jutsu or attack on a character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Jutsu {
    pub id: JutsuId,
    pub name: String,
    pub chakra_cost: i32,
    pub health_cost: i32,
    pub action_type: ActionType,
}

/// Fields of a jutsu before it has an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJutsu {
    pub name: String,
    #[serde(default)]
    pub chakra_cost: i32,
    #[serde(default)]
    pub health_cost: i32,
    #[serde(default)]
    pub action_type: ActionType,
}

impl NewJutsu {
    /// Attach an id. The name is trimmed and must not be empty.
    pub fn into_jutsu(self, id: JutsuId) -> Result<Jutsu, DomainError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Jutsu name cannot be empty"));
        }
        Ok(Jutsu {
            id,
            name: name.to_string(),
            chakra_cost: self.chakra_cost,
            health_cost: self.health_cost,
            action_type: self.action_type,
        })
    }

    /// Attach an id as entered. Edits keep the name untrimmed and may
    /// leave it blank.
    pub fn with_id(self, id: JutsuId) -> Jutsu {
        Jutsu {
            id,
            name: self.name,
            chakra_cost: self.chakra_cost,
            health_cost: self.health_cost,
            action_type: self.action_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_type_uses_table_labels_on_the_wire() {
        let json = serde_json::to_string(&ActionType::Movement).unwrap();
        assert_eq!(json, "\"Movimento\"");
        let parsed: ActionType = serde_json::from_str("\"Parcial\"").unwrap();
        assert_eq!(parsed, ActionType::Partial);
    }

    #[test]
    fn unknown_action_label_reads_as_standard() {
        let parsed: ActionType = serde_json::from_str("\"Bônus\"").unwrap();
        assert_eq!(parsed, ActionType::Standard);
        let parsed: ActionType = serde_json::from_str("\"\"").unwrap();
        assert_eq!(parsed, ActionType::Standard);
    }

    #[test]
    fn jutsu_serializes_camel_case() {
        let jutsu = Jutsu {
            id: JutsuId::new("1"),
            name: "Rasengan".into(),
            chakra_cost: 10,
            health_cost: 0,
            action_type: ActionType::Standard,
        };
        let value = serde_json::to_value(&jutsu).unwrap();
        assert_eq!(value["chakraCost"], 10);
        assert_eq!(value["healthCost"], 0);
        assert_eq!(value["actionType"], "Padrão");
        assert!(value.get("damage").is_none());
    }

    #[test]
    fn new_jutsu_trims_name() {
        let jutsu = NewJutsu {
            name: "  Chidori ".into(),
            chakra_cost: 15,
            ..Default::default()
        }
        .into_jutsu(JutsuId::new("7"))
        .unwrap();
        assert_eq!(jutsu.name, "Chidori");
        assert_eq!(jutsu.chakra_cost, 15);
    }

    #[test]
    fn edits_keep_the_name_as_entered() {
        let jutsu = NewJutsu {
            name: " Kai ".into(),
            ..Default::default()
        }
        .with_id(JutsuId::new("7"));
        assert_eq!(jutsu.name, " Kai ");

        let blank = NewJutsu::default().with_id(JutsuId::new("8"));
        assert_eq!(blank.name, "");
    }

    #[test]
    fn new_jutsu_rejects_blank_name() {
        let result = NewJutsu {
            name: "   ".into(),
            ..Default::default()
        }
        .into_jutsu(JutsuId::new("7"));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
