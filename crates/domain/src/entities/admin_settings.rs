//! Per-admin roster ordering preferences.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Ordering preferences stored under the admin's own id.
///
/// Both lists are overwritten independently and only by explicit admin
/// actions; `default_character_order` is never derived automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminSettings {
    /// Live display order.
    pub character_order: Vec<UserId>,
    /// Target of "reset to default".
    pub default_character_order: Vec<UserId>,
}

/// Merge-write payload for [`AdminSettings`]. `None` fields are not touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_order: Option<Vec<UserId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_character_order: Option<Vec<UserId>>,
}

impl AdminSettingsPatch {
    pub fn character_order(order: Vec<UserId>) -> Self {
        Self {
            character_order: Some(order),
            ..Default::default()
        }
    }

    pub fn default_character_order(order: Vec<UserId>) -> Self {
        Self {
            default_character_order: Some(order),
            ..Default::default()
        }
    }
}
