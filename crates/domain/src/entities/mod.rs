//! Domain entities.

pub mod admin_settings;
pub mod character;
pub mod jutsu;

pub use admin_settings::{AdminSettings, AdminSettingsPatch};
pub use character::{
    Character, ProfileChanges, ProfileDraft, DEFAULT_CHARACTER_NAME, DEFAULT_LEVEL,
    DEFAULT_MAX_CHAKRA, DEFAULT_MAX_HEALTH,
};
pub use jutsu::{ActionType, Jutsu, NewJutsu};
