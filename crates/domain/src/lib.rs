//! Era Genética domain.
//!
//! Pure types and rules for the character sheet and the admin roster. Nothing
//! here performs I/O; the engine crate drives these types against the
//! document store.

pub mod entities;
pub mod error;
pub mod identity;
pub mod ids;
pub mod migration;
pub mod ordering;
pub mod patches;
pub mod value_objects;

pub use entities::{
    ActionType, AdminSettings, AdminSettingsPatch, Character, Jutsu, NewJutsu, ProfileChanges,
    ProfileDraft, DEFAULT_CHARACTER_NAME,
};
pub use error::DomainError;
pub use identity::Identity;
pub use ids::{JutsuId, UserId};
pub use migration::{CharacterDocument, JutsuDocument};
pub use ordering::{compare_names, move_item, sort_characters, RosterItem};
pub use patches::CharacterPatch;
pub use value_objects::{resource, Confirmation};
