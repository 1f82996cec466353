//! Use cases - User story orchestration.
//!
//! Each module drives one view: the player's character sheet or the admin
//! roster. Use cases hold the view's local state and talk to the store
//! through ports only.

pub mod character_sheet;
pub mod roster;

pub use character_sheet::{CharacterSheet, CharacterSheetError, CharacterSheetUseCases, JutsuUse};
pub use roster::{AdminRoster, RosterError, RosterUseCases};
