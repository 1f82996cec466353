//! Era Genética wire types shared by the engine and its clients.
//!
//! - REST DTOs for the character sheet and the roster
//! - WebSocket messages for the live roster
//! - Error codes with their localized messages
//!
//! No business logic lives here; the DTOs are built from domain types.

pub mod dto;
pub mod messages;
pub mod user_messages;

pub use dto::{
    AdjustRequest, CharacterData, CharacterSheetView, ConfirmRequest, JutsuData, JutsuUseData,
    NotesRequest, ReorderRequest, RosterEntryData, RosterView, SessionInfo, WriteStatus,
};
pub use messages::{RosterClientMessage, RosterServerMessage};
pub use user_messages::{ErrorCode, ErrorInfo, ROSTER_PERMISSION_DENIED};
