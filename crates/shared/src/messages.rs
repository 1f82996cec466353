//! WebSocket message types for the live admin roster.
//!
//! The admin client opens `/ws/roster`; the engine pushes a fresh
//! [`RosterServerMessage::Roster`] on every store change and answers the
//! client's roster commands.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Unknown message types deserialize to `Unknown`

use serde::{Deserialize, Serialize};

use crate::dto::RosterEntryData;
use crate::user_messages::ErrorInfo;

// =============================================================================
// Client Messages (admin client → Engine)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RosterClientMessage {
    /// Drag-and-drop: move the card at `from` to `to`.
    Reorder { from: usize, to: usize },
    /// Store the displayed order as the default. Ignored unless `confirm`.
    SaveDefaultOrder {
        #[serde(default)]
        confirm: bool,
    },
    /// Restore the default order. Ignored unless `confirm`.
    ResetToDefaultOrder {
        #[serde(default)]
        confirm: bool,
    },
    /// Heartbeat ping
    Heartbeat,
    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Server Messages (Engine → admin client)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RosterServerMessage {
    /// Full ordered roster.
    Roster {
        characters: Vec<RosterEntryData>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<ErrorInfo>,
    },
    /// An operation failed; the roster on screen stays as it was.
    Error { error: ErrorInfo },
    /// Heartbeat response
    Pong,
    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}
