//! Error codes and the localized text shown for them.

use serde::{Deserialize, Serialize};

/// Machine-readable error category sent alongside the localized message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The store refused the operation for this caller.
    PermissionDenied,
    /// Loading the character sheet failed.
    LoadFailed,
    /// Persisting a character change failed.
    SaveFailed,
    /// No usable character document.
    CharacterNotFound,
    /// Loading the roster failed.
    RosterLoadFailed,
    /// Persisting a roster order failed.
    OrderSaveFailed,
    /// The request itself was invalid (bad index, empty name, ...).
    InvalidRequest,
    /// No authenticated identity.
    Unauthenticated,
}

impl ErrorCode {
    /// Localized text shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::PermissionDenied => "Permissão negada.",
            Self::LoadFailed => "Não foi possível carregar os dados do personagem.",
            Self::SaveFailed => "Falha ao salvar o personagem na nuvem.",
            Self::CharacterNotFound => "Personagem não encontrado.",
            Self::RosterLoadFailed => "Falha ao carregar os personagens.",
            Self::OrderSaveFailed => "Falha ao salvar a ordem dos personagens.",
            Self::InvalidRequest => "Requisição inválida.",
            Self::Unauthenticated => "Faça login para continuar.",
        }
    }
}

/// Shown on the roster when the store denies the admin access; admin claims
/// can take a few minutes to propagate after being granted.
pub const ROSTER_PERMISSION_DENIED: &str = "Permissão negada. Verifique as regras de acesso do banco de dados. O acesso de Admin pode levar alguns minutos para propagar.";

/// Error payload embedded in views and WebSocket messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
    /// The caller's uid, shown on roster permission errors so it can be
    /// granted the admin claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_uid: Option<String>,
}

impl ErrorInfo {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.message().to_string(),
            admin_uid: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_admin_uid(mut self, uid: impl Into<String>) -> Self {
        self.admin_uid = Some(uid.into());
        self
    }
}

impl From<ErrorCode> for ErrorInfo {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}
