//! Admin roster operation errors.

use crate::infrastructure::ports::RepoError;
use eragenetica_domain::{DomainError, UserId};
use eragenetica_shared::{ErrorCode, ErrorInfo, ROSTER_PERMISSION_DENIED};

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Caller does not hold the admin claim: {0}")]
    NotAdmin(UserId),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Failed to load characters: {0}")]
    Load(#[source] RepoError),

    #[error("Failed to save character order: {0}")]
    Save(#[source] RepoError),
}

impl RosterError {
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Save(_))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotAdmin(_) => ErrorCode::PermissionDenied,
            Self::Load(e) | Self::Save(e) if e.is_permission_denied() => {
                ErrorCode::PermissionDenied
            }
            Self::Load(_) => ErrorCode::RosterLoadFailed,
            Self::Save(_) => ErrorCode::OrderSaveFailed,
            Self::Domain(_) => ErrorCode::InvalidRequest,
        }
    }

    /// Error payload shown on the roster. Permission errors carry the admin's
    /// uid so the claim can be granted to the right account.
    pub fn user_message(&self, admin: &UserId) -> ErrorInfo {
        match self.code() {
            ErrorCode::PermissionDenied => ErrorInfo::new(ErrorCode::PermissionDenied)
                .with_message(ROSTER_PERMISSION_DENIED)
                .with_admin_uid(admin.as_str()),
            code => ErrorInfo::new(code),
        }
    }
}
