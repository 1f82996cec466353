//! Character sheet operation errors.

use crate::infrastructure::ports::RepoError;
use eragenetica_domain::{DomainError, JutsuId};
use eragenetica_shared::{ErrorCode, ErrorInfo};

/// Errors that can occur during character sheet operations.
#[derive(Debug, thiserror::Error)]
pub enum CharacterSheetError {
    #[error("Character sheet is not loaded")]
    NotLoaded,

    #[error("Profile editor is not open")]
    NotEditing,

    #[error("Jutsu cannot be used with current resources: {0}")]
    NotUsable(JutsuId),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Failed to load character: {0}")]
    Load(#[source] RepoError),

    #[error("Failed to save character: {0}")]
    Save(#[source] RepoError),
}

impl CharacterSheetError {
    /// Store failures are recorded on the sheet; everything else is a bad request.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Save(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_not_found())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Load(e) if e.is_permission_denied() => ErrorCode::PermissionDenied,
            Self::Load(e) if e.is_malformed() => ErrorCode::CharacterNotFound,
            Self::Load(_) => ErrorCode::LoadFailed,
            Self::Save(e) if e.is_permission_denied() => ErrorCode::PermissionDenied,
            Self::Save(_) => ErrorCode::SaveFailed,
            Self::NotLoaded => ErrorCode::LoadFailed,
            Self::NotEditing | Self::NotUsable(_) | Self::Domain(_) => ErrorCode::InvalidRequest,
        }
    }

    /// Error payload shown to the player.
    pub fn user_message(&self) -> ErrorInfo {
        ErrorInfo::new(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_errors_get_their_own_message() {
        let denied = CharacterSheetError::Save(RepoError::permission_denied("characters", "p1"));
        let failed = CharacterSheetError::Save(RepoError::database("merge", "disk full"));
        assert_eq!(denied.code(), ErrorCode::PermissionDenied);
        assert_eq!(failed.code(), ErrorCode::SaveFailed);
        assert_ne!(denied.user_message().message, failed.user_message().message);
    }

    #[test]
    fn malformed_document_reads_as_not_found() {
        let err = CharacterSheetError::Load(RepoError::serialization("bad"));
        assert_eq!(err.code(), ErrorCode::CharacterNotFound);
        assert!(err.is_store_failure());
    }
}
