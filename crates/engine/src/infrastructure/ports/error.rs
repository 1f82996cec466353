//! Error types for port operations.

/// Document store operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// The store's access rules refused the operation for this caller.
    #[error("Permission denied on {collection}/{id}")]
    PermissionDenied {
        collection: &'static str,
        id: String,
    },

    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// A stored document could not be read or a patch could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    pub fn permission_denied(collection: &'static str, id: impl ToString) -> Self {
        Self::PermissionDenied {
            collection,
            id: id.to_string(),
        }
    }

    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The document exists but could not be decoded.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }
}

/// Errors from the identity provider when refreshing claims.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClaimsError {
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}
