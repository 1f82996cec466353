//! Identifier newtypes.
//!
//! Both identifiers are opaque strings handed to us by someone else: user ids
//! come from the identity provider, jutsu ids are minted by the client from a
//! millisecond timestamp. Neither is a UUID.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

// ============================================================================
// UserId
// ============================================================================

/// Identity-provider user id. Also the document id of the user's character
/// and, for admins, of their admin settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a validated user id (non-empty, trimmed).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the id is empty after trimming.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("User id cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> String {
        id.0
    }
}

// ============================================================================
// JutsuId
// ============================================================================

/// Id of a jutsu inside a character's list. Unique within that list only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JutsuId(String);

impl JutsuId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id derived from a millisecond timestamp.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JutsuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JutsuId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for JutsuId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
