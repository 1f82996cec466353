//! Identity provider port.

use async_trait::async_trait;
use eragenetica_domain::{Identity, UserId};

use super::error::ClaimsError;

/// Source of the `admin` claim. Consulted on every request so a granted or
/// revoked claim takes effect without a new session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimsPort: Send + Sync {
    async fn refresh_claims(&self, uid: &UserId) -> Result<Identity, ClaimsError>;
}
