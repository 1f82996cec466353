//! Admin claims from configuration.

use std::collections::HashSet;

use async_trait::async_trait;
use eragenetica_domain::{Identity, UserId};

use crate::infrastructure::ports::{ClaimsError, ClaimsPort};

/// Grants the `admin` claim to a fixed set of user ids.
pub struct ConfiguredClaims {
    admins: HashSet<UserId>,
}

impl ConfiguredClaims {
    pub fn new(admins: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ClaimsPort for ConfiguredClaims {
    async fn refresh_claims(&self, uid: &UserId) -> Result<Identity, ClaimsError> {
        Ok(Identity::new(uid.clone(), self.admins.contains(uid)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn only_listed_ids_are_admins() {
        let gm = UserId::new("gm").unwrap();
        let player = UserId::new("p1").unwrap();
        let claims = ConfiguredClaims::new([gm.clone()]);

        assert!(claims.refresh_claims(&gm).await.unwrap().is_admin());
        let identity = claims.refresh_claims(&player).await.unwrap();
        assert!(!identity.is_admin());
        assert_eq!(identity.uid(), &player);
    }
}
