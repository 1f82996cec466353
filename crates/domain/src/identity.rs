//! Authenticated caller identity.
//!
//! Issued and refreshed by the external identity provider; this crate only
//! carries it around and reads the `admin` claim.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// The authenticated caller and its current `admin` claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    uid: UserId,
    admin: bool,
}

impl Identity {
    pub fn new(uid: UserId, admin: bool) -> Self {
        Self { uid, admin }
    }

    /// A caller without the admin claim.
    pub fn player(uid: UserId) -> Self {
        Self::new(uid, false)
    }

    /// A caller carrying the admin claim.
    pub fn admin(uid: UserId) -> Self {
        Self::new(uid, true)
    }

    #[inline]
    pub fn uid(&self) -> &UserId {
        &self.uid
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Whether the caller owns `id` or is an admin.
    pub fn can_access(&self, id: &UserId) -> bool {
        self.admin || &self.uid == id
    }

    /// Landing route for this caller.
    pub fn landing_route(&self) -> &'static str {
        if self.admin {
            "/admin"
        } else {
            "/character"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    #[test]
    fn player_can_only_access_own_document() {
        let player = Identity::player(uid("p1"));
        assert!(player.can_access(&uid("p1")));
        assert!(!player.can_access(&uid("p2")));
    }

    #[test]
    fn admin_can_access_any_document() {
        let admin = Identity::admin(uid("gm"));
        assert!(admin.can_access(&uid("p1")));
        assert!(admin.can_access(&uid("gm")));
    }

    #[test]
    fn landing_route_follows_claim() {
        assert_eq!(Identity::admin(uid("gm")).landing_route(), "/admin");
        assert_eq!(Identity::player(uid("p1")).landing_route(), "/character");
    }
}
