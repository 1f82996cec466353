//! Live per-user sessions.
//!
//! Each caller gets one character sheet and, for admins, one roster kept
//! alive between requests. A roster session owns a feed task that applies
//! store snapshots as they arrive; dropping the session stops the feed and
//! cancels its subscription.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use eragenetica_domain::{Identity, UserId};

use crate::app::App;
use crate::infrastructure::ports::CharacterSubscription;
use crate::use_cases::{AdminRoster, CharacterSheet, RosterError};

pub type SharedSheet = Arc<Mutex<CharacterSheet>>;
pub type SharedRoster = Arc<Mutex<AdminRoster>>;

pub struct RosterSession {
    roster: SharedRoster,
    feed: Option<JoinHandle<()>>,
}

impl RosterSession {
    pub fn roster(&self) -> &SharedRoster {
        &self.roster
    }

    /// Whether snapshots are still being applied.
    pub fn is_live(&self) -> bool {
        self.feed.as_ref().is_some_and(|feed| !feed.is_finished())
    }
}

impl Drop for RosterSession {
    fn drop(&mut self) {
        if let Some(feed) = self.feed.take() {
            feed.abort();
        }
    }
}

pub struct SessionRegistry {
    sheets: DashMap<UserId, SharedSheet>,
    rosters: DashMap<UserId, Arc<RosterSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sheets: DashMap::new(),
            rosters: DashMap::new(),
        }
    }

    /// The caller's sheet, opened on first use. Not loaded yet.
    pub fn sheet(&self, app: &App, identity: &Identity) -> SharedSheet {
        self.sheets
            .entry(identity.uid().clone())
            .or_insert_with(|| {
                tracing::debug!(user_id = %identity.uid(), "Opening character sheet session");
                Arc::new(Mutex::new(app.use_cases.character_sheet.open(identity.clone())))
            })
            .clone()
    }

    /// The admin's roster, subscribed on first use.
    ///
    /// A failed subscription still yields a session; the roster carries the
    /// error and later requests fall back to one-off reads.
    pub async fn roster(
        &self,
        app: &App,
        identity: &Identity,
    ) -> Result<Arc<RosterSession>, RosterError> {
        if let Some(session) = self.rosters.get(identity.uid()) {
            return Ok(session.clone());
        }

        let mut roster = app.use_cases.roster.open(identity.clone())?;
        let feed = match roster.subscribe().await {
            Ok(mut subscription) => {
                if let Some(snapshot) = subscription.next().await {
                    roster.apply_snapshot(snapshot);
                }
                Some(subscription)
            }
            Err(_) => None,
        };

        let roster = Arc::new(Mutex::new(roster));
        let session = Arc::new(RosterSession {
            feed: feed.map(|subscription| spawn_feed(roster.clone(), subscription)),
            roster,
        });

        tracing::info!(admin_id = %identity.uid(), live = session.is_live(), "Roster session opened");
        Ok(self
            .rosters
            .entry(identity.uid().clone())
            .or_insert(session)
            .clone())
    }

    /// Drop every live session of `uid`.
    pub fn end(&self, uid: &UserId) -> bool {
        let sheet = self.sheets.remove(uid).is_some();
        let roster = self.rosters.remove(uid).is_some();
        sheet || roster
    }

    pub fn has_sessions(&self, uid: &UserId) -> bool {
        self.sheets.contains_key(uid) || self.rosters.contains_key(uid)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_feed(roster: SharedRoster, mut subscription: CharacterSubscription) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(snapshot) = subscription.next().await {
            roster.lock().await.apply_snapshot(snapshot);
        }
        tracing::debug!("Roster feed ended");
    })
}
