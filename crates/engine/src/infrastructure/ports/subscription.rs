//! Real-time character snapshots.
//!
//! Store adapters own a [`SnapshotPublisher`] and replace the snapshot after
//! every character write. Each subscriber holds a [`CharacterSubscription`];
//! slow subscribers skip intermediate snapshots and only see the latest one.

use tokio::sync::watch;

use super::repos::CharacterRecord;

/// Full collection snapshot, ordered by document id.
pub type Snapshot = Vec<CharacterRecord>;

/// Cancellable stream of full collection snapshots.
#[derive(Debug)]
pub struct CharacterSubscription {
    rx: watch::Receiver<Snapshot>,
    delivered_initial: bool,
    active: bool,
}

impl CharacterSubscription {
    fn new(rx: watch::Receiver<Snapshot>) -> Self {
        Self {
            rx,
            delivered_initial: false,
            active: true,
        }
    }

    /// Subscription that yields `snapshot` once and then ends.
    #[cfg(test)]
    pub fn once(snapshot: Snapshot) -> Self {
        let (_tx, rx) = watch::channel(snapshot);
        Self::new(rx)
    }

    /// The next snapshot. The first call returns the current collection
    /// immediately. `None` once cancelled or when the store goes away.
    pub async fn next(&mut self) -> Option<Snapshot> {
        if !self.active {
            return None;
        }
        if !self.delivered_initial {
            self.delivered_initial = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => {
                self.active = false;
                None
            }
        }
    }

    /// Stop delivery. Later calls to [`next`](Self::next) return `None`.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Sending half owned by a store adapter.
#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: watch::Sender<Snapshot>,
}

impl SnapshotPublisher {
    pub fn new(initial: Snapshot) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the current snapshot and wake every subscriber.
    pub fn publish(&self, snapshot: Snapshot) {
        self.tx.send_replace(snapshot);
    }

    pub fn subscribe(&self) -> CharacterSubscription {
        CharacterSubscription::new(self.tx.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
