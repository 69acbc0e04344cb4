//! Read model for renderers
//!
//! Every mutation of the active set publishes a new [`Snapshot`]. A
//! renderer holds a [`Subscription`] and redraws from the latest one.

use crate::types::Notification;
use tokio::sync::watch;

/// Published copy of the active set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Bumped on every publication
    pub version: u64,
    /// Active entries, oldest first
    pub entries: Vec<Notification>,
}

impl Snapshot {
    /// Check if no entry is active
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Messages in insertion order
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|n| n.message.as_str()).collect()
    }
}

/// Renderer-side handle on the published snapshots
#[derive(Debug, Clone)]
pub struct Subscription {
    receiver: watch::Receiver<Snapshot>,
}

impl Subscription {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        Self { receiver }
    }

    /// Latest published snapshot
    #[must_use]
    pub fn current(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next publication
    ///
    /// Returns `None` once every handle on the center has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Check if a publication arrived since the last `changed`
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }
}
