//! Notification center for managing toast lifecycle
//!
//! Owns the authoritative active set and its expiry schedule:
//! - Identifier allocation (per center, monotonically increasing)
//! - Timed expiry through spawned tokio sleeps
//! - Manual dismissal that aborts the pending timer
//! - Snapshot publication to subscribers
//!
//! Expiry, dismissal and overflow eviction all go through one removal
//! routine, so whichever trigger comes first wins and the rest are no-ops.

use crate::config::CenterConfig;
use crate::subscription::{Snapshot, Subscription};
use crate::types::{Notification, NotificationId, NotificationKind};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// Handle on a notification center
///
/// Cheap to clone; every clone drives the same active set. Pass it
/// explicitly to the code that raises notifications, or bind it to a
/// [`Session`](crate::session::Session) scope for ambient lookup.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    config: CenterConfig,
    state: Mutex<State>,
    snapshots: watch::Sender<Snapshot>,
}

#[derive(Debug, Default)]
struct State {
    /// Active entries in insertion order
    entries: IndexMap<NotificationId, Notification>,
    /// Pending expiry per timed entry
    timers: HashMap<NotificationId, AbortHandle>,
    /// Last issued id (0 = none yet)
    last_id: u64,
    /// Version of the last published snapshot
    version: u64,
    /// Set once the owning session has ended
    closed: bool,
}

impl State {
    fn allocate_id(&mut self) -> NotificationId {
        self.last_id += 1;
        NotificationId(self.last_id)
    }

    fn remove(&mut self, id: NotificationId) -> Option<Notification> {
        if let Some(timer) = self.timers.remove(&id) {
            timer.abort();
        }
        self.entries.shift_remove(&id)
    }

    fn next_snapshot(&mut self) -> Snapshot {
        self.version += 1;
        Snapshot {
            version: self.version,
            entries: self.entries.values().cloned().collect(),
        }
    }
}

impl Shared {
    /// Must be called with the state lock held so publications follow
    /// mutation order.
    fn publish(&self, state: &mut State) {
        self.snapshots.send_replace(state.next_snapshot());
    }

    fn expire(&self, id: NotificationId) {
        let mut state = self.state.lock();
        // The firing task owns this handle; drop it without aborting.
        state.timers.remove(&id);
        if let Some(expired) = state.remove(id) {
            tracing::debug!("Notification {} expired after {}ms", id, expired.duration_ms);
            self.publish(&mut state);
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        for (_, timer) in self.state.get_mut().timers.drain() {
            timer.abort();
        }
    }
}

impl NotificationCenter {
    /// Create a center with the given configuration
    ///
    /// A `max_visible` of zero is raised to one; the newest entry is
    /// always shown.
    #[must_use]
    pub fn new(mut config: CenterConfig) -> Self {
        if config.max_visible == Some(0) {
            tracing::warn!("max_visible = 0 is not allowed, using 1");
            config.max_visible = Some(1);
        }
        let (snapshots, _) = watch::channel(Snapshot::default());
        Self {
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(State::default()),
                snapshots,
            }),
        }
    }

    /// Show a notification with the configured default duration
    ///
    /// Must run inside a tokio runtime unless the default duration is 0.
    pub fn show(&self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        self.show_for(kind, message, self.shared.config.default_duration_ms)
    }

    /// Show a notification that expires after `duration_ms` (0 = never)
    ///
    /// The entry is in the active set, and published to subscribers, by the
    /// time this returns. Never fails. On a center whose session has ended
    /// the id is still issued but nothing is shown.
    ///
    /// # Panics
    /// If `duration_ms > 0` and no tokio runtime is running.
    pub fn show_for(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        duration_ms: u64,
    ) -> NotificationId {
        let mut state = self.shared.state.lock();
        let id = state.allocate_id();

        if state.closed {
            tracing::warn!("Notification {} raised after session end, ignored", id);
            return id;
        }

        if let Some(max) = self.shared.config.max_visible {
            while state.entries.len() >= max {
                let Some(oldest) = state.entries.first().map(|(oldest, _)| *oldest) else {
                    break;
                };
                state.remove(oldest);
                tracing::debug!("Notification {} evicted (max_visible = {})", oldest, max);
            }
        }

        let notification = Notification::new(id, kind, message, duration_ms);
        if let Some(delay) = notification.expiry() {
            let deadline = Instant::now() + delay;
            let timer = spawn_expiry(Arc::downgrade(&self.shared), id, deadline);
            state.timers.insert(id, timer);
        }

        tracing::debug!("Notification {} shown ({}, {}ms)", id, kind, duration_ms);
        state.entries.insert(id, notification);
        self.shared.publish(&mut state);
        id
    }

    /// Show a success notification
    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show(NotificationKind::Success, message)
    }

    /// Show a success notification with explicit duration
    pub fn success_for(&self, message: impl Into<String>, duration_ms: u64) -> NotificationId {
        self.show_for(NotificationKind::Success, message, duration_ms)
    }

    /// Show an error notification
    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show(NotificationKind::Error, message)
    }

    /// Show an error notification with explicit duration
    pub fn error_for(&self, message: impl Into<String>, duration_ms: u64) -> NotificationId {
        self.show_for(NotificationKind::Error, message, duration_ms)
    }

    /// Show an info notification
    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.show(NotificationKind::Info, message)
    }

    /// Show an info notification with explicit duration
    pub fn info_for(&self, message: impl Into<String>, duration_ms: u64) -> NotificationId {
        self.show_for(NotificationKind::Info, message, duration_ms)
    }

    /// Show a warning notification
    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.show(NotificationKind::Warning, message)
    }

    /// Show a warning notification with explicit duration
    pub fn warning_for(&self, message: impl Into<String>, duration_ms: u64) -> NotificationId {
        self.show_for(NotificationKind::Warning, message, duration_ms)
    }

    /// Remove a notification and cancel its expiry
    ///
    /// Unknown or already removed ids are ignored. Returns true if an entry
    /// was removed.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut state = self.shared.state.lock();
        if state.remove(id).is_none() {
            return false;
        }
        tracing::debug!("Notification {} dismissed", id);
        self.shared.publish(&mut state);
        true
    }

    /// Dismiss every active notification
    pub fn clear(&self) {
        let mut state = self.shared.state.lock();
        if state.entries.is_empty() {
            return;
        }
        let ids: Vec<NotificationId> = state.entries.keys().copied().collect();
        for id in &ids {
            state.remove(*id);
        }
        tracing::debug!("Cleared {} notifications", ids.len());
        self.shared.publish(&mut state);
    }

    /// Cancel all timers, drop all entries and refuse further shows
    ///
    /// Called when the hosting session ends. Idempotent.
    pub fn shutdown(&self) {
        let mut state = self.shared.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;

        let cancelled = state.timers.len();
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
        let dropped = state.entries.len();
        state.entries.clear();

        self.shared.publish(&mut state);
        tracing::info!(
            "Notification center shut down ({} entries dropped, {} timers cancelled)",
            dropped,
            cancelled
        );
    }

    /// Subscribe to snapshots of the active set
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription::new(self.shared.snapshots.subscribe())
    }

    /// Active entries, oldest first
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        self.shared.state.lock().entries.values().cloned().collect()
    }

    /// Look up an active entry
    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.shared.state.lock().entries.get(&id).cloned()
    }

    /// Check if an entry is active
    #[must_use]
    pub fn contains(&self, id: NotificationId) -> bool {
        self.shared.state.lock().entries.contains_key(&id)
    }

    /// Number of active entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.state.lock().entries.len()
    }

    /// Check if no entry is active
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().entries.is_empty()
    }

    /// Number of scheduled expiry timers
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.shared.state.lock().timers.len()
    }

    /// Check if the owning session has ended
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    /// Configuration this center was built with
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CenterConfig {
        &self.shared.config
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(CenterConfig::default())
    }
}

/// Spawn the one-shot expiry for `id`
///
/// The deadline is fixed by the caller at `show` time, not when the task
/// is first polled. Holds only a weak reference, so a pending timer never
/// keeps a dropped center alive.
fn spawn_expiry(shared: Weak<Shared>, id: NotificationId, deadline: Instant) -> AbortHandle {
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        if let Some(shared) = shared.upgrade() {
            shared.expire(id);
        }
    })
    .abort_handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::{advance_ms, settle, settle_until};
    use std::time::Duration;
    use std::collections::HashSet;

    fn messages(center: &NotificationCenter) -> Vec<String> {
        center.active().into_iter().map(|n| n.message).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn show_is_visible_immediately() {
        let center = NotificationCenter::default();
        let id = center.success("Saved");

        let active = center.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, id);
        assert_eq!(active[0].message, "Saved");
        assert_eq!(active[0].kind, NotificationKind::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn ids_are_unique_and_increasing() {
        let center = NotificationCenter::default();
        let ids: Vec<NotificationId> = (0..50).map(|i| center.info(format!("n{i}"))).collect();

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn ids_not_reused_after_removal() {
        let center = NotificationCenter::default();
        let first = center.show_for(NotificationKind::Info, "a", 0);
        center.dismiss(first);
        let second = center.show_for(NotificationKind::Info, "b", 0);
        assert!(second > first);
    }

    #[tokio::test(start_paused = true)]
    async fn default_duration_expires_at_boundary() {
        let center = NotificationCenter::default();
        center.success("Auto dismiss");

        advance_ms(2999).await;
        assert_eq!(messages(&center), vec!["Auto dismiss"]);

        advance_ms(1).await;
        assert!(center.is_empty());
        assert_eq!(center.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_duration_expires_at_boundary() {
        let center = NotificationCenter::default();
        center.success_for("Custom", 5000);

        advance_ms(3000).await;
        assert_eq!(messages(&center), vec!["Custom"]);
        advance_ms(1999).await;
        assert_eq!(messages(&center), vec!["Custom"]);
        advance_ms(1).await;
        assert!(center.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_persists() {
        let center = NotificationCenter::default();
        center.success_for("Persist", 0);
        assert_eq!(center.pending_timers(), 0);

        advance_ms(10_000).await;
        assert_eq!(messages(&center), vec!["Persist"]);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_dismiss_is_idempotent() {
        let center = NotificationCenter::default();
        let id = center.info_for("Manual", 0);

        assert!(center.dismiss(id));
        assert!(center.is_empty());
        assert!(!center.dismiss(id));
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_unknown_id_is_noop() {
        let center = NotificationCenter::default();
        center.info_for("keep", 0);
        let before = center.subscribe().current().version;

        assert!(!center.dismiss(NotificationId(9_999_999)));
        assert_eq!(messages(&center), vec!["keep"]);
        assert_eq!(center.subscribe().current().version, before);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_cancels_pending_timer() {
        let center = NotificationCenter::default();
        let id = center.warning("Going");
        assert_eq!(center.pending_timers(), 1);

        center.dismiss(id);
        assert_eq!(center.pending_timers(), 0);

        let later = center.warning_for("Later", 0);
        advance_ms(5000).await;
        assert!(center.contains(later));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_entries_keep_insertion_order() {
        let center = NotificationCenter::default();
        center.success("First");
        center.error("Second");
        center.info("Third");

        advance_ms(1000).await;
        assert_eq!(messages(&center), vec!["First", "Second", "Third"]);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_follows_duration_order() {
        let center = NotificationCenter::default();
        center.info_for("slow", 2000);
        center.info_for("fast", 500);

        advance_ms(500).await;
        assert_eq!(messages(&center), vec!["slow"]);
        advance_ms(1500).await;
        assert!(center.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn overflow_evicts_oldest() {
        let center = NotificationCenter::new(CenterConfig::new().with_max_visible(Some(2)));
        let first = center.info("one");
        center.info("two");
        center.info("three");

        assert_eq!(messages(&center), vec!["two", "three"]);
        assert!(!center.contains(first));
        assert_eq!(center.pending_timers(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_cancels_everything() {
        let center = NotificationCenter::default();
        center.info("a");
        center.info_for("b", 0);

        center.clear();
        assert!(center.is_empty());
        assert_eq!(center.pending_timers(), 0);
        assert!(!center.is_closed());

        center.info_for("c", 0);
        assert_eq!(messages(&center), vec!["c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_closes_center() {
        let center = NotificationCenter::default();
        center.info("a");
        center.info("b");

        center.shutdown();
        assert!(center.is_closed());
        assert!(center.is_empty());
        assert_eq!(center.pending_timers(), 0);

        let id = center.info("after");
        assert!(!center.contains(id));
        assert_eq!(center.pending_timers(), 0);

        // Idempotent
        center.shutdown();
        assert!(center.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn snapshots_follow_mutations() {
        let center = NotificationCenter::default();
        let mut subscription = center.subscribe();

        center.success("First");
        center.success("Second");

        let snapshot = subscription.changed().await.unwrap();
        assert_eq!(snapshot.version, 2);
        assert_eq!(snapshot.messages(), vec!["First", "Second"]);
        assert!(!subscription.has_changed());

        advance_ms(3000).await;
        let snapshot = subscription.changed().await.unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.version >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn centers_have_independent_counters() {
        let a = NotificationCenter::default();
        let b = NotificationCenter::default();

        assert_eq!(a.info_for("x", 0), NotificationId(1));
        assert_eq!(b.info_for("y", 0), NotificationId(1));
        assert_eq!(a.info_for("z", 0), NotificationId(2));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_center_releases_timer_tasks() {
        let metrics = tokio::runtime::Handle::current().metrics();
        let baseline = metrics.num_alive_tasks();

        let center = NotificationCenter::default();
        for i in 0..100 {
            center.info_for(format!("orphan {i}"), 60_000);
        }
        settle().await;
        assert_eq!(metrics.num_alive_tasks(), baseline + 100);

        drop(center);
        assert!(settle_until(|| metrics.num_alive_tasks() == baseline, 64).await);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_is_fixed_at_show_time() {
        let center = NotificationCenter::default();
        let id = center.info("anchored");

        // Clock moves before the timer task is ever polled.
        tokio::time::advance(Duration::from_millis(2999)).await;
        settle().await;
        assert!(center.contains(id));

        advance_ms(1).await;
        assert!(!center.contains(id));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_cap_still_bounds_active_set() {
        let center = NotificationCenter::new(CenterConfig::new().with_max_visible(Some(0)));
        assert_eq!(center.config().max_visible, Some(1));

        center.info_for("first", 0);
        let second = center.info_for("second", 0);
        assert_eq!(center.len(), 1);
        assert!(center.contains(second));
    }

    #[test]
    fn persistent_entries_need_no_runtime() {
        let center = NotificationCenter::default();
        let id = center.error_for("no runtime", 0);
        assert!(center.contains(id));
        assert!(center.dismiss(id));
    }
}
