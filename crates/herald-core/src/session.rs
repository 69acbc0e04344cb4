//! Session scope
//!
//! A [`Session`] owns the one center of an application session. Ending the
//! session (dropping it) cancels every pending timer and closes the center.
//!
//! Code deep in a call chain can reach the session's center through
//! [`current`], but only while running inside [`Session::scope`] or
//! [`Session::enter`]. Outside a scope `current` fails with
//! [`HeraldError::OutsideSession`] rather than handing back an empty center.

use crate::center::NotificationCenter;
use crate::config::CenterConfig;
use crate::error::HeraldError;
use std::future::Future;

tokio::task_local! {
    static CURRENT: NotificationCenter;
}

/// RAII owner of a notification center
#[derive(Debug)]
pub struct Session {
    center: NotificationCenter,
}

impl Session {
    /// Start a session with a fresh center
    #[must_use]
    pub fn start(config: CenterConfig) -> Self {
        tracing::info!(
            "Notification session started (default {}ms, max_visible {:?})",
            config.default_duration_ms,
            config.max_visible
        );
        Self {
            center: NotificationCenter::new(config),
        }
    }

    /// The session's center
    #[inline]
    #[must_use]
    pub fn center(&self) -> &NotificationCenter {
        &self.center
    }

    /// Run a future with this session's center as the ambient center
    pub async fn scope<F>(&self, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(self.center.clone(), future).await
    }

    /// Run a closure with this session's center as the ambient center
    pub fn enter<R>(&self, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(self.center.clone(), f)
    }

    /// End the session now
    pub fn end(self) {
        drop(self);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.center.shutdown();
        tracing::info!("Notification session ended");
    }
}

/// The ambient center of the enclosing session scope
///
/// # Errors
/// - `HeraldError::OutsideSession` if no session scope is active
pub fn current() -> Result<NotificationCenter, HeraldError> {
    CURRENT
        .try_with(NotificationCenter::clone)
        .map_err(|_| HeraldError::OutsideSession)
}
