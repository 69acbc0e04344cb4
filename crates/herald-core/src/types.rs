//! Core types for Herald
//!
//! Defines the fundamental notification types:
//! - Notification identifiers
//! - Notification kinds (render hints)
//! - Notification entries

use crate::error::HeraldError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Unique notification identifier
///
/// Allocated from a per-center counter starting at 1. Never reused for the
/// lifetime of the center that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

impl NotificationId {
    /// Get raw value
    #[inline]
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Notification kind
///
/// Purely descriptive: the renderer picks styling from it, the center's
/// lifecycle never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum NotificationKind {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
    /// Neutral information
    Info,
    /// Something needs attention
    Warning,
}

impl NotificationKind {
    /// Every kind, in declaration order
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::Success,
        NotificationKind::Error,
        NotificationKind::Info,
        NotificationKind::Warning,
    ];

    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        }
    }

    /// Glyph shown next to the message
    #[inline]
    #[must_use]
    pub fn icon(&self) -> char {
        match self {
            NotificationKind::Success => '✓',
            NotificationKind::Error => '✕',
            NotificationKind::Info => 'ℹ',
            NotificationKind::Warning => '⚠',
        }
    }
}

impl Default for NotificationKind {
    fn default() -> Self {
        NotificationKind::Info
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = HeraldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        NotificationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| HeraldError::UnknownKind(s.to_string()))
    }
}

/// A single transient notification
///
/// Immutable once created. A changed message is a dismiss plus a new show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Identifier issued by the center
    pub id: NotificationId,
    /// Render hint
    pub kind: NotificationKind,
    /// User-facing text, opaque to the center
    pub message: String,
    /// Delay before automatic removal; 0 means never
    pub duration_ms: u64,
}

impl Notification {
    /// Create new notification entry
    #[inline]
    #[must_use]
    pub fn new(
        id: NotificationId,
        kind: NotificationKind,
        message: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id,
            kind,
            message: message.into(),
            duration_ms,
        }
    }

    /// Delay until auto-expiry, or `None` for persistent entries
    #[inline]
    #[must_use]
    pub fn expiry(&self) -> Option<Duration> {
        (self.duration_ms > 0).then(|| Duration::from_millis(self.duration_ms))
    }

    /// Check if this entry stays until dismissed
    #[inline]
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.duration_ms == 0
    }
}
