//! Plain-text rendering of the active set
//!
//! Display order is newest first; the center's canonical order (oldest
//! first) is reversed here and only here.

use crate::types::Notification;

/// Render one entry as `<icon> [kind] message`
#[must_use]
pub fn render_line(notification: &Notification) -> String {
    format!(
        "{} [{}] {}",
        notification.kind.icon(),
        notification.kind,
        notification.message
    )
}

/// Render entries newest first
#[must_use]
pub fn render_lines(entries: &[Notification]) -> Vec<String> {
    entries.iter().rev().map(render_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NotificationId, NotificationKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn newest_first() {
        let entries = vec![
            Notification::new(NotificationId(1), NotificationKind::Success, "Event created", 0),
            Notification::new(NotificationId(2), NotificationKind::Error, "Invite failed", 0),
        ];

        assert_eq!(
            render_lines(&entries),
            vec![
                "✕ [error] Invite failed".to_string(),
                "✓ [success] Event created".to_string(),
            ]
        );
    }

    #[test]
    fn empty_message_renders() {
        let n = Notification::new(NotificationId(3), NotificationKind::Info, "", 0);
        assert_eq!(render_line(&n), "ℹ [info] ");
    }
}
