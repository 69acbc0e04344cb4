//! Testing utilities for Herald workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]

use herald_core::{CenterConfig, NotificationCenter, NotificationId, Session};

pub use herald_core::test_harness::{advance, advance_ms, settle, settle_until};

pub fn setup_test_center() -> NotificationCenter {
    NotificationCenter::new(CenterConfig::new())
}

pub fn setup_bounded_center(max_visible: usize) -> NotificationCenter {
    NotificationCenter::new(CenterConfig::new().with_max_visible(Some(max_visible)))
}

pub fn setup_test_session() -> Session {
    Session::start(CenterConfig::new())
}

/// Active messages, oldest first
pub fn messages(center: &NotificationCenter) -> Vec<String> {
    center.active().into_iter().map(|n| n.message).collect()
}

/// Active ids, oldest first
pub fn ids(center: &NotificationCenter) -> Vec<NotificationId> {
    center.active().into_iter().map(|n| n.id).collect()
}

/// Number of active entries carrying `message`
pub fn count_message(center: &NotificationCenter, message: &str) -> usize {
    center
        .active()
        .iter()
        .filter(|n| n.message == message)
        .count()
}

#[track_caller]
pub fn assert_visible(center: &NotificationCenter, message: &str) {
    assert_eq!(
        count_message(center, message),
        1,
        "expected {message:?} exactly once in {:?}",
        messages(center)
    );
}

#[track_caller]
pub fn assert_absent(center: &NotificationCenter, message: &str) {
    assert_eq!(
        count_message(center, message),
        0,
        "expected {message:?} to be gone from {:?}",
        messages(center)
    );
}
