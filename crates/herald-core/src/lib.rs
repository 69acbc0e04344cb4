//! Herald Core - ephemeral notification center
//!
//! Transient, user-visible notifications (toasts) with:
//! - Unique, never reused identifiers per center
//! - Automatic expiry on a tokio timer, cancelled on manual dismiss
//! - An insertion-ordered active set published to subscribers
//! - Session scopes that cancel every pending timer when they end
//!
//! # Example
//!
//! ```rust,no_run
//! use herald_core::{CenterConfig, Session};
//!
//! # async fn example() {
//! let session = Session::start(CenterConfig::new());
//! let center = session.center();
//!
//! let id = center.success("Event created");
//! center.warning_for("Venue not confirmed", 0);
//! center.dismiss(id);
//!
//! for line in herald_core::render::render_lines(&center.active()) {
//!     println!("{line}");
//! }
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod center;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod subscription;
pub mod types;

// Test harness
pub mod test_harness;

// Re-exports for convenience
pub use center::NotificationCenter;
pub use config::{CenterConfig, DEFAULT_DURATION_MS};
pub use error::{HeraldError, OUTSIDE_SESSION_MESSAGE};
pub use session::{current, Session};
pub use subscription::{Snapshot, Subscription};
pub use types::{Notification, NotificationId, NotificationKind};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for raising notifications
    pub use crate::{
        current, CenterConfig, HeraldError, Notification, NotificationCenter, NotificationId,
        NotificationKind, Session, Subscription,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
