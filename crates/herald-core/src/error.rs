//! Error types for Herald
//!
//! The center itself has no data errors: `show` and `dismiss` accept any
//! input. What remains are:
//! - Usage errors (reading the ambient center outside a session)
//! - Parse errors for textual kinds
//! - Configuration loading failures

/// Message carried by [`HeraldError::OutsideSession`]
pub const OUTSIDE_SESSION_MESSAGE: &str = "notifications must be used within an active session";

/// Main Herald error type
#[derive(Debug, thiserror::Error)]
pub enum HeraldError {
    /// Ambient center requested with no session in scope
    #[error("notifications must be used within an active session")]
    OutsideSession,

    /// Textual kind is not one of the recognized kinds
    #[error("unknown notification kind: {0}")]
    UnknownKind(String),

    /// Configuration could not be parsed or is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl HeraldError {
    /// Check if error is a structural integration mistake
    ///
    /// Usage errors are never retried; the fix is wiring the caller to a
    /// live session.
    #[inline]
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::OutsideSession)
    }
}

impl From<toml::de::Error> for HeraldError {
    fn from(value: toml::de::Error) -> Self {
        HeraldError::Config(value.to_string())
    }
}
