//! Center configuration
//!
//! Loaded from TOML or built in code:
//!
//! ```toml
//! default_duration_ms = 3000
//! max_visible = 5
//! ```

use crate::error::HeraldError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default auto-dismiss delay in milliseconds
pub const DEFAULT_DURATION_MS: u64 = 3000;

/// Notification center configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterConfig {
    /// Delay used by `show` when the caller gives none
    pub default_duration_ms: u64,
    /// Upper bound on simultaneously active entries (None = unbounded)
    pub max_visible: Option<usize>,
}

impl CenterConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default duration
    #[inline]
    #[must_use]
    pub fn with_default_duration_ms(mut self, duration_ms: u64) -> Self {
        self.default_duration_ms = duration_ms;
        self
    }

    /// With a cap on active entries; the oldest is evicted on overflow
    ///
    /// Not validated here; a center built with `Some(0)` treats it as `Some(1)`.
    #[inline]
    #[must_use]
    pub fn with_max_visible(mut self, max: Option<usize>) -> Self {
        self.max_visible = max;
        self
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// - `HeraldError::Config` if the document is malformed or invalid
    pub fn from_toml_str(source: &str) -> Result<Self, HeraldError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// - `HeraldError::Io` if the file cannot be read
    /// - `HeraldError::Config` if its content is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HeraldError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!("Loading center config from {}", path.as_ref().display());
        Self::from_toml_str(&source)
    }

    /// Check invariants not expressible in the type
    ///
    /// # Errors
    /// - `HeraldError::Config` if `max_visible` is zero
    pub fn validate(&self) -> Result<(), HeraldError> {
        if self.max_visible == Some(0) {
            return Err(HeraldError::Config(
                "max_visible must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: DEFAULT_DURATION_MS,
            max_visible: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = CenterConfig::new();
        assert_eq!(config.default_duration_ms, 3000);
        assert_eq!(config.max_visible, None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = CenterConfig::from_toml_str("max_visible = 3").unwrap();
        assert_eq!(config.default_duration_ms, DEFAULT_DURATION_MS);
        assert_eq!(config.max_visible, Some(3));
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = CenterConfig::from_toml_str("max_visible = 0").unwrap_err();
        assert!(matches!(err, HeraldError::Config(_)));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = CenterConfig::from_toml_str("default_duration_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, HeraldError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_duration_ms = 1200").unwrap();

        let config = CenterConfig::load(file.path()).unwrap();
        assert_eq!(config.default_duration_ms, 1200);
    }

    #[test]
    fn load_missing_file() {
        let err = CenterConfig::load("/nonexistent/herald.toml").unwrap_err();
        assert!(matches!(err, HeraldError::Io(_)));
    }
}
