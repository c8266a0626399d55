//! Runtime configuration for the menus UI.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page passes an optional JSON object at startup. Every field has a
//! default matching the admin templates, so an empty object (or no object at
//! all) yields a working configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{LABEL_MAX_CHARS, NARROW_VIEWPORT_PX, SIDEBAR_ID};
use crate::error::UiError;

/// Tunables for the form toggler, the sidebar controller and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Id of the sidebar offcanvas container.
    pub sidebar_id: String,
    /// Viewport width below which plain link clicks close the sidebar.
    pub narrow_viewport_px: f64,
    /// Maximum characters copied into the label input.
    pub label_max_chars: usize,
    /// Console log level (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sidebar_id: SIDEBAR_ID.to_owned(),
            narrow_viewport_px: NARROW_VIEWPORT_PX,
            label_max_chars: LABEL_MAX_CHARS,
            log_level: "info".to_owned(),
        }
    }
}

impl UiConfig {
    /// Parse and validate a JSON configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Config`] for malformed JSON and
    /// [`UiError::InvalidConfig`] when a field holds an unusable value.
    pub fn from_json(raw: &str) -> Result<Self, UiError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field ranges.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), UiError> {
        if self.sidebar_id.trim().is_empty() {
            return Err(UiError::InvalidConfig("sidebar_id must not be empty".into()));
        }
        if !self.narrow_viewport_px.is_finite() || self.narrow_viewport_px <= 0.0 {
            return Err(UiError::InvalidConfig(format!(
                "narrow_viewport_px must be positive, got {}",
                self.narrow_viewport_px
            )));
        }
        if self.label_max_chars == 0 {
            return Err(UiError::InvalidConfig("label_max_chars must be at least 1".into()));
        }
        self.level()?;
        Ok(())
    }

    /// The configured log level.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidConfig`] for an unknown level name.
    pub fn level(&self) -> Result<log::Level, UiError> {
        log::Level::from_str(self.log_level.trim())
            .map_err(|_| UiError::InvalidConfig(format!("unknown log level: {}", self.log_level)))
    }
}
