//! Error type for the menus UI.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is surfaced to the user. Operations return `UiError` so the
//! event boundary in [`crate::ui`] can log what was skipped; a missing element
//! is an expected condition on pages that only carry part of the markup.

/// Errors raised while syncing form and sidebar state.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    /// An element the operation needs is not present in the page.
    #[error("element not found: #{0}")]
    MissingElement(String),
    /// The configuration JSON could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A call into the browser or the widget library failed.
    #[error("host call failed: {0}")]
    Host(String),
}

impl UiError {
    /// Whether this error only reports markup absent from the current page.
    #[must_use]
    pub fn is_missing_element(&self) -> bool {
        matches!(self, Self::MissingElement(_))
    }
}
