//! Collapsible and dismissible panel widgets.
//!
//! The sidebar relies on Bootstrap's `Collapse` and `Offcanvas` components for
//! animation and layout. This trait is the whole surface the controller uses;
//! it never re-implements expand/collapse itself.

use serde::Serialize;

/// Options passed when creating a collapse instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollapseConfig {
    /// Toggle the panel immediately on creation.
    pub toggle: bool,
}

/// Widget operations on panels identified by node `N`.
///
/// The `bool` results report whether a widget instance existed to act on.
pub trait PanelWidgets<N> {
    /// Whether a collapse instance is attached to `panel`.
    fn has_collapse(&self, panel: &N) -> bool;
    fn create_collapse(&self, panel: &N, config: CollapseConfig);
    fn toggle_collapse(&self, panel: &N) -> bool;
    fn hide_collapse(&self, panel: &N) -> bool;
    /// Dismiss the offcanvas instance attached to `container`.
    fn hide_offcanvas(&self, container: &N) -> bool;

    /// Attach a collapse instance unless one already exists.
    ///
    /// Returns `true` when a new instance was created.
    fn ensure_collapse(&self, panel: &N) -> bool {
        if self.has_collapse(panel) {
            return false;
        }
        self.create_collapse(panel, CollapseConfig { toggle: false });
        true
    }
}
