//! Event types delivered from the host page into [`crate::ui::MenuUi`].
//!
//! The host owns the real listeners; it wraps each delivery in a [`DomEvent`]
//! and applies the returned [`Outcome`] to the native event.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

/// Kinds of events the menus UI listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Value of a form control changed.
    Change,
    /// Pointer activation of a link or list entry.
    Click,
    /// Collapse widget is about to expand a panel.
    CollapseShow,
    /// Collapse widget is about to collapse a panel.
    CollapseHide,
    /// Offcanvas widget is about to dismiss the sidebar.
    OffcanvasHide,
    /// Nodes were added somewhere below the observed element.
    Mutation,
}

impl EventKind {
    /// Event type name as dispatched by the browser or the widget library.
    ///
    /// `Mutation` has no DOM event; hosts back it with a subtree observer.
    #[must_use]
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Click => "click",
            Self::CollapseShow => "show.bs.collapse",
            Self::CollapseHide => "hide.bs.collapse",
            Self::OffcanvasHide => "hide.bs.offcanvas",
            Self::Mutation => "childList",
        }
    }
}

/// One event delivery at one listening node.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent<N> {
    pub kind: EventKind,
    /// Node whose listener is being invoked.
    pub current: N,
    /// Node the event was dispatched on. Differs from `current` when the
    /// event bubbled up to a delegating ancestor.
    pub origin: N,
    /// Element nodes added to the subtree (`Mutation` only).
    pub added: Vec<N>,
}

impl<N: Clone> DomEvent<N> {
    /// An event dispatched directly on the listening node.
    pub fn at(kind: EventKind, node: N) -> Self {
        Self { kind, current: node.clone(), origin: node, added: Vec::new() }
    }

    /// An event that bubbled from `origin` to `current`.
    pub fn bubbled(kind: EventKind, current: N, origin: N) -> Self {
        Self { kind, current, origin, added: Vec::new() }
    }

    /// A subtree mutation observed at `root`.
    pub fn mutation(root: N, added: Vec<N>) -> Self {
        Self { kind: EventKind::Mutation, current: root.clone(), origin: root, added }
    }
}

impl<N: PartialEq> DomEvent<N> {
    /// Whether the event was dispatched on the listening node itself.
    #[must_use]
    pub fn is_at_target(&self) -> bool {
        self.current == self.origin
    }
}

/// What the host should do with the native event after handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl Outcome {
    /// Cancel the default action and stop bubbling.
    #[must_use]
    pub fn consumed() -> Self {
        Self { prevent_default: true, stop_propagation: true }
    }

    /// Combine two outcomes; any requested cancellation sticks.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            prevent_default: self.prevent_default || other.prevent_default,
            stop_propagation: self.stop_propagation || other.stop_propagation,
        }
    }
}
