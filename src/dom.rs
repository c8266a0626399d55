//! DOM access capability.
//!
//! DESIGN
//! ======
//! The toggler and the sidebar controller never touch `web_sys` directly. They
//! talk to a [`Dom`] implementation: the browser one lives in `web`, and the
//! tests drive an in-memory tree. Every lookup the components perform is a
//! [`Query`] variant, so the CSS selector text exists in exactly one place and
//! the fake tree can match the same shapes structurally.

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

use std::fmt::Debug;

use crate::error::UiError;
use crate::event::EventKind;

/// Structural queries issued by the components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// `input`, `select` and `textarea` controls inside a form group.
    FormControls,
    /// Clickable list entries used to pre-fill the form.
    ListEntries,
    /// Links that toggle a collapsible panel.
    CollapseTriggers,
    /// Every sidebar navigation link.
    NavLinks,
    /// Navigation links that are not collapse triggers.
    PlainNavLinks,
    /// Collapsible panels currently expanded.
    OpenPanels,
    /// Arrow icon inside a collapse trigger.
    ArrowIcon,
    /// Element with the given id.
    Id(String),
}

impl Query {
    /// CSS selector equivalent, for hosts backed by `querySelectorAll`.
    #[must_use]
    pub fn selector(&self) -> String {
        match self {
            Self::FormControls => "input, select, textarea".into(),
            Self::ListEntries => ".list-group-item.hoverable-item".into(),
            Self::CollapseTriggers => r#"a[data-bs-toggle="collapse"]"#.into(),
            Self::NavLinks => "a.nav-link".into(),
            Self::PlainNavLinks => r#"a.nav-link:not([data-bs-toggle="collapse"])"#.into(),
            Self::OpenPanels => ".collapse.show".into(),
            Self::ArrowIcon => ".dropdown-arrow".into(),
            // Attribute form accepts ids a `#` selector would reject (leading digits).
            Self::Id(id) => format!(r#"[id="{}"]"#, id.replace('\\', "\\\\").replace('"', "\\\"")),
        }
    }
}

/// How a form control is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Checkbox or radio: reset by unchecking.
    Checkable,
    /// Anything holding a value: reset to the empty string.
    Valued,
}

/// Read and write access to the live document.
///
/// Methods take `&self`; the browser document is shared mutable state and the
/// fake mirrors that with interior mutability.
pub trait Dom {
    type Node: Clone + PartialEq + Debug;

    /// Stable ancestor used for delegated listeners.
    fn document_root(&self) -> Self::Node;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Descendants of `scope` matching `query`, in document order.
    fn query_all(&self, scope: &Self::Node, query: &Query) -> Vec<Self::Node>;

    /// First descendant of `scope` matching `query`.
    fn query_first(&self, scope: &Self::Node, query: &Query) -> Option<Self::Node> {
        self.query_all(scope, query).into_iter().next()
    }

    fn matches(&self, node: &Self::Node, query: &Query) -> bool;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&self, node: &Self::Node, name: &str);

    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);

    /// Current value of a form control; empty for other elements.
    fn value(&self, node: &Self::Node) -> String;
    fn set_value(&self, node: &Self::Node, value: &str);

    fn is_checked(&self, node: &Self::Node) -> bool;
    fn set_checked(&self, node: &Self::Node, checked: bool);

    fn control_kind(&self, node: &Self::Node) -> ControlKind;

    /// Concatenated text of the node and its descendants.
    fn text_content(&self, node: &Self::Node) -> String;

    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    /// Layout viewport width in CSS pixels.
    fn viewport_width(&self) -> f64;

    /// Whether `node` is still attached to the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Install a host listener for `kind` on `node`.
    ///
    /// Called at most once per `(node, kind)` by [`crate::binding::BindingTable`].
    /// For [`EventKind::Mutation`] the host observes the node's subtree for
    /// added children instead.
    fn listen(&self, node: &Self::Node, kind: EventKind);

    /// Remove the listener installed by [`Dom::listen`] and release it.
    fn unlisten(&self, node: &Self::Node, kind: EventKind);
}

/// Look up an element the operation cannot do without.
///
/// # Errors
///
/// Returns [`UiError::MissingElement`] when no element has `id`.
pub fn require<D: Dom>(dom: &D, id: &str) -> Result<D::Node, UiError> {
    dom.element_by_id(id).ok_or_else(|| UiError::MissingElement(id.to_owned()))
}

/// Show an element by dropping its `hidden` attribute.
pub fn show<D: Dom>(dom: &D, node: &D::Node) {
    dom.remove_attribute(node, crate::consts::ATTR_HIDDEN);
}

/// Hide an element with the `hidden` attribute.
pub fn hide<D: Dom>(dom: &D, node: &D::Node) {
    dom.set_attribute(node, crate::consts::ATTR_HIDDEN, "");
}

/// Whether an element currently carries the `hidden` attribute.
pub fn is_hidden<D: Dom>(dom: &D, node: &D::Node) -> bool {
    dom.attribute(node, crate::consts::ATTR_HIDDEN).is_some()
}
