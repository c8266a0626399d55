//! Listener registry with attach-once semantics.
//!
//! DESIGN
//! ======
//! Binders run repeatedly: on load, from `initMenusSearchbar`, and after every
//! qualifying sidebar mutation. Instead of letting each run stack another
//! closure on the same element, every binding is recorded here as a
//! `(target, kind, handler)` triple. Rebinding an existing triple is a no-op,
//! and the host is asked to install a real listener only for the first
//! binding of a `(target, kind)` pair; later bindings on the same pair are
//! routed through that one listener.
//!
//! Markup replaced under the sidebar leaves bindings on detached nodes.
//! [`BindingTable::prune`] drops them before each binding pass and asks the
//! host to release the listeners they held.

#[cfg(test)]
#[path = "binding_test.rs"]
mod binding_test;

use crate::dom::Dom;
use crate::event::EventKind;

/// What to run when a bound event arrives.
#[derive(Debug, Clone, PartialEq)]
pub enum Handler<N> {
    /// Item type select changed.
    TypeSelected,
    /// Add-form dynamic label checkbox changed.
    DynamicCheckbox,
    /// Add-form target menu select changed.
    MirrorTargetMenu,
    /// Delegated change at the document root for the edit form.
    EditFormChange,
    /// A list entry was clicked.
    ListEntryClicked,
    /// A collapse trigger was clicked; `panel` is the panel resolved at bind time.
    SubmenuToggle { panel: N },
    /// Panel started expanding; `link` is its trigger.
    PanelShown { link: N },
    /// Panel started collapsing; `link` is its trigger.
    PanelHidden { link: N },
    /// A plain navigation link was clicked.
    NavLinkClicked,
    /// The sidebar offcanvas is being dismissed.
    OffcanvasHiding,
    /// Nodes were added under the sidebar.
    SidebarMutated,
}

impl<N> Handler<N> {
    /// Node captured by the handler at bind time, if any.
    pub fn node(&self) -> Option<&N> {
        match self {
            Self::SubmenuToggle { panel } => Some(panel),
            Self::PanelShown { link } | Self::PanelHidden { link } => Some(link),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Binding<N> {
    target: N,
    kind: EventKind,
    handler: Handler<N>,
}

/// Every binding made so far, in registration order.
#[derive(Debug, Clone)]
pub struct BindingTable<N> {
    bindings: Vec<Binding<N>>,
}

impl<N> Default for BindingTable<N> {
    fn default() -> Self {
        Self { bindings: Vec::new() }
    }
}

impl<N: Clone + PartialEq> BindingTable<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `kind` events at `target`.
    ///
    /// Returns `false` when the same binding already exists.
    pub fn bind<D: Dom<Node = N>>(&mut self, dom: &D, target: &N, kind: EventKind, handler: Handler<N>) -> bool {
        if self.is_bound(target, kind, &handler) {
            return false;
        }
        if !self.listens(target, kind) {
            dom.listen(target, kind);
        }
        self.bindings.push(Binding { target: target.clone(), kind, handler });
        true
    }

    #[must_use]
    pub fn is_bound(&self, target: &N, kind: EventKind, handler: &Handler<N>) -> bool {
        self.bindings
            .iter()
            .any(|b| b.kind == kind && b.target == *target && b.handler == *handler)
    }

    /// Whether any binding exists for `(target, kind)`.
    #[must_use]
    pub fn listens(&self, target: &N, kind: EventKind) -> bool {
        self.bindings.iter().any(|b| b.kind == kind && b.target == *target)
    }

    /// Handlers for `(target, kind)` in registration order.
    #[must_use]
    pub fn handlers_for(&self, target: &N, kind: EventKind) -> Vec<Handler<N>> {
        self.bindings
            .iter()
            .filter(|b| b.kind == kind && b.target == *target)
            .map(|b| b.handler.clone())
            .collect()
    }

    /// Drop every binding whose target, or the node its handler captured,
    /// fails `keep`. Listeners left without any binding are released.
    ///
    /// Returns the number of bindings dropped.
    pub fn prune<D: Dom<Node = N>>(&mut self, dom: &D, keep: impl Fn(&N) -> bool) -> usize {
        let (kept, dropped): (Vec<_>, Vec<_>) = self
            .bindings
            .drain(..)
            .partition(|b| keep(&b.target) && b.handler.node().is_none_or(&keep));
        self.bindings = kept;

        let mut released: Vec<(&N, EventKind)> = Vec::new();
        for b in &dropped {
            let pair = (&b.target, b.kind);
            if !self.listens(&b.target, b.kind) && !released.contains(&pair) {
                dom.unlisten(&b.target, b.kind);
                released.push(pair);
            }
        }
        dropped.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
