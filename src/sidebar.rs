//! Sidebar submenu controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! The admin sidebar is an offcanvas container holding navigation links, some
//! of which expand a nested submenu panel. Expansion itself belongs to the
//! collapse widget; this controller only:
//!
//! - pairs each trigger link with its panel (looked up inside the sidebar,
//!   never document-wide, so ids reused elsewhere on the page cannot collide),
//! - forwards trigger clicks to the panel's widget instance,
//! - mirrors the widget's show/hide transitions onto the link's arrow icon and
//!   `aria-expanded`, whatever caused the transition,
//! - marks plain links active and closes the sidebar on narrow viewports,
//! - rebinds when new trigger markup is injected.
//!
//! Rebinding relies on [`BindingTable`] so a link bound twice still toggles
//! its panel exactly once per click, and bindings left on replaced markup are
//! dropped before each pass.

#[cfg(test)]
#[path = "sidebar_test.rs"]
mod sidebar_test;

use crate::binding::{BindingTable, Handler};
use crate::consts::{ARROW_COLLAPSED, ARROW_EXPANDED, ATTR_ARIA_EXPANDED, CLASS_ACTIVE};
use crate::dom::{Dom, Query, require};
use crate::error::UiError;
use crate::event::{DomEvent, EventKind, Outcome};
use crate::widgets::PanelWidgets;

/// Binds and drives the collapsible submenus of one sidebar container.
#[derive(Debug, Clone)]
pub struct SidebarController {
    root_id: String,
    narrow_viewport_px: f64,
}

impl SidebarController {
    #[must_use]
    pub fn new(root_id: impl Into<String>, narrow_viewport_px: f64) -> Self {
        Self { root_id: root_id.into(), narrow_viewport_px }
    }

    #[must_use]
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// The sidebar container.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the page has no sidebar.
    pub fn root<D: Dom>(&self, dom: &D) -> Result<D::Node, UiError> {
        require(dom, &self.root_id)
    }

    /// Panel a trigger link points at through its `#id` href, searched only
    /// inside `root`.
    pub fn resolve_panel<D: Dom>(&self, dom: &D, root: &D::Node, link: &D::Node) -> Option<D::Node> {
        let href = dom.attribute(link, "href")?;
        let target = href.strip_prefix('#').filter(|id| !id.is_empty())?;
        dom.query_first(root, &Query::Id(target.to_owned()))
    }

    // --- Binding ---

    /// Pair every trigger link with its panel, make sure the panel has a
    /// collapse instance, and bind click and transition handlers.
    ///
    /// Returns the number of links newly bound.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the page has no sidebar.
    pub fn bind_submenus<D, W>(&self, dom: &D, widgets: &W, table: &mut BindingTable<D::Node>) -> Result<usize, UiError>
    where
        D: Dom,
        W: PanelWidgets<D::Node>,
    {
        let root = self.root(dom)?;
        let mut bound = 0;
        for link in dom.query_all(&root, &Query::CollapseTriggers) {
            let Some(panel) = self.resolve_panel(dom, &root, &link) else {
                log::debug!("sidebar: trigger {link:?} has no panel inside #{}", self.root_id);
                continue;
            };
            if widgets.ensure_collapse(&panel) {
                log::debug!("sidebar: created collapse instance for {panel:?}");
            }
            if table.bind(dom, &link, EventKind::Click, Handler::SubmenuToggle { panel: panel.clone() }) {
                bound += 1;
            }
            table.bind(dom, &panel, EventKind::CollapseShow, Handler::PanelShown { link: link.clone() });
            table.bind(dom, &panel, EventKind::CollapseHide, Handler::PanelHidden { link });
        }
        Ok(bound)
    }

    /// Bind the active-state handler on every link that is not a trigger.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the page has no sidebar.
    pub fn bind_nav_links<D: Dom>(&self, dom: &D, table: &mut BindingTable<D::Node>) -> Result<usize, UiError> {
        let root = self.root(dom)?;
        let bound = dom
            .query_all(&root, &Query::PlainNavLinks)
            .into_iter()
            .filter(|link| table.bind(dom, link, EventKind::Click, Handler::NavLinkClicked))
            .count();
        Ok(bound)
    }

    /// Collapse open submenus whenever the sidebar itself is dismissed.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the page has no sidebar.
    pub fn bind_offcanvas<D: Dom>(&self, dom: &D, table: &mut BindingTable<D::Node>) -> Result<(), UiError> {
        let root = self.root(dom)?;
        table.bind(dom, &root, EventKind::OffcanvasHide, Handler::OffcanvasHiding);
        Ok(())
    }

    /// Watch the sidebar subtree for injected markup.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the page has no sidebar.
    pub fn observe<D: Dom>(&self, dom: &D, table: &mut BindingTable<D::Node>) -> Result<(), UiError> {
        let root = self.root(dom)?;
        table.bind(dom, &root, EventKind::Mutation, Handler::SidebarMutated);
        Ok(())
    }

    /// Full binding pass: drop bindings on detached nodes, then bind
    /// submenus and plain links.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the page has no sidebar.
    pub fn reinitialize<D, W>(&self, dom: &D, widgets: &W, table: &mut BindingTable<D::Node>) -> Result<(), UiError>
    where
        D: Dom,
        W: PanelWidgets<D::Node>,
    {
        let stale = table.prune(dom, |node| dom.is_connected(node));
        let submenus = self.bind_submenus(dom, widgets, table)?;
        let links = self.bind_nav_links(dom, table)?;
        log::debug!("sidebar: dropped {stale} stale binding(s), bound {submenus} new submenu(s), {links} new link(s)");
        Ok(())
    }

    // --- Handlers ---

    /// A trigger link was clicked.
    ///
    /// The link is re-resolved first: if markup changed since binding and the
    /// href no longer lands on the bound panel, the click is swallowed without
    /// toggling. Icon state follows from the widget's transition events.
    pub fn toggle_submenu<D, W>(&self, dom: &D, widgets: &W, link: &D::Node, panel: &D::Node) -> Outcome
    where
        D: Dom,
        W: PanelWidgets<D::Node>,
    {
        let current = match self.root(dom) {
            Ok(root) => self.resolve_panel(dom, &root, link),
            Err(err) => {
                log::debug!("sidebar: {err}");
                None
            }
        };
        match current {
            Some(current) if current == *panel => {
                if !widgets.toggle_collapse(panel) {
                    log::debug!("sidebar: no collapse instance on {panel:?}");
                }
            }
            _ => log::debug!("sidebar: {link:?} no longer targets its bound panel"),
        }
        Outcome::consumed()
    }

    /// A panel started a show or hide transition.
    ///
    /// Transitions bubbling up from a nested panel are ignored.
    pub fn on_panel_transition<D: Dom>(&self, dom: &D, event: &DomEvent<D::Node>, link: &D::Node, expanded: bool) {
        if event.is_at_target() {
            sync_arrow(dom, link, expanded);
        }
    }

    /// A plain navigation link was clicked.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the page has no sidebar.
    pub fn activate_nav_link<D, W>(&self, dom: &D, widgets: &W, link: &D::Node) -> Result<(), UiError>
    where
        D: Dom,
        W: PanelWidgets<D::Node>,
    {
        let root = self.root(dom)?;
        for other in dom.query_all(&root, &Query::NavLinks) {
            dom.remove_class(&other, CLASS_ACTIVE);
        }
        dom.add_class(link, CLASS_ACTIVE);

        if dom.viewport_width() < self.narrow_viewport_px && !widgets.hide_offcanvas(&root) {
            log::debug!("sidebar: no offcanvas instance on #{}", self.root_id);
        }
        Ok(())
    }

    /// Ask every expanded panel in the sidebar to collapse.
    ///
    /// Returns how many panels were asked.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the page has no sidebar.
    pub fn close_all_submenus<D, W>(&self, dom: &D, widgets: &W) -> Result<usize, UiError>
    where
        D: Dom,
        W: PanelWidgets<D::Node>,
    {
        let root = self.root(dom)?;
        let closed = dom
            .query_all(&root, &Query::OpenPanels)
            .into_iter()
            .filter(|panel| widgets.hide_collapse(panel))
            .count();
        Ok(closed)
    }

    /// Nodes were added under the sidebar. Rebinds when any of them is or
    /// contains a trigger link.
    ///
    /// Returns whether a rebind ran.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the sidebar disappeared.
    pub fn on_mutation<D, W>(
        &self,
        dom: &D,
        widgets: &W,
        table: &mut BindingTable<D::Node>,
        added: &[D::Node],
    ) -> Result<bool, UiError>
    where
        D: Dom,
        W: PanelWidgets<D::Node>,
    {
        let qualifies = added.iter().any(|node| {
            dom.matches(node, &Query::CollapseTriggers) || dom.query_first(node, &Query::CollapseTriggers).is_some()
        });
        if !qualifies {
            return Ok(false);
        }
        self.reinitialize(dom, widgets, table)?;
        Ok(true)
    }
}

/// Point the arrow icon and `aria-expanded` at the panel state.
pub fn sync_arrow<D: Dom>(dom: &D, link: &D::Node, expanded: bool) {
    if let Some(icon) = dom.query_first(link, &Query::ArrowIcon) {
        dom.set_style(&icon, "transform", if expanded { ARROW_EXPANDED } else { ARROW_COLLAPSED });
    }
    dom.set_attribute(link, ATTR_ARIA_EXPANDED, if expanded { "true" } else { "false" });
}
