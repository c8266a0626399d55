//! Top-level menus UI: startup wiring and event routing.
//!
//! DESIGN
//! ======
//! `MenuUi` owns the two independent components (the add/edit form toggler
//! and the sidebar controller) plus the shared [`BindingTable`]. The host calls
//! [`MenuUi::start`] once when the document is ready and forwards every
//! delivery of an installed listener to [`MenuUi::handle`]. Nothing here
//! depends on a browser, so the whole flow runs against the in-memory tree in
//! tests.
//!
//! ERROR HANDLING
//! ==============
//! Component operations return `Result`. This is the boundary where errors
//! stop: they are logged and the event is otherwise ignored. A page that only
//! carries the sidebar, or only the form, is normal.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use std::fmt::Debug;

use crate::binding::{BindingTable, Handler};
use crate::config::UiConfig;
use crate::dom::{Dom, Query};
use crate::entry::ListEntry;
use crate::error::UiError;
use crate::event::{DomEvent, EventKind, Outcome};
use crate::form::{FormIds, FormToggler, ItemType};
use crate::sidebar::SidebarController;
use crate::widgets::PanelWidgets;

/// The menu builder's client-side behavior.
#[derive(Debug, Clone)]
pub struct MenuUi<N> {
    config: UiConfig,
    add_form: FormToggler,
    edit_form: FormToggler,
    sidebar: SidebarController,
    bindings: BindingTable<N>,
    started: bool,
}

impl<N: Clone + PartialEq + Debug> MenuUi<N> {
    #[must_use]
    pub fn new(config: UiConfig) -> Self {
        Self {
            add_form: FormToggler::new(FormIds::add(), config.label_max_chars),
            edit_form: FormToggler::new(FormIds::edit(), config.label_max_chars),
            sidebar: SidebarController::new(config.sidebar_id.clone(), config.narrow_viewport_px),
            bindings: BindingTable::new(),
            started: false,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    #[must_use]
    pub fn bindings(&self) -> &BindingTable<N> {
        &self.bindings
    }

    #[must_use]
    pub fn add_form(&self) -> &FormToggler {
        &self.add_form
    }

    #[must_use]
    pub fn sidebar(&self) -> &SidebarController {
        &self.sidebar
    }

    // --- Startup ---

    /// Wire the form and the sidebar. Runs once; later calls are ignored.
    pub fn start<D, W>(&mut self, dom: &D, widgets: &W)
    where
        D: Dom<Node = N>,
        W: PanelWidgets<N>,
    {
        if self.started {
            log::debug!("menus-ui: already started");
            return;
        }
        self.started = true;

        self.bind_form(dom);
        let entries = self.init_list_entries(dom);
        if let Err(err) = self.bind_sidebar(dom, widgets) {
            report("sidebar", &err);
        }
        log::info!("menus-ui: started with {} bindings ({entries} list entries)", self.bindings.len());
    }

    fn bind_form<D: Dom<Node = N>>(&mut self, dom: &D) {
        let ids = self.add_form.ids().clone();
        if let Some(select) = dom.element_by_id(&ids.item_type) {
            self.bindings.bind(dom, &select, EventKind::Change, Handler::TypeSelected);
            if let Some(checkbox) = dom.element_by_id(&ids.dynamic) {
                self.bindings.bind(dom, &checkbox, EventKind::Change, Handler::DynamicCheckbox);
            }
        } else {
            log::debug!("form: no #{} on this page", ids.item_type);
        }

        if let (Some(target), Some(_)) = (dom.element_by_id(&ids.target_menu), dom.element_by_id(&ids.source_id)) {
            self.bindings.bind(dom, &target, EventKind::Change, Handler::MirrorTargetMenu);
        }

        // The edit form is injected later; listen at the root and filter by id.
        let root = dom.document_root();
        self.bindings.bind(dom, &root, EventKind::Change, Handler::EditFormChange);
    }

    fn bind_sidebar<D, W>(&mut self, dom: &D, widgets: &W) -> Result<(), UiError>
    where
        D: Dom<Node = N>,
        W: PanelWidgets<N>,
    {
        self.sidebar.bind_submenus(dom, widgets, &mut self.bindings)?;
        self.sidebar.bind_offcanvas(dom, &mut self.bindings)?;
        self.sidebar.bind_nav_links(dom, &mut self.bindings)?;
        self.sidebar.observe(dom, &mut self.bindings)?;
        Ok(())
    }

    /// Bind click handlers on every list entry. Safe to call repeatedly;
    /// entries removed since the last call are unbound first.
    ///
    /// Returns the number of entries newly bound.
    pub fn init_list_entries<D: Dom<Node = N>>(&mut self, dom: &D) -> usize {
        self.bindings.prune(dom, |node| dom.is_connected(node));
        let root = dom.document_root();
        let entries = dom.query_all(&root, &Query::ListEntries);
        let mut bound = 0;
        for entry in &entries {
            if self.bindings.bind(dom, entry, EventKind::Click, Handler::ListEntryClicked) {
                bound += 1;
            }
        }
        bound
    }

    /// Manual (re)initialization for pages that load the form after startup:
    /// re-apply visibility, then bind the type select and the list entries.
    pub fn init_searchbar<D: Dom<Node = N>>(&mut self, dom: &D) {
        self.apply_visibility(dom);
        if let Some(select) = dom.element_by_id(&self.add_form.ids().item_type) {
            self.bindings.bind(dom, &select, EventKind::Change, Handler::TypeSelected);
        }
        self.init_list_entries(dom);
    }

    // --- Operations exposed to the page ---

    /// Re-apply group visibility for the current type selection.
    pub fn apply_visibility<D: Dom<Node = N>>(&self, dom: &D) -> Option<ItemType> {
        match self.add_form.apply_visibility(dom) {
            Ok(selection) => selection,
            Err(err) => {
                report("form", &err);
                None
            }
        }
    }

    /// Fill the add form from a list entry.
    pub fn populate<D: Dom<Node = N>>(&self, dom: &D, entry: &ListEntry) -> Option<ItemType> {
        match self.add_form.populate_from_list_entry(dom, entry) {
            Ok(kind) => kind,
            Err(err) => {
                report("form", &err);
                None
            }
        }
    }

    /// Collapse every open submenu in the sidebar.
    pub fn close_all_submenus<D, W>(&self, dom: &D, widgets: &W) -> usize
    where
        D: Dom<Node = N>,
        W: PanelWidgets<N>,
    {
        match self.sidebar.close_all_submenus(dom, widgets) {
            Ok(closed) => closed,
            Err(err) => {
                report("sidebar", &err);
                0
            }
        }
    }

    /// Re-run the sidebar binding pass.
    pub fn reinitialize_sidebar<D, W>(&mut self, dom: &D, widgets: &W)
    where
        D: Dom<Node = N>,
        W: PanelWidgets<N>,
    {
        if let Err(err) = self.sidebar.reinitialize(dom, widgets, &mut self.bindings) {
            report("sidebar", &err);
        }
    }

    // --- Event routing ---

    /// Run every handler bound at `event.current` for `event.kind`.
    pub fn handle<D, W>(&mut self, dom: &D, widgets: &W, event: &DomEvent<N>) -> Outcome
    where
        D: Dom<Node = N>,
        W: PanelWidgets<N>,
    {
        self.bindings
            .handlers_for(&event.current, event.kind)
            .into_iter()
            .fold(Outcome::default(), |outcome, handler| outcome.merge(self.run(dom, widgets, event, handler)))
    }

    fn run<D, W>(&mut self, dom: &D, widgets: &W, event: &DomEvent<N>, handler: Handler<N>) -> Outcome
    where
        D: Dom<Node = N>,
        W: PanelWidgets<N>,
    {
        let result = match handler {
            Handler::TypeSelected => self.add_form.apply_visibility(dom).map(drop),
            Handler::DynamicCheckbox => self.add_form.sync_dependent_checkbox(dom, dom.is_checked(&event.current)),
            Handler::MirrorTargetMenu => self.add_form.mirror_target_menu(dom),
            Handler::EditFormChange => self.on_edit_form_change(dom, &event.origin),
            Handler::ListEntryClicked => {
                let entry = ListEntry::read(dom, &event.current);
                self.add_form.populate_from_list_entry(dom, &entry).map(drop)
            }
            Handler::SubmenuToggle { panel } => {
                return self.sidebar.toggle_submenu(dom, widgets, &event.current, &panel);
            }
            Handler::PanelShown { link } => {
                self.sidebar.on_panel_transition(dom, event, &link, true);
                Ok(())
            }
            Handler::PanelHidden { link } => {
                self.sidebar.on_panel_transition(dom, event, &link, false);
                Ok(())
            }
            Handler::NavLinkClicked => self.sidebar.activate_nav_link(dom, widgets, &event.current),
            Handler::OffcanvasHiding => self.sidebar.close_all_submenus(dom, widgets).map(drop),
            Handler::SidebarMutated => self
                .sidebar
                .on_mutation(dom, widgets, &mut self.bindings, &event.added)
                .map(drop),
        };
        if let Err(err) = result {
            report(event.kind.dom_name(), &err);
        }
        Outcome::default()
    }

    /// Delegated change handler for the edit form.
    fn on_edit_form_change<D: Dom<Node = N>>(&self, dom: &D, origin: &N) -> Result<(), UiError> {
        let Some(id) = dom.attribute(origin, "id") else {
            return Ok(());
        };
        let ids = self.edit_form.ids();
        if id == ids.dynamic {
            self.edit_form.sync_dependent_checkbox(dom, dom.is_checked(origin))?;
        } else if id == ids.target_menu {
            self.edit_form.mirror_target_menu(dom)?;
        }
        Ok(())
    }
}

fn report(context: &str, err: &UiError) {
    if err.is_missing_element() {
        log::warn!("{context}: {err}");
    } else {
        log::error!("{context}: {err}");
    }
}
