//! In-memory document and widget fakes for unit tests.
//!
//! `FakeDom` is a small element tree implementing both [`Dom`] and
//! [`PanelWidgets`]. The collapse fake flips the `show` class and records the
//! lifecycle event it would emit; `Harness` feeds those events, and any
//! pending subtree mutations, back into [`MenuUi`] the way the browser host
//! does.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

use crate::config::UiConfig;
use crate::consts::CLASS_SHOW;
use crate::dom::{ControlKind, Dom, Query};
use crate::event::{DomEvent, EventKind, Outcome};
use crate::ui::MenuUi;
use crate::widgets::{CollapseConfig, PanelWidgets};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Element description used to build the fake tree.
#[derive(Debug, Clone, Default)]
pub struct El {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    value: String,
    checked: bool,
}

/// Start describing an element with `tag`.
pub fn el(tag: &str) -> El {
    El { tag: tag.to_owned(), ..El::default() }
}

impl El {
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add one or more space-separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        self.classes.extend(classes.split_whitespace().map(str::to_owned));
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_owned(), value.to_owned());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_owned();
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_owned();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    el: El,
    style: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory document plus collapse/offcanvas widget fake.
#[derive(Debug)]
pub struct FakeDom {
    nodes: RefCell<Vec<NodeData>>,
    viewport_width: Cell<f64>,
    listeners: RefCell<Vec<(NodeId, EventKind)>>,
    pending_added: RefCell<Vec<NodeId>>,
    collapses: RefCell<Vec<(NodeId, CollapseConfig)>>,
    offcanvases: RefCell<HashSet<NodeId>>,
    offcanvas_hides: Cell<usize>,
    emitted: RefCell<Vec<(NodeId, EventKind)>>,
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDom {
    /// A document holding only the `<html>` root.
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![NodeData {
                el: el("html"),
                style: BTreeMap::new(),
                parent: None,
                children: Vec::new(),
            }]),
            viewport_width: Cell::new(1920.0),
            listeners: RefCell::new(Vec::new()),
            pending_added: RefCell::new(Vec::new()),
            collapses: RefCell::new(Vec::new()),
            offcanvases: RefCell::new(HashSet::new()),
            offcanvas_hides: Cell::new(0),
            emitted: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new element under `parent` and record it as added.
    pub fn append(&self, parent: NodeId, el: El) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(NodeData { el, style: BTreeMap::new(), parent: Some(parent), children: Vec::new() });
        nodes[parent.0].children.push(id);
        self.pending_added.borrow_mut().push(id);
        id
    }

    /// Detach `node` (and its subtree) from its parent.
    pub fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|&child| child != node);
        }
    }

    pub fn set_viewport_width(&self, width: f64) {
        self.viewport_width.set(width);
    }

    /// Inline style property previously set on `node`.
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].style.get(property).cloned()
    }

    /// Number of host listeners installed for `(node, kind)`.
    pub fn listener_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|&&(target, k)| target == node && k == kind)
            .count()
    }

    // --- Widget fake ---

    /// Attach an offcanvas instance to `node`.
    pub fn add_offcanvas(&self, node: NodeId) {
        self.offcanvases.borrow_mut().insert(node);
    }

    pub fn offcanvas_hides(&self) -> usize {
        self.offcanvas_hides.get()
    }

    /// Configs of every collapse instance created on `node`.
    pub fn collapse_configs(&self, node: NodeId) -> Vec<CollapseConfig> {
        self.collapses
            .borrow()
            .iter()
            .filter(|(panel, _)| *panel == node)
            .map(|&(_, config)| config)
            .collect()
    }

    pub fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.with_el(*node, |el| has(el, class))
    }

    pub fn is_expanded(&self, panel: NodeId) -> bool {
        self.has_class(&panel, CLASS_SHOW)
    }

    fn emit(&self, node: NodeId, kind: EventKind) {
        self.emitted.borrow_mut().push((node, kind));
    }

    /// Widget lifecycle events emitted since the last call.
    pub fn take_emitted(&self) -> Vec<(NodeId, EventKind)> {
        self.emitted.borrow_mut().drain(..).collect()
    }

    // --- Event dispatch ---

    fn ancestors_or_self(&self, node: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut path = vec![node];
        let mut current = node;
        while let Some(parent) = nodes[current.0].parent {
            path.push(parent);
            current = parent;
        }
        path
    }

    fn is_strict_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.ancestors_or_self(node).iter().skip(1).any(|&n| n == ancestor)
    }

    /// Deliveries for an event of `kind` dispatched on `target`, bubbling
    /// from the target up to the root through installed listeners.
    pub fn fire(&self, target: NodeId, kind: EventKind) -> Vec<DomEvent<NodeId>> {
        self.ancestors_or_self(target)
            .into_iter()
            .filter(|&node| self.listener_count(node, kind) > 0)
            .map(|node| DomEvent::bubbled(kind, node, target))
            .collect()
    }

    /// Mutation deliveries for nodes appended since the last call, one per
    /// observed root that gained attached descendants.
    pub fn take_mutations(&self) -> Vec<DomEvent<NodeId>> {
        let added: Vec<NodeId> = self.pending_added.borrow_mut().drain(..).collect();
        let observed: Vec<NodeId> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind)| *kind == EventKind::Mutation)
            .map(|&(node, _)| node)
            .collect();
        observed
            .into_iter()
            .filter_map(|root| {
                let inside: Vec<NodeId> = added
                    .iter()
                    .copied()
                    .filter(|&node| self.is_connected(&node) && self.is_strict_descendant(node, root))
                    .collect();
                if inside.is_empty() { None } else { Some(DomEvent::mutation(root, inside)) }
            })
            .collect()
    }

    /// Drop mutation records accumulated while building the initial page.
    pub fn clear_mutations(&self) {
        self.pending_added.borrow_mut().clear();
    }

    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes[scope.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    fn with_el<T>(&self, node: NodeId, f: impl FnOnce(&El) -> T) -> T {
        f(&self.nodes.borrow()[node.0].el)
    }

    fn with_el_mut(&self, node: NodeId, f: impl FnOnce(&mut El)) {
        f(&mut self.nodes.borrow_mut()[node.0].el);
    }
}

fn is_collapse_trigger(el: &El) -> bool {
    el.tag == "a" && el.attrs.get("data-bs-toggle").is_some_and(|v| v == "collapse")
}

fn has(el: &El, class: &str) -> bool {
    el.classes.iter().any(|c| c == class)
}

fn query_matches(el: &El, query: &Query) -> bool {
    match query {
        Query::FormControls => matches!(el.tag.as_str(), "input" | "select" | "textarea"),
        Query::ListEntries => has(el, "list-group-item") && has(el, "hoverable-item"),
        Query::CollapseTriggers => is_collapse_trigger(el),
        Query::NavLinks => el.tag == "a" && has(el, "nav-link"),
        Query::PlainNavLinks => el.tag == "a" && has(el, "nav-link") && !is_collapse_trigger(el),
        Query::OpenPanels => has(el, "collapse") && has(el, CLASS_SHOW),
        Query::ArrowIcon => has(el, "dropdown-arrow"),
        Query::Id(id) => el.attrs.get("id") == Some(id),
    }
}

impl Dom for FakeDom {
    type Node = NodeId;

    fn document_root(&self) -> NodeId {
        self.root()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let root = self.root();
        std::iter::once(root)
            .chain(self.descendants(root))
            .find(|&node| self.with_el(node, |el| el.attrs.get("id").is_some_and(|v| v == id)))
    }

    fn query_all(&self, scope: &NodeId, query: &Query) -> Vec<NodeId> {
        self.descendants(*scope)
            .into_iter()
            .filter(|&node| self.with_el(node, |el| query_matches(el, query)))
            .collect()
    }

    fn matches(&self, node: &NodeId, query: &Query) -> bool {
        self.with_el(*node, |el| query_matches(el, query))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.with_el(*node, |el| el.attrs.get(name).cloned())
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.with_el_mut(*node, |el| {
            el.attrs.insert(name.to_owned(), value.to_owned());
        });
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) {
        self.with_el_mut(*node, |el| {
            el.attrs.remove(name);
        });
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        self.with_el_mut(*node, |el| {
            if !has(el, class) {
                el.classes.push(class.to_owned());
            }
        });
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.with_el_mut(*node, |el| el.classes.retain(|c| c != class));
    }

    fn value(&self, node: &NodeId) -> String {
        self.with_el(*node, |el| el.value.clone())
    }

    fn set_value(&self, node: &NodeId, value: &str) {
        self.with_el_mut(*node, |el| el.value = value.to_owned());
    }

    fn is_checked(&self, node: &NodeId) -> bool {
        self.with_el(*node, |el| el.checked)
    }

    fn set_checked(&self, node: &NodeId, checked: bool) {
        self.with_el_mut(*node, |el| el.checked = checked);
    }

    fn control_kind(&self, node: &NodeId) -> ControlKind {
        self.with_el(*node, |el| {
            let checkable = el.tag == "input"
                && el.attrs.get("type").is_some_and(|t| t == "checkbox" || t == "radio");
            if checkable { ControlKind::Checkable } else { ControlKind::Valued }
        })
    }

    fn text_content(&self, node: &NodeId) -> String {
        std::iter::once(*node)
            .chain(self.descendants(*node))
            .map(|n| self.with_el(n, |el| el.text.clone()))
            .collect()
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .style
            .insert(property.to_owned(), value.to_owned());
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width.get()
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.ancestors_or_self(*node).last() == Some(&self.root())
    }

    fn listen(&self, node: &NodeId, kind: EventKind) {
        self.listeners.borrow_mut().push((*node, kind));
    }

    fn unlisten(&self, node: &NodeId, kind: EventKind) {
        self.listeners.borrow_mut().retain(|&(target, k)| target != *node || k != kind);
    }
}

impl PanelWidgets<NodeId> for FakeDom {
    fn has_collapse(&self, panel: &NodeId) -> bool {
        self.collapses.borrow().iter().any(|(node, _)| node == panel)
    }

    fn create_collapse(&self, panel: &NodeId, config: CollapseConfig) {
        self.collapses.borrow_mut().push((*panel, config));
        if config.toggle {
            self.toggle_collapse(panel);
        }
    }

    fn toggle_collapse(&self, panel: &NodeId) -> bool {
        if !self.has_collapse(panel) {
            return false;
        }
        if self.is_expanded(*panel) {
            self.remove_class(panel, CLASS_SHOW);
            self.emit(*panel, EventKind::CollapseHide);
        } else {
            self.add_class(panel, CLASS_SHOW);
            self.emit(*panel, EventKind::CollapseShow);
        }
        true
    }

    fn hide_collapse(&self, panel: &NodeId) -> bool {
        if !self.has_collapse(panel) {
            return false;
        }
        if self.is_expanded(*panel) {
            self.remove_class(panel, CLASS_SHOW);
            self.emit(*panel, EventKind::CollapseHide);
        }
        true
    }

    fn hide_offcanvas(&self, container: &NodeId) -> bool {
        if !self.offcanvases.borrow().contains(container) {
            return false;
        }
        self.offcanvas_hides.set(self.offcanvas_hides.get() + 1);
        self.emit(*container, EventKind::OffcanvasHide);
        true
    }
}

/// A started [`MenuUi`] over a [`FakeDom`], with browser-like dispatch.
pub struct Harness {
    pub dom: FakeDom,
    pub ui: MenuUi<NodeId>,
}

impl Harness {
    /// Start the UI on `dom` with the default configuration.
    pub fn start(dom: FakeDom) -> Self {
        Self::start_with(dom, UiConfig::default())
    }

    pub fn start_with(dom: FakeDom, config: UiConfig) -> Self {
        dom.clear_mutations();
        let mut ui = MenuUi::new(config);
        ui.start(&dom, &dom);
        let mut harness = Self { dom, ui };
        harness.settle();
        harness
    }

    /// Dispatch `kind` on `target`, bubbling until a handler stops it, then
    /// deliver whatever the handlers triggered.
    pub fn dispatch(&mut self, target: NodeId, kind: EventKind) -> Outcome {
        let outcome = self.deliver(target, kind);
        self.settle();
        outcome
    }

    pub fn click(&mut self, target: NodeId) -> Outcome {
        self.dispatch(target, EventKind::Click)
    }

    /// Set a control's value and dispatch `change`.
    pub fn select(&mut self, control: NodeId, value: &str) -> Outcome {
        self.dom.set_value(&control, value);
        self.dispatch(control, EventKind::Change)
    }

    /// Set a checkbox and dispatch `change`.
    pub fn check(&mut self, checkbox: NodeId, checked: bool) -> Outcome {
        self.dom.set_checked(&checkbox, checked);
        self.dispatch(checkbox, EventKind::Change)
    }

    /// Deliver emitted widget events and observed mutations until quiet.
    pub fn settle(&mut self) {
        loop {
            let emitted = self.dom.take_emitted();
            let mutations = self.dom.take_mutations();
            if emitted.is_empty() && mutations.is_empty() {
                return;
            }
            for (node, kind) in emitted {
                self.deliver(node, kind);
            }
            for event in mutations {
                self.ui.handle(&self.dom, &self.dom, &event);
            }
        }
    }

    fn deliver(&mut self, target: NodeId, kind: EventKind) -> Outcome {
        let mut outcome = Outcome::default();
        for event in self.dom.fire(target, kind) {
            let step = self.ui.handle(&self.dom, &self.dom, &event);
            outcome = outcome.merge(step);
            if step.stop_propagation {
                break;
            }
        }
        outcome
    }
}

// =============================================================
// Page fixtures
// =============================================================

/// Node ids of the add-item form fixture.
pub struct FormPage {
    pub form: NodeId,
    pub select: NodeId,
    pub source_id: NodeId,
    pub dynamic_group: NodeId,
    pub dynamic: NodeId,
    pub label_group: NodeId,
    pub label: NodeId,
    pub url_group: NodeId,
    pub url: NodeId,
    pub blank: NodeId,
    pub menu_group: NodeId,
    pub target_menu: NodeId,
}

/// Add-item form as rendered by the admin template, every group hidden.
pub fn form_page(dom: &FakeDom) -> FormPage {
    let form = dom.append(dom.root(), el("form").id("add-item-form"));
    let select = dom.append(form, el("select").id("item_type"));
    let source_id = dom.append(form, el("input").id("source_id_item").attr("type", "hidden"));
    let dynamic_group = dom.append(form, el("div").id("dynamic-group").attr("hidden", ""));
    let dynamic = dom.append(dynamic_group, el("input").id("item_dynamic").attr("type", "checkbox"));
    let label_group = dom.append(form, el("div").id("label-group").attr("hidden", ""));
    let label = dom.append(label_group, el("input").id("item_label").attr("type", "text"));
    let url_group = dom.append(form, el("div").id("url-group").attr("hidden", ""));
    let url = dom.append(url_group, el("input").id("item_url").attr("type", "text"));
    let blank = dom.append(url_group, el("input").id("item_blank").attr("type", "checkbox"));
    let menu_group = dom.append(form, el("div").id("menu-group").attr("hidden", ""));
    let target_menu = dom.append(menu_group, el("select").id("item_target_menu"));
    FormPage {
        form,
        select,
        source_id,
        dynamic_group,
        dynamic,
        label_group,
        label,
        url_group,
        url,
        blank,
        menu_group,
        target_menu,
    }
}

/// Node ids of the sidebar fixture.
pub struct SidebarPage {
    pub root: NodeId,
    pub nav: NodeId,
    pub home: NodeId,
    pub link: NodeId,
    pub arrow: NodeId,
    pub panel: NodeId,
    pub child: NodeId,
}

/// Sidebar offcanvas with one plain link and one submenu holding a link.
pub fn sidebar_page(dom: &FakeDom) -> SidebarPage {
    let root = dom.append(dom.root(), el("div").id("sidebarOffcanvas").class("offcanvas-xl"));
    dom.add_offcanvas(root);
    let nav = dom.append(root, el("ul").class("nav flex-column"));
    let home = dom.append(nav, el("a").class("nav-link active").attr("href", "/admin"));
    let link = dom.append(
        nav,
        el("a")
            .class("nav-link")
            .attr("href", "#submenu-menus")
            .attr("data-bs-toggle", "collapse")
            .attr("aria-expanded", "false")
            .text("Menus"),
    );
    let arrow = dom.append(link, el("i").class("dropdown-arrow"));
    let panel = dom.append(nav, el("div").id("submenu-menus").class("collapse"));
    let child = dom.append(panel, el("a").class("nav-link").attr("href", "/admin/menus"));
    SidebarPage { root, nav, home, link, arrow, panel, child }
}
