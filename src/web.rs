//! Browser host: web-sys document access, Bootstrap widgets and the functions
//! exported to the admin page.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page loads the wasm module and calls `startMenusUi()`. From then on
//! every listener installed through [`WebDom::listen`] turns its native event
//! into a [`DomEvent`] and hands it to the single [`MenuUi`] held in this
//! thread's host slot.
//!
//! DESIGN
//! ======
//! Bootstrap fires `show.bs.collapse` and friends synchronously from inside
//! `toggle()` and `hide()`, i.e. while a handler is still running. All work
//! therefore goes through [`schedule`]: the outermost call drains a FIFO
//! queue and nested calls only enqueue, so the UI is never borrowed twice.
//! Native cancellation (`preventDefault`/`stopPropagation`) is applied right
//! after the job for that event runs, which is still inside the browser's
//! dispatch for top-level clicks.
//!
//! Listener closures are owned by [`WebDom`], keyed by the node and event
//! kind they serve, until [`Dom::unlisten`] detaches and drops them.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, MutationObserver, MutationObserverInit, MutationRecord, NodeList, Window,
};

use crate::config::UiConfig;
use crate::dom::{ControlKind, Dom, Query};
use crate::entry::ListEntry;
use crate::error::UiError;
use crate::event::{DomEvent, EventKind};
use crate::ui::MenuUi;
use crate::widgets::{CollapseConfig, PanelWidgets};

// =============================================================
// Bootstrap
// =============================================================

#[wasm_bindgen(js_namespace = bootstrap)]
extern "C" {
    type Collapse;

    #[wasm_bindgen(static_method_of = Collapse, js_name = getInstance, catch)]
    fn get_instance(element: &Element) -> Result<Option<Collapse>, JsValue>;

    #[wasm_bindgen(constructor, catch)]
    fn new(element: &Element, options: &JsValue) -> Result<Collapse, JsValue>;

    #[wasm_bindgen(method)]
    fn toggle(this: &Collapse);

    #[wasm_bindgen(method)]
    fn hide(this: &Collapse);
}

#[wasm_bindgen(js_namespace = bootstrap)]
extern "C" {
    type Offcanvas;

    #[wasm_bindgen(static_method_of = Offcanvas, js_name = getInstance, catch)]
    fn get_instance(element: &Element) -> Result<Option<Offcanvas>, JsValue>;

    #[wasm_bindgen(method)]
    fn hide(this: &Offcanvas);
}

fn collapse_of(panel: &Element) -> Option<Collapse> {
    match Collapse::get_instance(panel) {
        Ok(instance) => instance,
        Err(err) => {
            log::warn!("bootstrap: Collapse unavailable: {err:?}");
            None
        }
    }
}

/// [`PanelWidgets`] backed by the page's global `bootstrap` object.
#[derive(Debug, Default)]
pub struct BootstrapWidgets;

impl PanelWidgets<Element> for BootstrapWidgets {
    fn has_collapse(&self, panel: &Element) -> bool {
        collapse_of(panel).is_some()
    }

    fn create_collapse(&self, panel: &Element, config: CollapseConfig) {
        let options = serde_json::to_string(&config)
            .map_err(|err| JsValue::from_str(&err.to_string()))
            .and_then(|json| js_sys::JSON::parse(&json));
        match options.and_then(|options| Collapse::new(panel, &options)) {
            Ok(_) => log::trace!("bootstrap: collapse created on #{}", panel.id()),
            Err(err) => log::warn!("bootstrap: cannot create collapse on #{}: {err:?}", panel.id()),
        }
    }

    fn toggle_collapse(&self, panel: &Element) -> bool {
        let Some(instance) = collapse_of(panel) else {
            return false;
        };
        instance.toggle();
        true
    }

    fn hide_collapse(&self, panel: &Element) -> bool {
        let Some(instance) = collapse_of(panel) else {
            return false;
        };
        instance.hide();
        true
    }

    fn hide_offcanvas(&self, container: &Element) -> bool {
        match Offcanvas::get_instance(container) {
            Ok(Some(instance)) => {
                instance.hide();
                true
            }
            Ok(None) => false,
            Err(err) => {
                log::warn!("bootstrap: Offcanvas unavailable: {err:?}");
                false
            }
        }
    }
}

// =============================================================
// Document
// =============================================================

type EventClosure = Closure<dyn FnMut(Event)>;
type ObserverClosure = Closure<dyn FnMut(Array, MutationObserver)>;

/// [`Dom`] over the live browser document.
pub struct WebDom {
    window: Window,
    root: Element,
    document: Document,
    listeners: RefCell<Vec<(Element, EventKind, EventClosure)>>,
    observers: RefCell<Vec<(Element, MutationObserver, ObserverClosure)>>,
}

impl WebDom {
    /// Bind to the current window's document.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Host`] outside a browser window or before the
    /// document has a root element.
    pub fn new() -> Result<Self, UiError> {
        let window = web_sys::window().ok_or_else(|| UiError::Host("no window".into()))?;
        let document = window.document().ok_or_else(|| UiError::Host("no document".into()))?;
        let root = document
            .document_element()
            .ok_or_else(|| UiError::Host("document has no root element".into()))?;
        Ok(Self {
            window,
            root,
            document,
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
        })
    }

    fn add_listener(&self, node: &Element, kind: EventKind) {
        let target = node.clone();
        let closure = EventClosure::new(move |event: Event| {
            let origin = match event.target().map(|t| t.dyn_into::<Element>()) {
                Some(Ok(origin)) => origin,
                _ => target.clone(),
            };
            let delivery = DomEvent::bubbled(kind, target.clone(), origin);
            schedule(Box::new(move |host: &Host| host.dispatch(&delivery, Some(&event))));
        });
        match node.add_event_listener_with_callback(kind.dom_name(), closure.as_ref().unchecked_ref()) {
            Ok(()) => self.listeners.borrow_mut().push((node.clone(), kind, closure)),
            Err(err) => log::warn!("web: cannot listen for {} on {node:?}: {err:?}", kind.dom_name()),
        }
    }

    fn observe(&self, node: &Element) {
        let target = node.clone();
        let closure = ObserverClosure::new(move |records: Array, _observer: MutationObserver| {
            let added: Vec<Element> = records
                .iter()
                .filter_map(|record| record.dyn_ref::<MutationRecord>().map(MutationRecord::added_nodes))
                .flat_map(|nodes| elements(&nodes))
                .collect();
            if added.is_empty() {
                return;
            }
            let delivery = DomEvent::mutation(target.clone(), added);
            schedule(Box::new(move |host: &Host| host.dispatch(&delivery, None)));
        });

        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        let observer = MutationObserver::new(closure.as_ref().unchecked_ref())
            .and_then(|observer| observer.observe_with_options(node, &init).map(|()| observer));
        match observer {
            Ok(observer) => self.observers.borrow_mut().push((node.clone(), observer, closure)),
            Err(err) => log::warn!("web: cannot observe {node:?}: {err:?}"),
        }
    }
}

/// Element nodes of `list`, skipping text and comment nodes.
fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect()
}

fn warn_on_err(action: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::warn!("web: {action} failed: {err:?}");
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn document_root(&self) -> Element {
        self.root.clone()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, scope: &Element, query: &Query) -> Vec<Element> {
        match scope.query_selector_all(&query.selector()) {
            Ok(list) => elements(&list),
            Err(err) => {
                log::warn!("web: bad selector {}: {err:?}", query.selector());
                Vec::new()
            }
        }
    }

    fn matches(&self, node: &Element, query: &Query) -> bool {
        node.matches(&query.selector()).unwrap_or(false)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        warn_on_err("setAttribute", node.set_attribute(name, value));
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        warn_on_err("removeAttribute", node.remove_attribute(name));
    }

    fn add_class(&self, node: &Element, class: &str) {
        warn_on_err("classList.add", node.class_list().add_1(class));
    }

    fn remove_class(&self, node: &Element, class: &str) {
        warn_on_err("classList.remove", node.class_list().remove_1(class));
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, node: &Element, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }

    fn is_checked(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlInputElement>().is_some_and(HtmlInputElement::checked)
    }

    fn set_checked(&self, node: &Element, checked: bool) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    fn control_kind(&self, node: &Element) -> ControlKind {
        match node.dyn_ref::<HtmlInputElement>().map(HtmlInputElement::type_) {
            Some(kind) if kind == "checkbox" || kind == "radio" => ControlKind::Checkable,
            _ => ControlKind::Valued,
        }
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(html) = node.dyn_ref::<HtmlElement>() {
            warn_on_err("style.setProperty", html.style().set_property(property, value));
        }
    }

    fn viewport_width(&self) -> f64 {
        match self.window.inner_width().map(|width| width.as_f64()) {
            Ok(Some(width)) => width,
            _ => f64::from(self.root.client_width()),
        }
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn listen(&self, node: &Element, kind: EventKind) {
        match kind {
            EventKind::Mutation => self.observe(node),
            _ => self.add_listener(node, kind),
        }
    }

    fn unlisten(&self, node: &Element, kind: EventKind) {
        if kind == EventKind::Mutation {
            self.observers.borrow_mut().retain(|(target, observer, _)| {
                if target != node {
                    return true;
                }
                observer.disconnect();
                false
            });
            return;
        }
        self.listeners.borrow_mut().retain(|(target, k, closure)| {
            if target != node || *k != kind {
                return true;
            }
            warn_on_err(
                "removeEventListener",
                node.remove_event_listener_with_callback(kind.dom_name(), closure.as_ref().unchecked_ref()),
            );
            false
        });
    }
}

// =============================================================
// Host
// =============================================================

type Job = Box<dyn FnOnce(&Host)>;

struct Host {
    dom: WebDom,
    widgets: BootstrapWidgets,
    ui: RefCell<MenuUi<Element>>,
    queue: RefCell<VecDeque<Job>>,
    draining: Cell<bool>,
}

thread_local! {
    static HOST: RefCell<Option<Rc<Host>>> = const { RefCell::new(None) };
}

impl Host {
    fn dispatch(&self, event: &DomEvent<Element>, native: Option<&Event>) {
        let outcome = self.ui.borrow_mut().handle(&self.dom, &self.widgets, event);
        if let Some(native) = native {
            if outcome.prevent_default {
                native.prevent_default();
            }
            if outcome.stop_propagation {
                native.stop_propagation();
            }
        }
    }
}

/// Run `job` against the host, or queue it when another job is running.
fn schedule(job: Job) {
    let Some(host) = HOST.with(|slot| slot.borrow().clone()) else {
        log::warn!("menus-ui: not started");
        return;
    };
    host.queue.borrow_mut().push_back(job);
    if host.draining.replace(true) {
        return;
    }
    loop {
        let next = host.queue.borrow_mut().pop_front();
        let Some(job) = next else {
            break;
        };
        job(&host);
    }
    host.draining.set(false);
}

fn parse_config(raw: Option<&str>) -> (UiConfig, Option<UiError>) {
    match raw.map(UiConfig::from_json) {
        None => (UiConfig::default(), None),
        Some(Ok(config)) => (config, None),
        Some(Err(err)) => (UiConfig::default(), Some(err)),
    }
}

fn boot(config: UiConfig) {
    let dom = match WebDom::new() {
        Ok(dom) => dom,
        Err(err) => {
            log::error!("menus-ui: {err}");
            return;
        }
    };
    let window = dom.window.clone();
    let host = Rc::new(Host {
        dom,
        widgets: BootstrapWidgets,
        ui: RefCell::new(MenuUi::new(config)),
        queue: RefCell::new(VecDeque::new()),
        draining: Cell::new(false),
    });
    let installed = HOST.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return false;
        }
        *slot = Some(host);
        true
    });
    if !installed {
        log::debug!("menus-ui: already started");
        return;
    }
    schedule(Box::new(|host: &Host| host.ui.borrow_mut().start(&host.dom, &host.widgets)));
    install_sidebar_utils(&window);
}

/// Publish `window.SidebarMenuUtils` for scripts outside this module.
fn install_sidebar_utils(window: &Window) {
    let utils = Object::new();
    let close = Closure::<dyn Fn()>::new(close_all_submenus).into_js_value();
    let reinitialize = Closure::<dyn Fn()>::new(reinitialize_sidebar).into_js_value();
    let installed = Reflect::set(&utils, &JsValue::from_str("closeAllSubmenus"), &close)
        .and_then(|_| Reflect::set(&utils, &JsValue::from_str("reinitialize"), &reinitialize))
        .and_then(|_| Reflect::set(window, &JsValue::from_str("SidebarMenuUtils"), &utils));
    if let Err(err) = installed {
        log::warn!("menus-ui: SidebarMenuUtils not installed: {err:?}");
    }
}

// =============================================================
// Exports
// =============================================================

/// Start the menus UI. Waits for `DOMContentLoaded` while the document is
/// still loading. `config_json` is an optional [`UiConfig`] object.
///
/// # Errors
///
/// Returns the browser error when the load listener cannot be installed.
#[wasm_bindgen(js_name = startMenusUi)]
pub fn start_menus_ui(config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let (config, problem) = parse_config(config_json.as_deref());
    let level = config.level().unwrap_or(log::Level::Info);
    if console_log::init_with_level(level).is_err() {
        log::debug!("menus-ui: logger already installed");
    }
    if let Some(err) = problem {
        log::warn!("menus-ui: {err}; using defaults");
    }

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("menus-ui: no document"))?;
    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(move || boot(config));
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    } else {
        boot(config);
    }
    Ok(())
}

/// Re-apply visibility and (re)bind the type select and list entries.
#[wasm_bindgen(js_name = initMenusSearchbar)]
pub fn init_menus_searchbar() {
    schedule(Box::new(|host: &Host| host.ui.borrow_mut().init_searchbar(&host.dom)));
}

/// Re-apply form group visibility for the current type selection.
#[wasm_bindgen(js_name = toggleFormGroups)]
pub fn toggle_form_groups() {
    schedule(Box::new(|host: &Host| {
        let selection = host.ui.borrow().apply_visibility(&host.dom);
        log::debug!("form: visibility applied for {selection:?}");
    }));
}

/// Fill the add form as if a list entry had been clicked.
#[wasm_bindgen(js_name = updateFormFromListItem)]
pub fn update_form_from_list_item(item_type: &str, id: &str, label: &str) {
    let entry = ListEntry::new(item_type, id, label);
    schedule(Box::new(move |host: &Host| {
        let kind = host.ui.borrow().populate(&host.dom, &entry);
        log::debug!("form: populated as {kind:?}");
    }));
}

/// Collapse every open sidebar submenu.
#[wasm_bindgen(js_name = closeAllSubmenus)]
pub fn close_all_submenus() {
    schedule(Box::new(|host: &Host| {
        let closed = host.ui.borrow().close_all_submenus(&host.dom, &host.widgets);
        log::debug!("sidebar: closing {closed} submenu(s)");
    }));
}

/// Re-run the sidebar binding pass.
#[wasm_bindgen(js_name = reinitializeSidebar)]
pub fn reinitialize_sidebar() {
    schedule(Box::new(|host: &Host| host.ui.borrow_mut().reinitialize_sidebar(&host.dom, &host.widgets)));
}
