//! DOM contract shared by the form toggler and the sidebar controller.
//!
//! The surrounding admin page supplies these ids and classes; this crate only
//! reads and writes them.

// ── Add-item form ───────────────────────────────────────────────

/// Item type `<select>`.
pub const ITEM_TYPE_ID: &str = "item_type";
/// The add-item `<form>`; its absence disables the toggler.
pub const ADD_ITEM_FORM_ID: &str = "add-item-form";
/// Group holding the "dynamic label" checkbox, revealed only for pages.
pub const DYNAMIC_GROUP_ID: &str = "dynamic-group";
pub const LABEL_GROUP_ID: &str = "label-group";
pub const URL_GROUP_ID: &str = "url-group";
pub const MENU_GROUP_ID: &str = "menu-group";
pub const ITEM_URL_ID: &str = "item_url";
pub const ITEM_DYNAMIC_ID: &str = "item_dynamic";
pub const ITEM_LABEL_ID: &str = "item_label";
/// Hidden input carrying the id of the source page, xpage, url or menu.
pub const SOURCE_ID_ITEM_ID: &str = "source_id_item";
pub const ITEM_TARGET_MENU_ID: &str = "item_target_menu";

/// Suffix appended to every add-form id to get its edit-form counterpart.
pub const EDIT_FORM_SUFFIX: &str = "_modif";

// ── Sidebar ─────────────────────────────────────────────────────

/// Default id of the sidebar offcanvas container.
pub const SIDEBAR_ID: &str = "sidebarOffcanvas";

// ── Classes and attributes ──────────────────────────────────────

pub const CLASS_ACTIVE: &str = "active";
pub const CLASS_SHOW: &str = "show";
pub const ATTR_HIDDEN: &str = "hidden";
pub const ATTR_DISABLED: &str = "disabled";
pub const ATTR_ARIA_EXPANDED: &str = "aria-expanded";
pub const ATTR_DATA_TYPE: &str = "data-type";

// ── Arrow icon ──────────────────────────────────────────────────

pub const ARROW_EXPANDED: &str = "rotate(180deg)";
pub const ARROW_COLLAPSED: &str = "rotate(0deg)";

// ── Limits ──────────────────────────────────────────────────────

/// Maximum number of characters copied into the label input.
pub const LABEL_MAX_CHARS: usize = 50;

/// Viewports narrower than this (CSS pixels, Bootstrap `xl`) close the
/// sidebar after a plain link is clicked.
pub const NARROW_VIEWPORT_PX: f64 = 1200.0;
