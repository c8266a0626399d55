//! Client-side behavior for the menu builder admin pages.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It keeps the
//! add/edit item forms consistent with the selected item type, pre-fills the
//! form from the list of existing pages and menus, and drives the collapsible
//! submenus of the admin sidebar. The host page supplies the markup and the
//! Bootstrap collapse/offcanvas widgets; the `web` feature wires both to the
//! testable core in [`ui::MenuUi`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`ui`] | Startup wiring, event routing, operations exposed to the page |
//! | [`form`] | Form-group toggler for the add and edit forms |
//! | [`sidebar`] | Sidebar submenu controller |
//! | [`binding`] | Attach-once listener registry |
//! | [`dom`] | DOM access capability and structural queries |
//! | [`event`] | Event kinds, deliveries and outcomes |
//! | [`widgets`] | Collapse/offcanvas widget interface |
//! | [`entry`] | List entries read at click time |
//! | [`config`] | Runtime configuration |
//! | [`error`] | Error type |
//! | [`consts`] | Element ids, classes and limits of the page contract |
//! | `web` | Browser host (feature `web`) |

pub mod binding;
pub mod config;
pub mod consts;
pub mod dom;
pub mod entry;
pub mod error;
pub mod event;
pub mod form;
pub mod sidebar;
pub mod ui;
pub mod widgets;

#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
mod testing;
