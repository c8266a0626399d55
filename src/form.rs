//! Form-group toggler for the menu item forms.
//!
//! SYSTEM CONTEXT
//! ==============
//! The add-item form carries one field group per kind of data an item can
//! hold. The item type select decides which groups are visible; switching the
//! type first clears and hides every group so no value typed for one kind
//! leaks into another. Clicking a list entry sets the type and fills the
//! visible fields from the entry.
//!
//! The edit form reuses the same ids with a `_modif` suffix; only its dynamic
//! label checkbox and target menu mirror are driven from here.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use crate::consts::{
    ADD_ITEM_FORM_ID, ATTR_DISABLED, DYNAMIC_GROUP_ID, EDIT_FORM_SUFFIX, ITEM_DYNAMIC_ID, ITEM_LABEL_ID,
    ITEM_TARGET_MENU_ID, ITEM_TYPE_ID, ITEM_URL_ID, LABEL_GROUP_ID, MENU_GROUP_ID, SOURCE_ID_ITEM_ID,
    URL_GROUP_ID,
};
use crate::dom::{ControlKind, Dom, Query, hide, require, show};
use crate::entry::ListEntry;
use crate::error::UiError;

/// Kind of navigation entry being authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// Portal page, addressed by numeric page id.
    Page,
    /// Application page (xpage), addressed by plugin name.
    XPage,
    /// Arbitrary URL; the entry id is the URL itself.
    ExternalUrl,
    /// Another custom menu nested as a submenu.
    Menu,
}

impl ItemType {
    pub const ALL: [Self; 4] = [Self::Page, Self::XPage, Self::ExternalUrl, Self::Menu];

    /// Parse a select or `data-type` value. Empty and unknown values are `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "page" => Some(Self::Page),
            "xpage" => Some(Self::XPage),
            "external_url" => Some(Self::ExternalUrl),
            "menu" => Some(Self::Menu),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::XPage => "xpage",
            Self::ExternalUrl => "external_url",
            Self::Menu => "menu",
        }
    }

    /// Groups shown for this type. Every other group stays hidden.
    #[must_use]
    pub fn visible_groups(self) -> &'static [FormGroup] {
        match self {
            Self::Page | Self::XPage | Self::ExternalUrl => &[FormGroup::Label, FormGroup::Url],
            Self::Menu => &[FormGroup::Label, FormGroup::Url, FormGroup::Menu],
        }
    }

    /// Value written into the URL input when the type is selected.
    #[must_use]
    pub fn default_url(self) -> Option<&'static str> {
        match self {
            Self::Page => Some("page_id="),
            Self::XPage => Some("page="),
            Self::ExternalUrl => None,
            Self::Menu => Some("#"),
        }
    }
}

/// Field groups managed by the toggler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormGroup {
    Dynamic,
    Label,
    Url,
    Menu,
}

impl FormGroup {
    pub const ALL: [Self; 4] = [Self::Dynamic, Self::Label, Self::Url, Self::Menu];
}

/// Element ids of one form instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormIds {
    pub item_type: String,
    pub form: String,
    pub dynamic_group: String,
    pub label_group: String,
    pub url_group: String,
    pub menu_group: String,
    pub url: String,
    pub dynamic: String,
    pub label: String,
    pub source_id: String,
    pub target_menu: String,
}

impl FormIds {
    /// Ids of the add-item form.
    #[must_use]
    pub fn add() -> Self {
        Self {
            item_type: ITEM_TYPE_ID.into(),
            form: ADD_ITEM_FORM_ID.into(),
            dynamic_group: DYNAMIC_GROUP_ID.into(),
            label_group: LABEL_GROUP_ID.into(),
            url_group: URL_GROUP_ID.into(),
            menu_group: MENU_GROUP_ID.into(),
            url: ITEM_URL_ID.into(),
            dynamic: ITEM_DYNAMIC_ID.into(),
            label: ITEM_LABEL_ID.into(),
            source_id: SOURCE_ID_ITEM_ID.into(),
            target_menu: ITEM_TARGET_MENU_ID.into(),
        }
    }

    /// Ids of the edit form (`_modif` counterparts).
    #[must_use]
    pub fn edit() -> Self {
        let add = Self::add();
        let suffixed = |id: String| format!("{id}{EDIT_FORM_SUFFIX}");
        Self {
            item_type: suffixed(add.item_type),
            form: suffixed(add.form),
            dynamic_group: suffixed(add.dynamic_group),
            label_group: suffixed(add.label_group),
            url_group: suffixed(add.url_group),
            menu_group: suffixed(add.menu_group),
            url: suffixed(add.url),
            dynamic: suffixed(add.dynamic),
            label: suffixed(add.label),
            source_id: suffixed(add.source_id),
            target_menu: suffixed(add.target_menu),
        }
    }

    #[must_use]
    pub fn group(&self, group: FormGroup) -> &str {
        match group {
            FormGroup::Dynamic => &self.dynamic_group,
            FormGroup::Label => &self.label_group,
            FormGroup::Url => &self.url_group,
            FormGroup::Menu => &self.menu_group,
        }
    }
}

/// Shows, hides, clears and fills the field groups of one form.
#[derive(Debug, Clone)]
pub struct FormToggler {
    ids: FormIds,
    label_max_chars: usize,
}

impl FormToggler {
    #[must_use]
    pub fn new(ids: FormIds, label_max_chars: usize) -> Self {
        Self { ids, label_max_chars }
    }

    #[must_use]
    pub fn ids(&self) -> &FormIds {
        &self.ids
    }

    /// Re-apply visibility for whatever the type select currently holds.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the type select or the form is
    /// absent; nothing is touched in that case.
    pub fn apply_visibility<D: Dom>(&self, dom: &D) -> Result<Option<ItemType>, UiError> {
        let select = require(dom, &self.ids.item_type)?;
        let selection = ItemType::parse(&dom.value(&select));
        self.apply_visibility_for_type(dom, selection)?;
        Ok(selection)
    }

    /// Clear and hide every group, then show the groups `selection` calls for
    /// and write its default URL.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the type select or the form is
    /// absent.
    pub fn apply_visibility_for_type<D: Dom>(&self, dom: &D, selection: Option<ItemType>) -> Result<(), UiError> {
        require(dom, &self.ids.item_type)?;
        require(dom, &self.ids.form)?;

        let groups: Vec<(FormGroup, D::Node)> = FormGroup::ALL
            .iter()
            .filter_map(|&group| dom.element_by_id(self.ids.group(group)).map(|node| (group, node)))
            .collect();

        for (_, node) in &groups {
            clear_group(dom, node);
        }
        for (_, node) in &groups {
            hide(dom, node);
        }

        let Some(kind) = selection else {
            return Ok(());
        };
        for (group, node) in &groups {
            if kind.visible_groups().contains(group) {
                show(dom, node);
            }
        }
        if let (Some(default), Some(url)) = (kind.default_url(), dom.element_by_id(&self.ids.url)) {
            dom.set_value(&url, default);
        }
        Ok(())
    }

    /// Select the entry's type and fill the form from it.
    ///
    /// Unknown or empty types reset the form to its initial state.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the type select is absent.
    pub fn populate_from_list_entry<D: Dom>(&self, dom: &D, entry: &ListEntry) -> Result<Option<ItemType>, UiError> {
        let select = require(dom, &self.ids.item_type)?;
        dom.set_value(&select, &entry.item_type);
        if let Err(err) = self.apply_visibility(dom) {
            log::warn!("form: visibility not applied: {err}");
        }

        let id_input = dom.element_by_id(&self.ids.source_id);
        let label_input = dom.element_by_id(&self.ids.label);
        let url_input = dom.element_by_id(&self.ids.url);
        let set = |node: Option<&D::Node>, value: &str| {
            if let Some(node) = node {
                dom.set_value(node, value);
            }
        };

        let kind = entry.kind();
        match kind {
            Some(ItemType::Page) => {
                set(id_input.as_ref(), &entry.id);
                if !entry.label.is_empty() {
                    set(label_input.as_ref(), &page_label(&entry.label, self.label_max_chars));
                }
                set(url_input.as_ref(), &format!("page_id={}", entry.id));
                if let Some(group) = dom.element_by_id(&self.ids.dynamic_group) {
                    show(dom, &group);
                }
            }
            Some(ItemType::XPage) => {
                set(id_input.as_ref(), &entry.id);
                if !entry.label.is_empty() {
                    set(label_input.as_ref(), &truncate_chars(&entry.label, self.label_max_chars));
                }
                set(url_input.as_ref(), &format!("page={}", entry.id));
            }
            Some(ItemType::ExternalUrl) => {
                set(id_input.as_ref(), &entry.id);
                if !entry.label.is_empty() {
                    set(label_input.as_ref(), &truncate_chars(&entry.label, self.label_max_chars));
                }
                set(url_input.as_ref(), &entry.id);
            }
            Some(ItemType::Menu) => {
                set(id_input.as_ref(), &entry.id);
                set(url_input.as_ref(), "#");
                set(dom.element_by_id(&self.ids.target_menu).as_ref(), &entry.id);
            }
            None => {
                dom.set_value(&select, "");
                set(id_input.as_ref(), "");
                set(label_input.as_ref(), "");
                set(url_input.as_ref(), "");
                set(dom.element_by_id(&self.ids.target_menu).as_ref(), "");
                self.apply_visibility_for_type(dom, None)?;
            }
        }
        Ok(kind)
    }

    /// The dynamic label checkbox changed: clear the label group and lock
    /// the label input while the label is dynamic.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when the label group or input is absent.
    pub fn sync_dependent_checkbox<D: Dom>(&self, dom: &D, checked: bool) -> Result<(), UiError> {
        let group = require(dom, &self.ids.label_group)?;
        let input = require(dom, &self.ids.label)?;
        clear_group(dom, &group);
        if checked {
            dom.set_attribute(&input, ATTR_DISABLED, "true");
        } else {
            dom.remove_attribute(&input, ATTR_DISABLED);
        }
        Ok(())
    }

    /// Copy the target menu selection into the hidden source id input.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::MissingElement`] when either element is absent.
    pub fn mirror_target_menu<D: Dom>(&self, dom: &D) -> Result<(), UiError> {
        let target = require(dom, &self.ids.target_menu)?;
        let source = require(dom, &self.ids.source_id)?;
        dom.set_value(&source, &dom.value(&target));
        Ok(())
    }
}

/// Reset every control inside `group` to its empty or unchecked default.
pub fn clear_group<D: Dom>(dom: &D, group: &D::Node) {
    for control in dom.query_all(group, &Query::FormControls) {
        match dom.control_kind(&control) {
            ControlKind::Checkable => dom.set_checked(&control, false),
            ControlKind::Valued => dom.set_value(&control, ""),
        }
    }
}

/// First `-`-separated segment of a page title, trimmed and truncated.
///
/// Page entries read "Title - breadcrumb"; only the title makes a label.
#[must_use]
pub fn page_label(label: &str, max_chars: usize) -> String {
    truncate_chars(label.split('-').next().map_or("", str::trim), max_chars)
}

/// At most `max_chars` characters of `text`.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
