//! List entries: existing pages, xpages, links and menus shown next to the
//! item form. Clicking one pre-fills the form.

use crate::consts::ATTR_DATA_TYPE;
use crate::dom::Dom;
use crate::form::ItemType;

/// Snapshot of a clicked list entry. Read-only; never written back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEntry {
    /// Element id: a page id, xpage name, URL or menu id depending on the type.
    pub id: String,
    /// Raw `data-type` attribute.
    pub item_type: String,
    /// Trimmed text content.
    pub label: String,
}

impl ListEntry {
    pub fn new(item_type: impl Into<String>, id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), item_type: item_type.into(), label: label.into() }
    }

    /// Read an entry from its list element at click time.
    pub fn read<D: Dom>(dom: &D, node: &D::Node) -> Self {
        Self {
            id: dom.attribute(node, "id").unwrap_or_default(),
            item_type: dom.attribute(node, ATTR_DATA_TYPE).unwrap_or_default(),
            label: dom.text_content(node).trim().to_owned(),
        }
    }

    /// Parsed item type; `None` for an empty or unknown `data-type`.
    #[must_use]
    pub fn kind(&self) -> Option<ItemType> {
        ItemType::parse(&self.item_type)
    }
}
