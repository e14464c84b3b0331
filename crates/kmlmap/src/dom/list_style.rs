use crate::{
    codec::Color32,
    dom::ItemIcon,
    leaf::Leaf,
    ownership::{Element, ElementId, ElementList, OwnershipError},
};
use kmlmap_derive::{Element, Token};

///
/// ListItemType
///
/// How a folder and its contents appear as items in the list view.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Token)]
pub enum ListItemType {
    Check,
    RadioFolder,
    CheckOffOnly,
    CheckHideChildren,
}

///
/// ListStyle
///
/// How a feature is displayed in the list view.
///

#[derive(Debug, Default, Element)]
pub struct ListStyle {
    #[kml(id)]
    id: ElementId,

    #[kml(order = 1, name = "listItemType")]
    pub item_type: Leaf<ListItemType>,

    #[kml(order = 2, name = "bgColor", default = "ffffffff", suppress_default)]
    pub background_color: Leaf<Color32>,

    #[kml(order = 3)]
    item_icons: ElementList<ItemIcon>,

    #[kml(order = 4, name = "maxSnippetLines", default = "2", suppress_default)]
    pub maximum_snippet_lines: Leaf<i32>,
}

impl ListStyle {
    pub const DEFAULT_MAXIMUM_SNIPPET_LINES: i32 = 2;
    pub const DEFAULT_BACKGROUND_COLOR: Color32 = Color32::WHITE;

    #[must_use]
    pub const fn id(&self) -> ElementId {
        self.id
    }

    /// Append an icon. Fails if the icon already belongs to another element.
    pub fn add_item_icon(&mut self, icon: Element<ItemIcon>) -> Result<(), OwnershipError> {
        self.item_icons.push(self.id, icon)
    }

    /// Detach `icon`. Returns whether it was present.
    pub fn remove_item_icon(&mut self, icon: &Element<ItemIcon>) -> bool {
        self.item_icons.remove(icon)
    }

    #[must_use]
    pub const fn item_icons(&self) -> &ElementList<ItemIcon> {
        &self.item_icons
    }

    /// The background color, or the KML default when unset.
    #[must_use]
    pub fn effective_background_color(&self) -> Color32 {
        self.background_color
            .value_or(Self::DEFAULT_BACKGROUND_COLOR)
    }

    #[must_use]
    pub fn effective_maximum_snippet_lines(&self) -> i32 {
        self.maximum_snippet_lines
            .value_or(Self::DEFAULT_MAXIMUM_SNIPPET_LINES)
    }
}
