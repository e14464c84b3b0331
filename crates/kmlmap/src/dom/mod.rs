//! Modeled KML style elements.

mod item_icon;
mod list_style;


// re-exports
pub use item_icon::{ItemIcon, ItemIconStates};
pub use list_style::{ListItemType, ListStyle};
