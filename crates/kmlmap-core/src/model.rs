//! Traits implemented by modeled types.

use crate::{
    descriptor::PropertyDef,
    engine::{Reader, Writer},
    error::MappingError,
    ownership::Identity,
    tree::{ElementView, Node},
};

///
/// Modeled
///
/// A type whose properties map to child elements through a declared
/// descriptor table. Normally implemented with `#[derive(Element)]`.
///

pub trait Modeled: Identity + Default + Send + Sync + Sized + 'static {
    const ELEMENT_NAME: &'static str;
    const NAMESPACE: Option<&'static str> = None;

    /// Raw property declarations, in declaration order.
    fn properties() -> Vec<PropertyDef<Self>>;
}

///
/// Composite
///
/// A value that can sit in an [`ElementSlot`](crate::ownership::ElementSlot)
/// or [`ElementList`](crate::ownership::ElementList). Modeled types get this
/// from the derive; polymorphic children implement it by hand and dispatch
/// on the element name.
///

pub trait Composite: Identity + Send + Sync + Sized + 'static {
    /// Whether an element with this local name can become `Self`.
    fn accepts(name: &str) -> bool;

    fn read(view: &dyn ElementView, reader: &mut Reader) -> Result<Self, MappingError>;

    fn write(&self, writer: &mut Writer) -> Result<Node, MappingError>;
}
