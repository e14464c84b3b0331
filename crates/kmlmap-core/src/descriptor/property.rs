use crate::{
    codec::{AnyScalar, CodecError, ScalarCodec, ScalarTag},
    engine::{Reader, Writer},
    error::MappingError,
    tree::{ElementView, Node},
};
use serde::Serialize;
use std::any::{Any, TypeId};

///
/// Multiplicity
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Multiplicity {
    SingleOptional,
    SingleRequired,
    OrderedCollection,
}

impl Multiplicity {
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::SingleRequired)
    }

    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::OrderedCollection)
    }
}

///
/// PropertyKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyKind {
    Scalar { tag: ScalarTag },
    Composite,
}

///
/// PropertyDef
///
/// One property as declared on a modeled type, before validation.
///

pub struct PropertyDef<T> {
    /// Rust field name.
    pub ident: &'static str,
    /// Element local name. `None` marks a catch-all.
    pub name: Option<&'static str>,
    pub namespace: Option<&'static str>,
    pub order: u32,
    pub multiplicity: Multiplicity,
    /// Textual default, decoded through the property's codec.
    pub default: Option<&'static str>,
    pub suppress_default: bool,
    pub access: Access<T>,
}

///
/// Access
///

pub enum Access<T> {
    Scalar(ScalarAccess<T>),
    Composite(CompositeAccess<T>),
}

impl<T> Access<T> {
    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        match self {
            Self::Scalar(access) => PropertyKind::Scalar { tag: access.tag },
            Self::Composite(_) => PropertyKind::Composite,
        }
    }
}

///
/// ScalarAccess
///
/// `get` yields the set values (none for an unset leaf, one per member for
/// a collection). `put` stores one decoded value: assignment for single
/// properties, append for collections.
///

pub struct ScalarAccess<T> {
    pub tag: ScalarTag,
    /// Rust type of one stored value.
    pub value_type: fn() -> TypeId,
    /// Codec registered for `tag` if nothing else claimed it first.
    pub fallback: Option<fn() -> ScalarCodec>,
    pub get: fn(&T) -> Vec<&dyn Any>,
    pub put: fn(&mut T, AnyScalar) -> Result<(), CodecError>,
}

///
/// CompositeAccess
///

pub struct CompositeAccess<T> {
    /// Capability test of the child type, used for catch-all routing.
    pub accepts: fn(&str) -> bool,
    /// Number of children currently held.
    pub count: fn(&T) -> usize,
    pub write: fn(&T, &mut Writer) -> Result<Vec<Node>, MappingError>,
    pub read: fn(&mut T, &dyn ElementView, &mut Reader) -> Result<(), MappingError>,
}
