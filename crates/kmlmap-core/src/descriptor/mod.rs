//! Per-type property descriptor tables.
//!
//! A table is built once per modeled type from [`Modeled::properties`],
//! validated, sorted by order key and cached for the life of the process.

mod property;


use crate::{
    codec::{self, CodecError, ScalarTag},
    model::Modeled,
    obs::sink::{self, MetricsEvent},
};
use serde::Serialize;
use std::{
    any::{Any, TypeId},
    collections::{HashMap, HashSet},
    sync::{LazyLock, PoisonError, RwLock},
};
use thiserror::Error as ThisError;

// re-exports
pub use property::{
    Access, CompositeAccess, Multiplicity, PropertyDef, PropertyKind, ScalarAccess,
};

///
/// DescriptorError
///
/// Configuration mistakes found while building a descriptor table.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum DescriptorError {
    #[error("{element}.{property}: codec registered for {tag} produces a different Rust type")]
    CodecTypeMismatch {
        element: &'static str,
        property: &'static str,
        tag: ScalarTag,
    },

    #[error("{element}.{property}: composite properties cannot declare a default")]
    DefaultOnComposite {
        element: &'static str,
        property: &'static str,
    },

    #[error("{element}: element name '{name}' is declared by more than one property")]
    DuplicateElementName {
        element: &'static str,
        name: &'static str,
    },

    #[error("{element}.{property}: default '{default}' does not decode: {source}")]
    InvalidDefault {
        element: &'static str,
        property: &'static str,
        default: &'static str,
        source: CodecError,
    },

    #[error("{element}.{property}: suppress_default requires a declared default")]
    SuppressWithoutDefault {
        element: &'static str,
        property: &'static str,
    },

    #[error("{element}.{property}: no scalar codec registered for {tag}")]
    UnknownCodec {
        element: &'static str,
        property: &'static str,
        tag: ScalarTag,
    },

    #[error("{element}.{property}: scalar properties need an element name")]
    UnnamedScalar {
        element: &'static str,
        property: &'static str,
    },
}

///
/// ElementDescriptor
///
/// Validated, immutable view of one property.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ElementDescriptor {
    pub ident: &'static str,
    pub name: Option<&'static str>,
    pub namespace: Option<&'static str>,
    pub order: u32,
    /// Position in declaration order; breaks order-key ties.
    pub index: usize,
    pub multiplicity: Multiplicity,
    #[serde(flatten)]
    pub kind: PropertyKind,
    /// Canonical text of the declared default.
    pub default: Option<String>,
    pub suppress_default: bool,
}

impl ElementDescriptor {
    /// The name used in messages: the element name, or the field for
    /// catch-alls.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.name.unwrap_or(self.ident)
    }

    #[must_use]
    pub const fn is_catch_all(&self) -> bool {
        self.name.is_none()
    }
}

///
/// Property
///

pub struct Property<T> {
    pub descriptor: ElementDescriptor,
    pub access: Access<T>,
}

///
/// TypeDescriptor
///
/// Ordered property table of one modeled type.
///

pub struct TypeDescriptor<T> {
    element: &'static str,
    namespace: Option<&'static str>,
    properties: Vec<Property<T>>,
    by_name: HashMap<&'static str, usize>,
    catch_alls: Vec<usize>,
}

impl<T> TypeDescriptor<T> {
    #[must_use]
    pub const fn element_name(&self) -> &'static str {
        self.element
    }

    #[must_use]
    pub const fn namespace(&self) -> Option<&'static str> {
        self.namespace
    }

    /// Properties in serialization order.
    #[must_use]
    pub fn properties(&self) -> &[Property<T>] {
        &self.properties
    }

    /// Public descriptors in serialization order.
    pub fn elements(&self) -> impl Iterator<Item = &ElementDescriptor> {
        self.properties.iter().map(|p| &p.descriptor)
    }

    /// Property by Rust field name.
    #[must_use]
    pub fn get(&self, ident: &str) -> Option<&Property<T>> {
        self.properties.iter().find(|p| p.descriptor.ident == ident)
    }

    /// Route an element to the property that claims it: the named property
    /// first, then the first catch-all whose child type accepts the name.
    #[must_use]
    pub fn resolve(&self, local_name: &str) -> Option<&Property<T>> {
        self.resolve_index(local_name)
            .and_then(|index| self.properties.get(index))
    }

    pub(crate) fn resolve_index(&self, local_name: &str) -> Option<usize> {
        if let Some(&index) = self.by_name.get(local_name) {
            return Some(index);
        }

        self.catch_alls.iter().copied().find(|&index| {
            matches!(
                self.properties.get(index).map(|p| &p.access),
                Some(Access::Composite(access)) if (access.accepts)(local_name)
            )
        })
    }
}

///
/// DESCRIPTORS
/// process-wide cache of validated tables, keyed by type
///

type CachedDescriptor = &'static (dyn Any + Send + Sync);

static DESCRIPTORS: LazyLock<RwLock<HashMap<TypeId, CachedDescriptor>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

fn cached<T: Modeled>(
    map: &HashMap<TypeId, CachedDescriptor>,
) -> Option<&'static TypeDescriptor<T>> {
    let entry: CachedDescriptor = *map.get(&TypeId::of::<T>())?;

    entry.downcast_ref()
}

/// The validated descriptor table of `T`, building it on first use.
///
/// A failed build is not cached, so registering a missing codec and
/// calling again can succeed.
pub fn describe<T: Modeled>() -> Result<&'static TypeDescriptor<T>, DescriptorError> {
    {
        let map = DESCRIPTORS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(descriptor) = cached::<T>(&map) {
            return Ok(descriptor);
        }
    }

    let mut map = DESCRIPTORS.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(descriptor) = cached::<T>(&map) {
        return Ok(descriptor);
    }

    let descriptor: &'static TypeDescriptor<T> = Box::leak(Box::new(build::<T>()?));
    map.insert(TypeId::of::<T>(), descriptor);

    Ok(descriptor)
}

/// Validate and order the declared properties of `T`.
pub fn build<T: Modeled>() -> Result<TypeDescriptor<T>, DescriptorError> {
    let element = T::ELEMENT_NAME;
    let defs = T::properties();

    let mut seen = HashSet::new();
    let mut properties = Vec::with_capacity(defs.len());

    for (index, def) in defs.into_iter().enumerate() {
        let property = def.name.unwrap_or(def.ident);

        if let Some(name) = def.name
            && !seen.insert(name)
        {
            return Err(DescriptorError::DuplicateElementName { element, name });
        }

        if def.suppress_default && def.default.is_none() {
            return Err(DescriptorError::SuppressWithoutDefault { element, property });
        }

        if let Access::Scalar(access) = &def.access {
            if def.name.is_none() {
                return Err(DescriptorError::UnnamedScalar { element, property });
            }
            if let Some(fallback) = access.fallback {
                codec::register_if_absent(fallback());
            }
            match codec::codec_for(access.tag) {
                None => {
                    return Err(DescriptorError::UnknownCodec {
                        element,
                        property,
                        tag: access.tag,
                    });
                }
                Some(found) if !found.carries((access.value_type)()) => {
                    return Err(DescriptorError::CodecTypeMismatch {
                        element,
                        property,
                        tag: access.tag,
                    });
                }
                Some(_) => {}
            }
        }

        let default = match (&def.access, def.default) {
            (_, None) => None,
            (Access::Composite(_), Some(_)) => {
                return Err(DescriptorError::DefaultOnComposite { element, property });
            }
            (Access::Scalar(access), Some(default)) => {
                Some(canonical_default(element, property, access.tag, default)?)
            }
        };

        properties.push(Property {
            descriptor: ElementDescriptor {
                ident: def.ident,
                name: def.name,
                namespace: def.namespace,
                order: def.order,
                index,
                multiplicity: def.multiplicity,
                kind: def.access.kind(),
                default,
                suppress_default: def.suppress_default,
            },
            access: def.access,
        });
    }

    // stable: ties keep declaration order
    properties.sort_by_key(|p| p.descriptor.order);

    let by_name = properties
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.descriptor.name.map(|name| (name, i)))
        .collect();
    let catch_alls = properties
        .iter()
        .enumerate()
        .filter(|(_, p)| p.descriptor.is_catch_all())
        .map(|(i, _)| i)
        .collect();

    tracing::debug!(element, properties = properties.len(), "built descriptor table");
    sink::record(MetricsEvent::DescriptorBuilt {
        element,
        properties: properties.len() as u64,
    });

    Ok(TypeDescriptor {
        element,
        namespace: T::NAMESPACE,
        properties,
        by_name,
        catch_alls,
    })
}

// Decode then re-encode, so later comparisons can be textual.
fn canonical_default(
    element: &'static str,
    property: &'static str,
    tag: ScalarTag,
    default: &'static str,
) -> Result<String, DescriptorError> {
    let invalid = |source| DescriptorError::InvalidDefault {
        element,
        property,
        default,
        source,
    };

    match codec::codec_for(tag) {
        Some(codec) => {
            let value = codec.decode(default).map_err(invalid)?;
            codec.encode(&*value).map_err(invalid)
        }
        None => Err(DescriptorError::UnknownCodec {
            element,
            property,
            tag,
        }),
    }
}
