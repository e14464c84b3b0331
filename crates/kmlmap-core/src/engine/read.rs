use crate::{
    codec::{self, CodecError},
    config::MappingOptions,
    descriptor::{Access, Property, ScalarAccess, TypeDescriptor, describe},
    engine::path::{PathSegment, render_path},
    error::MappingError,
    model::{Composite, Modeled},
    obs::sink::{self, MetricsEvent},
    ownership::Element,
    tree::ElementView,
};
use serde::Serialize;
use thiserror::Error as ThisError;

///
/// Decoded
///
/// A deserialized object plus the non-fatal problems met on the way.
///

#[derive(Debug)]
pub struct Decoded<T> {
    pub value: T,
    pub warnings: Vec<DecodeWarning>,
}

impl<T> Decoded<T> {
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

///
/// DecodeWarning
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, ThisError)]
#[error("{path}: {kind}")]
pub struct DecodeWarning {
    /// Dotted location, e.g. `ListStyle.ItemIcon[1].state`.
    pub path: String,
    /// Local name of the offending element.
    pub element: String,
    pub kind: WarningKind,
}

///
/// WarningKind
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, ThisError)]
pub enum WarningKind {
    /// An optional scalar did not decode; the property kept its prior state.
    #[error("{0}")]
    Decode(#[serde(serialize_with = "display")] CodecError),

    /// A nested child failed fatally and was dropped.
    #[error("child dropped: {0}")]
    ChildRejected(#[serde(serialize_with = "display")] Box<MappingError>),
}

fn display<S: serde::Serializer>(
    value: &impl std::fmt::Display,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

///
/// Reader
///
/// Deserialization state threaded through composite children.
///

#[derive(Debug)]
pub struct Reader {
    options: MappingOptions,
    depth: usize,
    path: Vec<PathSegment>,
    warnings: Vec<DecodeWarning>,
}

impl Reader {
    #[must_use]
    pub const fn new(options: MappingOptions) -> Self {
        Self {
            options,
            depth: 0,
            path: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &MappingOptions {
        &self.options
    }

    #[must_use]
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    /// Reconstruct one composite child.
    ///
    /// A child that fails fatally is dropped and reported as a warning;
    /// only configuration errors and the depth limit propagate.
    pub fn read_child<C: Composite>(
        &mut self,
        view: &dyn ElementView,
    ) -> Result<Option<Element<C>>, MappingError> {
        match C::read(view, self) {
            Ok(value) => Ok(Some(Element::new(value))),
            Err(err) if err.is_child_recoverable() => {
                tracing::debug!(element = view.local_name(), error = %err, "dropping child");
                self.warn(None, view.local_name(), WarningKind::ChildRejected(Box::new(err)));

                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn warn(&mut self, extra: Option<PathSegment>, element: &str, kind: WarningKind) {
        self.warnings.push(DecodeWarning {
            path: render_path(&self.path, extra),
            element: element.to_string(),
            kind,
        });
    }

    fn enter(&mut self) -> Result<(), MappingError> {
        if self.depth >= self.options.max_depth {
            return Err(MappingError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;

        Ok(())
    }

    fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

pub fn deserialize<T: Modeled>(root: &dyn ElementView) -> Result<Decoded<T>, MappingError> {
    deserialize_with_options(root, MappingOptions::default())
}

pub fn deserialize_with_options<T: Modeled>(
    root: &dyn ElementView,
    options: MappingOptions,
) -> Result<Decoded<T>, MappingError> {
    let _span = tracing::debug_span!("deserialize", element = T::ELEMENT_NAME).entered();

    if options.check_root_name && root.local_name() != T::ELEMENT_NAME {
        return Err(MappingError::UnexpectedRoot {
            expected: T::ELEMENT_NAME,
            found: root.local_name().to_string(),
        });
    }

    let mut reader = Reader::new(options);
    reader.path.push(PathSegment::Element(root.local_name().to_string()));

    let value = read_object::<T>(root, &mut reader)?;
    let warnings = reader.warnings;

    sink::record(MetricsEvent::DeserializeFinish {
        element: T::ELEMENT_NAME,
        warnings: warnings.len() as u64,
    });

    Ok(Decoded { value, warnings })
}

/// Build a `T` from the children of `view`. The element's own name is not
/// checked.
pub fn read_object<T: Modeled>(
    view: &dyn ElementView,
    reader: &mut Reader,
) -> Result<T, MappingError> {
    let descriptor = describe::<T>()?;

    reader.enter()?;
    let result = read_properties(descriptor, view, reader);
    reader.exit();

    result
}

fn read_properties<T: Modeled>(
    descriptor: &TypeDescriptor<T>,
    view: &dyn ElementView,
    reader: &mut Reader,
) -> Result<T, MappingError> {
    let properties = descriptor.properties();
    let mut obj = T::default();
    // occurrences per property, in document order
    let mut seen = vec![0_usize; properties.len()];

    for child in view.child_elements() {
        let name = child.local_name();
        let Some(index) = descriptor.resolve_index(name) else {
            tracing::trace!(parent = T::ELEMENT_NAME, element = name, "skipping unclaimed element");
            continue;
        };
        let (Some(property), Some(count)) = (properties.get(index), seen.get_mut(index)) else {
            continue;
        };
        let position = *count;
        *count += 1;

        match &property.access {
            Access::Scalar(access) => {
                read_scalar::<T>(property, access, &mut obj, child, position, reader)?;
            }
            Access::Composite(access) => {
                let mut pushed = 1;
                reader.path.push(PathSegment::Element(name.to_string()));
                if property.descriptor.multiplicity.is_collection() {
                    reader.path.push(PathSegment::Index(position));
                    pushed += 1;
                }

                let result = (access.read)(&mut obj, child, reader);
                reader.path.truncate(reader.path.len() - pushed);
                result?;
            }
        }
    }

    for (property, seen) in properties.iter().zip(seen) {
        if !property.descriptor.multiplicity.is_required() {
            continue;
        }

        match &property.access {
            Access::Scalar(_) if seen > 0 => {}
            Access::Scalar(access) => {
                if let Some(default) = property.descriptor.default.as_deref() {
                    assume_default(property, access, &mut obj, default)?;
                    continue;
                }

                return Err(missing::<T>(property));
            }
            Access::Composite(access) => {
                if (access.count)(&obj) == 0 {
                    return Err(missing::<T>(property));
                }
            }
        }
    }

    Ok(obj)
}

fn missing<T: Modeled>(property: &Property<T>) -> MappingError {
    MappingError::MissingRequired {
        element: T::ELEMENT_NAME,
        property: property.descriptor.label(),
    }
}

/// An absent required scalar takes its declared default.
fn assume_default<T: Modeled>(
    property: &Property<T>,
    access: &ScalarAccess<T>,
    obj: &mut T,
    default: &str,
) -> Result<(), MappingError> {
    codec::decode(access.tag, default)
        .and_then(|value| (access.put)(obj, value))
        .map_err(|source| MappingError::RequiredValue {
            element: T::ELEMENT_NAME,
            property: property.descriptor.label(),
            source,
        })
}

fn read_scalar<T: Modeled>(
    property: &Property<T>,
    access: &ScalarAccess<T>,
    obj: &mut T,
    child: &dyn ElementView,
    position: usize,
    reader: &mut Reader,
) -> Result<(), MappingError> {
    // a leaf element with no text decodes as empty
    let text = child.text().unwrap_or_default();
    let label = property.descriptor.label();

    match codec::decode(access.tag, text).and_then(|value| (access.put)(obj, value)) {
        Ok(()) => Ok(()),
        Err(err @ CodecError::UnknownCodec { .. }) => Err(err.into()),
        Err(source) if property.descriptor.multiplicity.is_required() => {
            Err(MappingError::RequiredValue {
                element: T::ELEMENT_NAME,
                property: label,
                source,
            })
        }
        Err(source) if property.descriptor.multiplicity.is_collection() => {
            reader.path.push(PathSegment::Property(label));
            reader.warn(
                Some(PathSegment::Index(position)),
                child.local_name(),
                WarningKind::Decode(source),
            );
            reader.path.pop();

            Ok(())
        }
        Err(source) => {
            reader.warn(
                Some(PathSegment::Property(label)),
                child.local_name(),
                WarningKind::Decode(source),
            );

            Ok(())
        }
    }
}
