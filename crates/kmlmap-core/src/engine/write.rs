use crate::{
    codec,
    config::MappingOptions,
    descriptor::{Access, ElementDescriptor, Property, ScalarAccess, describe},
    error::MappingError,
    model::{Composite, Modeled},
    obs::sink::{self, MetricsEvent},
    ownership::Element,
    tree::{Content, Node, QName, TreeBuilder},
};

///
/// Entry
///
/// One emitted child of a serialized object. `name` is absent for members
/// of a catch-all, whose nodes carry their own names.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub name: Option<QName>,
    pub order: u32,
    pub content: EntryContent,
}

///
/// EntryContent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EntryContent {
    Text(String),
    Child(Node),
}

impl Entry {
    /// The element this entry becomes in a tree.
    #[must_use]
    pub fn into_node(self) -> Node {
        match self.content {
            EntryContent::Child(node) => node,
            EntryContent::Text(text) => Node {
                name: self.name.unwrap_or_else(|| QName::local("")),
                content: Content::Text(text),
            },
        }
    }
}

///
/// Writer
///
/// Serialization state threaded through composite children.
///

#[derive(Debug)]
pub struct Writer {
    options: MappingOptions,
    depth: usize,
}

impl Writer {
    #[must_use]
    pub const fn new(options: MappingOptions) -> Self {
        Self { options, depth: 0 }
    }

    #[must_use]
    pub const fn options(&self) -> &MappingOptions {
        &self.options
    }

    /// Serialize one composite child.
    pub fn write_child<C: Composite>(&mut self, child: &Element<C>) -> Result<Node, MappingError> {
        let value = child.read();

        Composite::write(&*value, self)
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

/// Ordered entries of `obj` with default options.
pub fn entries<T: Modeled>(obj: &T) -> Result<Vec<Entry>, MappingError> {
    write_entries(obj, &mut Writer::new(MappingOptions::default()))
}

pub fn serialize<T: Modeled>(obj: &T) -> Result<Node, MappingError> {
    serialize_with_options(obj, MappingOptions::default())
}

pub fn serialize_with_options<T: Modeled>(
    obj: &T,
    options: MappingOptions,
) -> Result<Node, MappingError> {
    let _span = tracing::debug_span!("serialize", element = T::ELEMENT_NAME).entered();

    let node = write_object(obj, &mut Writer::new(options))?;

    sink::record(MetricsEvent::SerializeFinish {
        element: T::ELEMENT_NAME,
        entries: node.children().len() as u64,
    });

    Ok(node)
}

/// Serialize `obj` into a caller-supplied tree representation.
pub fn serialize_with<T: Modeled, B: TreeBuilder>(
    obj: &T,
    builder: &mut B,
) -> Result<B::Node, MappingError> {
    Ok(serialize(obj)?.build_with(builder))
}

/// Whether two objects serialize to the same tree.
pub fn equivalent<T: Modeled>(a: &T, b: &T) -> Result<bool, MappingError> {
    Ok(serialize(a)? == serialize(b)?)
}

/// Serialize `obj` as an element named after its type.
pub fn write_object<T: Modeled>(obj: &T, writer: &mut Writer) -> Result<Node, MappingError> {
    let children = write_entries(obj, writer)?
        .into_iter()
        .map(Entry::into_node)
        .collect();

    Ok(Node {
        name: QName::with_namespace(T::NAMESPACE, T::ELEMENT_NAME),
        content: Content::Children(children),
    })
}

fn write_entries<T: Modeled>(obj: &T, writer: &mut Writer) -> Result<Vec<Entry>, MappingError> {
    let descriptor = describe::<T>()?;

    writer.enter()?;
    let result = collect_entries(descriptor.properties(), obj, writer);
    writer.exit();

    result
}

fn collect_entries<T>(
    properties: &[Property<T>],
    obj: &T,
    writer: &mut Writer,
) -> Result<Vec<Entry>, MappingError> {
    let mut out = Vec::new();

    for property in properties {
        let desc = &property.descriptor;

        match &property.access {
            Access::Scalar(access) => write_scalar(desc, access, obj, writer.options(), &mut out)?,
            Access::Composite(access) => {
                for mut node in (access.write)(obj, writer)? {
                    let name = desc.name.map(|name| {
                        let name = QName::with_namespace(desc.namespace, name);
                        node.name = name.clone();
                        name
                    });

                    out.push(Entry {
                        name,
                        order: desc.order,
                        content: EntryContent::Child(node),
                    });
                }
            }
        }
    }

    Ok(out)
}

fn write_scalar<T>(
    desc: &ElementDescriptor,
    access: &ScalarAccess<T>,
    obj: &T,
    options: &MappingOptions,
    out: &mut Vec<Entry>,
) -> Result<(), MappingError> {
    let name = QName::with_namespace(desc.namespace, desc.label());
    let values = (access.get)(obj);

    if values.is_empty() {
        if options.materialize_defaults
            && !desc.suppress_default
            && !desc.multiplicity.is_collection()
            && let Some(default) = &desc.default
        {
            out.push(Entry {
                name: Some(name),
                order: desc.order,
                content: EntryContent::Text(default.clone()),
            });
        }

        return Ok(());
    }

    for value in values {
        let text = codec::encode(access.tag, value)?;

        if desc.suppress_default && desc.default.as_deref() == Some(text.as_str()) {
            continue;
        }

        out.push(Entry {
            name: Some(name.clone()),
            order: desc.order,
            content: EntryContent::Text(text),
        });
    }

    Ok(())
}
