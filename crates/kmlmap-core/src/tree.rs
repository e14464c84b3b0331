//! Element tree boundary.
//!
//! The engine never parses or prints markup. It reads through [`ElementView`]
//! and writes through [`TreeBuilder`]; [`Node`] is the owned tree that
//! implements both sides.

use serde::{Deserialize, Serialize};
use std::fmt;

///
/// QName
///
/// Element name. The namespace is an opaque passthrough and never resolved.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    #[must_use]
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    #[must_use]
    pub fn with_namespace(namespace: Option<&str>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local: local.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

///
/// ElementView
///
/// Read-only view over one parsed element.
///

pub trait ElementView {
    fn local_name(&self) -> &str;

    fn namespace(&self) -> Option<&str>;

    /// Child elements in document order.
    fn child_elements(&self) -> Vec<&dyn ElementView>;

    /// Text content for leaf elements. `None` for elements with children.
    fn text(&self) -> Option<&str>;
}

///
/// TreeBuilder
///
/// Construction side of the tree boundary.
///

pub trait TreeBuilder {
    type Node;

    fn leaf(&mut self, name: QName, text: String) -> Self::Node;

    fn branch(&mut self, name: QName, children: Vec<Self::Node>) -> Self::Node;
}

///
/// Content
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Content {
    Text(String),
    Children(Vec<Node>),
}

///
/// Node
///
/// Owned element tree.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Node {
    pub name: QName,
    pub content: Content,
}

impl Node {
    #[must_use]
    pub fn leaf(local: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: QName::local(local),
            content: Content::Text(text.into()),
        }
    }

    #[must_use]
    pub fn branch(local: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            name: QName::local(local),
            content: Content::Children(children),
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.name.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.content {
            Content::Children(children) => children,
            Content::Text(_) => &[],
        }
    }

    /// First direct child with the given local name.
    #[must_use]
    pub fn child(&self, local: &str) -> Option<&Self> {
        self.children().iter().find(|c| c.name.local == local)
    }

    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Children(_) => None,
        }
    }

    /// Rebuild this tree through another builder.
    pub fn build_with<B: TreeBuilder>(&self, builder: &mut B) -> B::Node {
        match &self.content {
            Content::Text(text) => builder.leaf(self.name.clone(), text.clone()),
            Content::Children(children) => {
                let children = children.iter().map(|c| c.build_with(builder)).collect();
                builder.branch(self.name.clone(), children)
            }
        }
    }
}

impl ElementView for Node {
    fn local_name(&self) -> &str {
        &self.name.local
    }

    fn namespace(&self) -> Option<&str> {
        self.name.namespace.as_deref()
    }

    fn child_elements(&self) -> Vec<&dyn ElementView> {
        self.children()
            .iter()
            .map(|c| c as &dyn ElementView)
            .collect()
    }

    fn text(&self) -> Option<&str> {
        self.text_content()
    }
}

///
/// NodeBuilder
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NodeBuilder;

impl TreeBuilder for NodeBuilder {
    type Node = Node;

    fn leaf(&mut self, name: QName, text: String) -> Node {
        Node {
            name,
            content: Content::Text(text),
        }
    }

    fn branch(&mut self, name: QName, children: Vec<Node>) -> Node {
        Node {
            name,
            content: Content::Children(children),
        }
    }
}
