//! Core runtime for kmlmap: scalar codecs, per-type property descriptors,
//! child ownership tracking, and the mapping engine that moves modeled
//! objects to and from generic element trees.
#![warn(unreachable_pub)]

extern crate self as kmlmap;

#[macro_use]
pub(crate) mod scalar_registry;

// public exports are one module level down
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod leaf;
pub mod model;
pub mod obs;
pub mod ownership;
pub mod tree;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Default bound on element nesting for a single mapping pass.
///
/// Deeper trees fail with `MappingError::DepthExceeded` rather than
/// recursing without limit.
pub const DEFAULT_MAX_DEPTH: usize = 64;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or registries are re-exported here.
///

pub mod prelude {
    pub use crate::{
        codec::{Color32, Scalar, ScalarTag},
        leaf::{Leaf, LeafState},
        model::{Composite, Modeled},
        ownership::{Element, ElementId, ElementList, ElementSlot, Identity},
        tree::{ElementView, Node, QName},
    };
}
