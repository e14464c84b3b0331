//! ## Crate layout
//! - `core`: scalar codecs, descriptor tables, ownership, and the mapping engine.
//! - `dom`: modeled KML elements built on the derive macros.
//! - `error`: public error facade with a stable kind + origin taxonomy.
//! - `macros`: the `Element` and `Token` derives.
//!
//! The `prelude` module carries what model code needs to declare and map
//! types; engine entry points are re-exported at the crate root.

pub use kmlmap_core as core;
pub use kmlmap_derive as macros;

pub mod dom;
pub mod error;

// generated code names ::kmlmap paths
extern crate self as kmlmap;

// module aliases so derive output resolves against the facade
pub use kmlmap_core::{codec, config, descriptor, engine, leaf, model, obs, ownership, tree};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use kmlmap_core::DEFAULT_MAX_DEPTH;

//
// Entry points
//

pub use error::Error;
pub use kmlmap_core::{
    codec::register_scalar_codec,
    descriptor::describe,
    engine::{deserialize, deserialize_with_options, serialize, serialize_with},
};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::macros::{Element, Token};
    pub use kmlmap_core::{
        codec::{Color32, Scalar as _},
        config::MappingOptions,
        engine::Decoded,
        leaf::{Leaf, LeafState},
        model::{Composite as _, Modeled as _},
        ownership::{Element, ElementId, ElementList, ElementSlot, Identity as _},
        tree::{ElementView as _, Node, QName},
    };
}
