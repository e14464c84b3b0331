//! Mapping engine: modeled objects to element trees and back.
//!
//! Both directions walk the cached descriptor table of the type in order-key
//! order. Scalars go through the codec registry by tag; composites recurse
//! through their [`Composite`](crate::model::Composite) impl.

mod path;
mod read;
mod write;

#[cfg(test)]
mod tests;

// re-exports
pub use read::{
    DecodeWarning, Decoded, Reader, WarningKind, deserialize, deserialize_with_options,
    read_object,
};
pub use write::{
    Entry, EntryContent, Writer, entries, equivalent, serialize, serialize_with,
    serialize_with_options, write_object,
};
