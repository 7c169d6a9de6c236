//! Core runtime for searchmap: entity metadata, documents, mapping commands,
//! hydrators, and the `EntityMapper` that ties them together.
//!
//! Write path: an entity plus its `MetaInformation` become a flat `Document`
//! through the active `MappingCommand`.
//! Read path: a `Document` is hydrated back onto an entity through the
//! hydrator bound to the mapper's `HydrationMode`.
#![warn(unreachable_pub)]

#[macro_use]
mod macros;

// public exports are one module level down
pub mod document;
pub mod error;
pub mod hydrate;
pub mod mapper;
pub mod mapping;
pub mod model;
pub mod store;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Reserved document field carrying the document key.
///
/// The key is `"{document_name}_{identifier}"`; no mapped field may claim
/// this name.
pub const DOCUMENT_KEY_FIELD: &str = "id";

/// Separator between the document name and the identifier in a document key.
pub const DOCUMENT_KEY_SEPARATOR: char = '_';

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, ports, or adapters are re-exported here.
///

pub mod prelude {
    pub use crate::{
        document::Document,
        hydrate::HydrationMode,
        mapper::EntityMapper,
        mapping::MappingCommand,
        model::{
            EntityMapping, FieldKind, FieldMapping, MetaInformation, MetaInformationFactory,
        },
        traits::{FieldValue, MappedEntity},
        value::Value,
    };
}
