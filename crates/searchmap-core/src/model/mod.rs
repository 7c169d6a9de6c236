//! Entity mapping metadata.
//!
//! - `source` defines *what is declared* (unvalidated `EntityMapping`)
//! - `entity` / `field` define *what runs* (validated `MetaInformation`)
//! - `factory` turns the former into the latter, once per type
mod entity;
mod factory;
mod field;
mod source;

#[cfg(test)]
mod tests;

pub use entity::MetaInformation;
pub use factory::MetaInformationFactory;
pub use field::{FieldDescriptor, FieldKind, IdentifierDescriptor, ParseFieldKindError};
pub use source::{DeclaredMappingSource, EntityMapping, EntityType, FieldMapping, MappingSource};
