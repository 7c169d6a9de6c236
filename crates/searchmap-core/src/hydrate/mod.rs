//! Read path: rebuild entities from documents.
//!
//! Both strategies validate the document key and decode every value they
//! intend to write *before* touching the target, so a bad document leaves
//! the target as it was. A value the entity itself rejects rolls back the
//! writes that preceded it.

mod index;
mod store;


pub use index::IndexHydrator;
pub use store::StoreHydrator;

use crate::{
    DOCUMENT_KEY_FIELD,
    document::Document,
    error::{ConfigurationError, HydrationError, MapperError},
    model::{FieldDescriptor, IdentifierDescriptor, MetaInformation},
    traits::MappedEntity,
    value::{self, Value},
};
use derive_more::Display;
use std::str::FromStr;
use tracing::warn;

///
/// HydrationMode
///
/// Selects the hydrator used by `EntityMapper::to_entity`.
/// There is no default; callers pick one explicitly.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum HydrationMode {
    /// Rebuild from document data alone; the store is never consulted.
    #[display("index")]
    Index,

    /// Load the canonical entity from the store, then overlay
    /// index-authoritative fields from the document.
    #[display("store")]
    Store,
}

impl FromStr for HydrationMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "index" => Ok(Self::Index),
            "store" | "doctrine" => Ok(Self::Store),
            _ => Err(ConfigurationError::UnknownHydrationMode(s.to_string())),
        }
    }
}

///
/// Hydrator
///
/// Common contract of the hydration strategies. On success `target` holds
/// the hydrated entity.
///

pub trait Hydrator {
    fn hydrate<E: MappedEntity>(
        &self,
        document: &Document,
        target: &mut E,
        meta: &MetaInformation,
    ) -> Result<(), MapperError>;
}

///
/// DecodedField
/// A document value already coerced for its entity field.
///

pub(crate) struct DecodedField<'a> {
    name: &'a str,
    value: Value,
}

fn identifier(meta: &MetaInformation) -> Result<&IdentifierDescriptor, HydrationError> {
    meta.identifier().ok_or_else(|| HydrationError::Unmapped {
        entity: meta.path().to_string(),
    })
}

/// Entity identifier carried by the document key, prefix stripped and
/// coerced to the identifier kind.
pub(crate) fn document_entity_id(
    document: &Document,
    meta: &MetaInformation,
) -> Result<Value, HydrationError> {
    let identifier = identifier(meta)?;
    let key = document
        .key()
        .ok_or_else(|| HydrationError::MissingIdentifier {
            entity: meta.path().to_string(),
        })?;
    let raw = Value::Text(meta.entity_id_from_key(&key).to_string());

    value::decode(&identifier.kind, &raw).map_err(|source| HydrationError::ValueCoercion {
        entity: meta.path().to_string(),
        field: DOCUMENT_KEY_FIELD.to_string(),
        source,
    })
}

/// Decode the document values of every field accepted by `filter`.
/// Fields the document does not carry (or carries as null) are skipped.
pub(crate) fn decode_fields<'m>(
    document: &Document,
    meta: &'m MetaInformation,
    filter: impl Fn(&FieldDescriptor) -> bool,
) -> Result<Vec<DecodedField<'m>>, HydrationError> {
    let mut decoded = Vec::new();

    for field in meta.fields() {
        if !filter(field) {
            continue;
        }
        let Some(raw) = document.get(field.document_name.as_str()) else {
            continue;
        };

        let value =
            value::decode(&field.kind, raw).map_err(|source| HydrationError::ValueCoercion {
                entity: meta.path().to_string(),
                field: field.name.clone(),
                source,
            })?;
        if value.is_null() {
            continue;
        }

        decoded.push(DecodedField {
            name: &field.name,
            value,
        });
    }

    Ok(decoded)
}

/// Write decoded values onto an entity, in order.
///
/// If the entity rejects a value, the fields already written are restored
/// to their previous values before the error is returned.
pub(crate) fn apply<E: MappedEntity>(
    target: &mut E,
    meta: &MetaInformation,
    fields: &[DecodedField<'_>],
) -> Result<(), HydrationError> {
    let mut written: Vec<(&str, Value)> = Vec::with_capacity(fields.len());

    for field in fields {
        let previous = target.field_value(field.name).unwrap_or(Value::Null);

        if let Err(source) = target.set_field_value(field.name, &field.value) {
            restore(target, meta, written);

            return Err(HydrationError::FieldRejected {
                entity: meta.path().to_string(),
                source,
            });
        }
        written.push((field.name, previous));
    }

    Ok(())
}

// restore
// undo writes newest first
fn restore<E: MappedEntity>(
    target: &mut E,
    meta: &MetaInformation,
    written: Vec<(&str, Value)>,
) {
    for (name, previous) in written.into_iter().rev() {
        if let Err(err) = target.set_field_value(name, &previous) {
            warn!(
                entity = meta.path(),
                field = name,
                error = %err,
                "could not restore field"
            );
        }
    }
}
