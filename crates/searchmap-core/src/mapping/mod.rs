//! Mapping commands: which entity fields become document fields.


use crate::{
    DOCUMENT_KEY_FIELD,
    document::Document,
    error::{ConfigurationError, MappingError},
    model::{FieldDescriptor, MetaInformation},
    traits::MappedEntity,
    value::{self, Value},
};
use std::{collections::BTreeSet, str::FromStr};
use tracing::{debug, trace};

///
/// MappingCommand
///
/// Write-path strategy. Every variant writes the document key; they differ
/// only in which indexed fields follow it.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum MappingCommand {
    /// Every indexed field.
    #[default]
    MapAllFields,

    /// Only the named entity fields (partial/atomic index updates).
    MapChangedFields(BTreeSet<String>),
}

impl MappingCommand {
    pub fn changed_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MapChangedFields(fields.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MapAllFields => "map_all_fields",
            Self::MapChangedFields(_) => "map_changed_fields",
        }
    }

    fn includes(&self, field: &FieldDescriptor) -> bool {
        match self {
            Self::MapAllFields => true,
            Self::MapChangedFields(changed) => changed.contains(&field.name),
        }
    }

    /// Build a new document from `entity`. The entity is only read.
    pub fn map_to_document<E: MappedEntity>(
        &self,
        entity: &E,
        meta: &MetaInformation,
    ) -> Result<Document, MappingError> {
        let key = document_key(entity, meta)?;
        let mut document = Document::new();
        document.set(DOCUMENT_KEY_FIELD, key);
        document.set_boost(meta.boost());

        for field in meta.indexed_fields().filter(|f| self.includes(f)) {
            let Some(value) = entity.field_value(&field.name) else {
                continue;
            };

            let encoded =
                value::encode(&field.kind, &value).map_err(|source| MappingError::ValueCoercion {
                    entity: meta.path().to_string(),
                    field: field.name.clone(),
                    source,
                })?;

            match encoded {
                Some(v) => {
                    document.set(field.document_name.as_str(), v);
                    if let Some(boost) = field.boost {
                        document.set_field_boost(&field.document_name, boost);
                    }
                }
                None if !field.nullable => debug!(
                    entity = meta.path(),
                    field = field.name.as_str(),
                    "null value on non-nullable field left out of document"
                ),
                None => {}
            }
        }

        trace!(
            entity = meta.path(),
            command = self.name(),
            fields = document.len(),
            "mapped entity to document"
        );

        Ok(document)
    }
}

// document_key
// identifier value → "{document_name}_{id}", never empty
fn document_key<E: MappedEntity>(entity: &E, meta: &MetaInformation) -> Result<String, MappingError> {
    let identifier = meta.identifier().ok_or_else(|| MappingError::MissingIdentifier {
        entity: meta.path().to_string(),
    })?;
    let missing = || MappingError::MissingIdentifierValue {
        entity: meta.path().to_string(),
    };

    let raw = entity
        .field_value(&identifier.name)
        .filter(|v| !v.is_null())
        .ok_or_else(missing)?;
    let id: Value = value::encode(&identifier.kind, &raw)
        .map_err(|source| MappingError::ValueCoercion {
            entity: meta.path().to_string(),
            field: identifier.name.clone(),
            source,
        })?
        .ok_or_else(missing)?;

    meta.document_key(&id).ok_or_else(missing)
}

impl FromStr for MappingCommand {
    type Err = ConfigurationError;

    /// Parses the named command. `map_changed_fields` starts with an empty
    /// change set; fill it with `changed_fields`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "map_all_fields" | "all" => Ok(Self::MapAllFields),
            "map_changed_fields" | "changed" => Ok(Self::MapChangedFields(BTreeSet::new())),
            _ => Err(ConfigurationError::UnknownMappingCommand(s.to_string())),
        }
    }
}
