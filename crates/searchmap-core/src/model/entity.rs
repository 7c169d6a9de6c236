use crate::{
    DOCUMENT_KEY_FIELD, DOCUMENT_KEY_SEPARATOR,
    error::MappingError,
    model::{EntityMapping, EntityType, FieldDescriptor, IdentifierDescriptor},
    value::Value,
};
use std::{any::TypeId, collections::BTreeMap};

///
/// MetaInformation
///
/// Validated, immutable mapping metadata for one entity type.
/// Built once per type by `MetaInformationFactory` and shared by `Arc`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct MetaInformation {
    path: &'static str,
    type_id: TypeId,
    document_name: String,
    index: Option<String>,
    boost: Option<f32>,
    identifier: Option<IdentifierDescriptor>,
    fields: Vec<FieldDescriptor>,
    indexable: bool,
}

impl MetaInformation {
    /// Validate a declared mapping and resolve document field names.
    pub fn build(entity: &EntityType, mapping: EntityMapping) -> Result<Self, MappingError> {
        let path = entity.path();
        let document_name = mapping
            .document_name
            .unwrap_or_else(|| entity.short_name().to_ascii_lowercase());
        if document_name.trim().is_empty() {
            return Err(MappingError::EmptyDocumentName {
                entity: path.to_string(),
            });
        }

        // fields
        let mut fields = Vec::with_capacity(mapping.fields.len());
        let mut identifier = None;
        let mut by_document_name: BTreeMap<String, String> = BTreeMap::new();

        for decl in mapping.fields {
            if decl.name.trim().is_empty() {
                return Err(MappingError::EmptyFieldName {
                    entity: path.to_string(),
                });
            }
            if decl.kind.is_nested_list() {
                return Err(MappingError::UnsupportedKind {
                    entity: path.to_string(),
                    field: decl.name,
                    kind: decl.kind,
                });
            }
            if fields.iter().any(|f: &FieldDescriptor| f.name == decl.name)
                || identifier
                    .as_ref()
                    .is_some_and(|id: &IdentifierDescriptor| id.name == decl.name)
            {
                return Err(MappingError::DuplicateField {
                    entity: path.to_string(),
                    field: decl.name,
                });
            }

            // the identifier leaves the field list and owns the document key
            if mapping.identifier.as_deref() == Some(decl.name.as_str()) {
                if decl.kind.is_list() {
                    return Err(MappingError::UnsupportedKind {
                        entity: path.to_string(),
                        field: decl.name,
                        kind: decl.kind,
                    });
                }
                identifier = Some(IdentifierDescriptor {
                    name: decl.name,
                    kind: decl.kind,
                });
                continue;
            }

            let document_field = decl
                .document_name
                .unwrap_or_else(|| format!("{}{}", decl.name, decl.kind.suffix()));

            if document_field.trim().is_empty() {
                return Err(MappingError::EmptyDocumentField {
                    entity: path.to_string(),
                    field: decl.name,
                });
            }
            if document_field == DOCUMENT_KEY_FIELD {
                return Err(MappingError::ReservedDocumentField {
                    entity: path.to_string(),
                    field: decl.name,
                });
            }
            if let Some(first) = by_document_name.insert(document_field.clone(), decl.name.clone())
            {
                return Err(MappingError::DuplicateDocumentField {
                    entity: path.to_string(),
                    document_field,
                    first,
                    second: decl.name,
                });
            }

            fields.push(FieldDescriptor {
                name: decl.name,
                document_name: document_field,
                kind: decl.kind,
                nullable: decl.nullable,
                stored: decl.stored,
                indexed: decl.indexed,
                index_authoritative: decl.index_authoritative,
                boost: decl.boost,
            });
        }

        // identifier
        match (&mapping.identifier, &identifier) {
            (Some(name), None) => {
                return Err(MappingError::UnknownIdentifier {
                    entity: path.to_string(),
                    field: name.clone(),
                });
            }
            (None, _) if mapping.indexable => {
                return Err(MappingError::MissingIdentifier {
                    entity: path.to_string(),
                });
            }
            _ => {}
        }

        Ok(Self {
            path,
            type_id: entity.type_id(),
            document_name,
            index: mapping.index,
            boost: mapping.boost,
            identifier,
            fields,
            indexable: mapping.indexable,
        })
    }

    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    /// Target index (core/collection) name, if declared.
    #[must_use]
    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    #[must_use]
    pub const fn boost(&self) -> Option<f32> {
        self.boost
    }

    #[must_use]
    pub const fn identifier(&self) -> Option<&IdentifierDescriptor> {
        self.identifier.as_ref()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[must_use]
    pub const fn is_indexable(&self) -> bool {
        self.indexable
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn field_by_document_name(&self, document_name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.document_name == document_name)
    }

    pub fn indexed_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_indexed())
    }

    pub fn index_authoritative_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_index_authoritative())
    }

    /// Document key for an identifier value: `"{document_name}_{id}"`.
    #[must_use]
    pub fn document_key(&self, id: &Value) -> Option<String> {
        id.key_string()
            .map(|id| format!("{}{DOCUMENT_KEY_SEPARATOR}{id}", self.document_name))
    }

    /// Strip this entity's document-name prefix from a document key.
    /// Keys without the prefix are treated as raw identifiers.
    #[must_use]
    pub fn entity_id_from_key<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.document_name.as_str())
            .and_then(|rest| rest.strip_prefix(DOCUMENT_KEY_SEPARATOR))
            .filter(|rest| !rest.is_empty())
            .unwrap_or(key)
    }
}
