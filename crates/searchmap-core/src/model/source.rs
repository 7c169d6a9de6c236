use crate::{error::MappingError, model::FieldKind, traits::MappedEntity};
use serde::{Deserialize, Serialize};
use std::{
    any::TypeId,
    fmt::{self, Debug},
};

///
/// MappingSource
///
/// Reads the declared field mapping of an entity type.
/// The metadata factory calls this at most once per type and caches the
/// validated result.
///

pub trait MappingSource: Send + Sync {
    fn read_field_mappings(&self, entity: &EntityType) -> Result<EntityMapping, MappingError>;
}

///
/// DeclaredMappingSource
///
/// Default source: the mapping the entity type declares in code.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DeclaredMappingSource;

impl MappingSource for DeclaredMappingSource {
    fn read_field_mappings(&self, entity: &EntityType) -> Result<EntityMapping, MappingError> {
        Ok(entity.declared_mapping())
    }
}

///
/// EntityType
///
/// Type identity of a mapped entity: `TypeId` for cache keys, the stable
/// path for diagnostics and table lookups, and the in-code declaration.
///

#[derive(Clone, Copy)]
pub struct EntityType {
    path: &'static str,
    type_id: TypeId,
    declared: fn() -> EntityMapping,
}

impl EntityType {
    #[must_use]
    pub fn of<E: MappedEntity>() -> Self {
        Self {
            path: E::PATH,
            type_id: TypeId::of::<E>(),
            declared: E::declared_mapping,
        }
    }

    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Last segment of the path, e.g. `Post` for `blog::Post`.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.path.rsplit("::").next().unwrap_or(self.path)
    }

    #[must_use]
    pub fn declared_mapping(&self) -> EntityMapping {
        (self.declared)()
    }
}

impl Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EntityType {}

///
/// EntityMapping
///
/// Declared (unvalidated) mapping of one entity type, as produced by a
/// `MappingSource`. `MetaInformation` is the validated form.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntityMapping {
    pub indexable: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    pub fields: Vec<FieldMapping>,
}

impl EntityMapping {
    /// Indexable mapping keyed by the given identifier field.
    #[must_use]
    pub fn indexable(identifier: impl Into<String>) -> Self {
        Self {
            indexable: true,
            identifier: Some(identifier.into()),
            ..Self::default()
        }
    }

    /// Mapping for an entity that opts out of indexing.
    #[must_use]
    pub fn not_indexable() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn document_name(mut self, name: impl Into<String>) -> Self {
        self.document_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    #[must_use]
    pub const fn boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }
}

///
/// FieldMapping
/// One declared field. Defaults: nullable, stored, indexed.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FieldMapping {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,

    pub kind: FieldKind,

    #[serde(default = "default_true")]
    pub nullable: bool,

    #[serde(default = "default_true")]
    pub stored: bool,

    #[serde(default = "default_true")]
    pub indexed: bool,

    #[serde(default)]
    pub index_authoritative: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

const fn default_true() -> bool {
    true
}

impl FieldMapping {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            document_name: None,
            kind,
            nullable: true,
            stored: true,
            indexed: true,
            index_authoritative: false,
            boost: None,
        }
    }

    #[must_use]
    pub fn document_name(mut self, name: impl Into<String>) -> Self {
        self.document_name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    #[must_use]
    pub const fn not_stored(mut self) -> Self {
        self.stored = false;
        self
    }

    #[must_use]
    pub const fn not_indexed(mut self) -> Self {
        self.indexed = false;
        self
    }

    #[must_use]
    pub const fn index_authoritative(mut self) -> Self {
        self.index_authoritative = true;
        self
    }

    #[must_use]
    pub const fn boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }
}
