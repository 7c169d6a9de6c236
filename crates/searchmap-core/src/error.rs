use crate::{
    model::FieldKind,
    value::{CoercionError, Value},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// MapperError
///
/// Umbrella error for every mapper operation. Each variant wraps the
/// concern-specific error; `class()` gives a stable classification.
///

#[derive(Debug, ThisError)]
pub enum MapperError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Hydration(#[from] HydrationError),

    #[error(transparent)]
    NotFound(#[from] EntityNotFoundError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MapperError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Mapping(_) => ErrorClass::Mapping,
            Self::Configuration(_) => ErrorClass::Configuration,
            Self::Hydration(_) => ErrorClass::Hydration,
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Store(_) => ErrorClass::Store,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    Mapping,
    Configuration,
    Hydration,
    NotFound,
    Store,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Mapping => "mapping",
            Self::Configuration => "configuration",
            Self::Hydration => "hydration",
            Self::NotFound => "not_found",
            Self::Store => "store",
        };
        write!(f, "{label}")
    }
}

///
/// MappingError
///
/// Metadata derivation failures, plus write-path value coercion.
///

#[derive(Debug, ThisError)]
pub enum MappingError {
    #[error("entity '{entity}' declares a field with an empty name")]
    EmptyFieldName { entity: String },

    #[error("entity '{entity}' declares an empty document name")]
    EmptyDocumentName { entity: String },

    #[error("entity '{entity}' maps field '{field}' to an empty document field")]
    EmptyDocumentField { entity: String, field: String },

    #[error("entity '{entity}' declares field '{field}' more than once")]
    DuplicateField { entity: String, field: String },

    #[error(
        "entity '{entity}' maps fields '{first}' and '{second}' to document field '{document_field}'"
    )]
    DuplicateDocumentField {
        entity: String,
        document_field: String,
        first: String,
        second: String,
    },

    #[error("entity '{entity}' field '{field}' claims the reserved document key field")]
    ReservedDocumentField { entity: String, field: String },

    #[error("entity '{entity}' field '{field}' has unsupported kind {kind}")]
    UnsupportedKind {
        entity: String,
        field: String,
        kind: FieldKind,
    },

    #[error("entity '{entity}' is indexable but declares no identifier")]
    MissingIdentifier { entity: String },

    #[error("entity '{entity}' names identifier '{field}' which is not a declared field")]
    UnknownIdentifier { entity: String, field: String },

    #[error("mapping source failed for entity '{entity}': {message}")]
    Source { entity: String, message: String },

    #[error("metadata for '{expected}' cannot map an entity of type '{found}'")]
    EntityMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("entity '{entity}' has no identifier value")]
    MissingIdentifierValue { entity: String },

    #[error("entity '{entity}' field '{field}': {source}")]
    ValueCoercion {
        entity: String,
        field: String,
        source: CoercionError,
    },
}

///
/// ConfigurationError
///
/// Raised before any partial work is done.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigurationError {
    #[error("hydration mode is not set")]
    HydrationModeUnset,

    #[error("unknown hydration mode '{0}'")]
    UnknownHydrationMode(String),

    #[error("unknown mapping command '{0}'")]
    UnknownMappingCommand(String),

    #[error("store-backed hydration requires a persistence registry")]
    StoreUnavailable,
}

///
/// HydrationError
///

#[derive(Debug, ThisError)]
pub enum HydrationError {
    #[error("document for entity '{entity}' has no identifier field")]
    MissingIdentifier { entity: String },

    #[error("entity '{entity}' is not mapped for indexing")]
    Unmapped { entity: String },

    #[error("entity '{entity}' field '{field}': {source}")]
    ValueCoercion {
        entity: String,
        field: String,
        source: CoercionError,
    },

    #[error("entity '{entity}' rejected a hydrated value: {source}")]
    FieldRejected { entity: String, source: FieldError },

    #[error("repository for '{entity}' returned an entity of a different type")]
    EntityType { entity: String },
}

///
/// EntityNotFoundError
///
/// The store has no entity for a document's identifier. Never papered over
/// with a fabricated entity.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("entity '{entity}' with identifier '{id}' not found in store")]
pub struct EntityNotFoundError {
    pub entity: String,
    pub id: String,
}

///
/// StoreError
/// Failures reported by persistence collaborators.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("no object manager registered for '{0}'")]
    NoManager(String),

    #[error("no repository registered for '{0}'")]
    NoRepository(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

///
/// FieldError
/// An entity refused a field write.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("field '{field}' cannot hold {value:?}")]
    InvalidValue { field: String, value: Value },
}

impl FieldError {
    #[must_use]
    pub fn invalid(field: &str, value: &Value) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            value: value.clone(),
        }
    }
}
