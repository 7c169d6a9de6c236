use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display},
    str::FromStr,
};
use thiserror::Error as ThisError;

///
/// FieldKind
///
/// Declared type of a mapped field. Drives value coercion in both
/// directions and the dynamic-field suffix of derived document names.
///
/// `Date` fields hold unix seconds on the entity and RFC 3339 text in the
/// document. Lists are one level deep.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldKind {
    String,
    Text,
    Int,
    Float,
    Bool,
    Date,
    List(Box<Self>),
}

impl FieldKind {
    #[must_use]
    pub fn list_of(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Whether this kind nests a list inside a list.
    #[must_use]
    pub fn is_nested_list(&self) -> bool {
        matches!(self, Self::List(inner) if inner.is_list())
    }

    /// Dynamic-field suffix appended to the entity field name when no
    /// document field name is declared.
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::String => "_s",
            Self::Text => "_t",
            Self::Int => "_i",
            Self::Float => "_d",
            Self::Bool => "_b",
            Self::Date => "_dt",
            Self::List(inner) => match inner.as_ref() {
                Self::String => "_ss",
                Self::Text => "_txt",
                Self::Int => "_is",
                Self::Float => "_ds",
                Self::Bool => "_bs",
                Self::Date => "_dts",
                Self::List(_) => "",
            },
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Text => f.write_str("text"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Bool => f.write_str("bool"),
            Self::Date => f.write_str("date"),
            Self::List(inner) => write!(f, "list<{inner}>"),
        }
    }
}

///
/// ParseFieldKindError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown field kind '{0}'")]
pub struct ParseFieldKindError(pub String);

impl FromStr for FieldKind {
    type Err = ParseFieldKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();

        if let Some(inner) = lower
            .strip_prefix("list<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return inner
                .parse::<Self>()
                .map(Self::list_of)
                .map_err(|_| ParseFieldKindError(trimmed.to_string()));
        }

        match lower.as_str() {
            "string" => Ok(Self::String),
            "text" => Ok(Self::Text),
            "int" | "integer" | "long" => Ok(Self::Int),
            "float" | "double" => Ok(Self::Float),
            "bool" | "boolean" => Ok(Self::Bool),
            "date" | "datetime" => Ok(Self::Date),
            _ => Err(ParseFieldKindError(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for FieldKind {
    type Error = ParseFieldKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.to_string()
    }
}

///
/// FieldDescriptor
/// Resolved metadata for one mapped (non-identifier) field.
///

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    /// Entity field name.
    pub name: String,
    /// Document field name (explicit or `name` + kind suffix).
    pub document_name: String,
    pub kind: FieldKind,
    pub nullable: bool,
    pub stored: bool,
    /// Only indexed fields are written to documents.
    pub indexed: bool,
    /// Under store-backed hydration the document value wins over the store.
    pub index_authoritative: bool,
    pub boost: Option<f32>,
}

impl FieldDescriptor {
    #[must_use]
    pub const fn is_indexed(&self) -> bool {
        self.indexed
    }

    #[must_use]
    pub const fn is_index_authoritative(&self) -> bool {
        self.index_authoritative
    }
}

///
/// IdentifierDescriptor
/// The entity field whose value forms the document key.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdentifierDescriptor {
    pub name: String,
    pub kind: FieldKind,
}
