//! Conversions between entity values and document values for one `FieldKind`.
//!
//! `encode` runs on the write path (entity → document), `decode` on the read
//! path (document → entity). `decode` also accepts numbers sent as strings
//! and single-valued multi-fields, as search engines return both.

use crate::{model::FieldKind, value::Value};
use thiserror::Error as ThisError;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

///
/// CoercionError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CoercionError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: FieldKind,
        found: &'static str,
    },

    #[error("cannot parse '{input}' as {expected}")]
    Parse { expected: FieldKind, input: String },

    #[error("{value} does not fit in {expected}")]
    OutOfRange { expected: FieldKind, value: String },

    #[error("timestamp {0} is outside the representable date range")]
    DateRange(i64),
}

impl CoercionError {
    fn mismatch(expected: &FieldKind, found: &Value) -> Self {
        Self::Mismatch {
            expected: expected.clone(),
            found: found.label(),
        }
    }

    fn out_of_range(expected: &FieldKind, value: u64) -> Self {
        Self::OutOfRange {
            expected: expected.clone(),
            value: value.to_string(),
        }
    }

    fn parse(expected: &FieldKind, input: &str) -> Self {
        Self::Parse {
            expected: expected.clone(),
            input: input.to_string(),
        }
    }
}

/// Coerce an entity value into its document form.
///
/// `Ok(None)` means the field is absent from the document (null values).
pub(crate) fn encode(kind: &FieldKind, value: &Value) -> Result<Option<Value>, CoercionError> {
    if value.is_null() {
        return Ok(None);
    }

    let encoded = match (kind, value) {
        (FieldKind::List(inner), Value::List(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if let Some(v) = encode_scalar(inner, item)? {
                    out.push(v);
                }
            }

            Value::List(out)
        }
        (FieldKind::List(inner), scalar) => match encode_scalar(inner, scalar)? {
            Some(v) => Value::List(vec![v]),
            None => return Ok(None),
        },
        (kind, scalar) => return encode_scalar(kind, scalar),
    };

    Ok(Some(encoded))
}

fn encode_scalar(kind: &FieldKind, value: &Value) -> Result<Option<Value>, CoercionError> {
    let encoded = match (kind, value) {
        (_, Value::Null) => return Ok(None),
        (FieldKind::String | FieldKind::Text, Value::Text(v)) => Value::Text(v.clone()),
        (FieldKind::Int, Value::Int(v)) => Value::Int(*v),
        (FieldKind::Int, Value::Uint(v)) => Value::Int(narrow(kind, *v)?),
        (FieldKind::Float, Value::Float(v)) => Value::Float(*v),
        #[allow(clippy::cast_precision_loss)]
        (FieldKind::Float, Value::Int(v)) => Value::Float(*v as f64),
        #[allow(clippy::cast_precision_loss)]
        (FieldKind::Float, Value::Uint(v)) => Value::Float(*v as f64),
        (FieldKind::Bool, Value::Bool(v)) => Value::Bool(*v),
        (FieldKind::Date, Value::Int(secs)) => Value::Text(format_timestamp(*secs)?),
        (FieldKind::Date, Value::Text(v)) => Value::Text(format_timestamp(parse_timestamp(v)?)?),
        _ => return Err(CoercionError::mismatch(kind, value)),
    };

    Ok(Some(encoded))
}

/// Coerce a document value back into the form its entity field expects.
pub(crate) fn decode(kind: &FieldKind, value: &Value) -> Result<Value, CoercionError> {
    match (kind, value) {
        (_, Value::Null) => Ok(Value::Null),
        (FieldKind::List(inner), Value::List(items)) => items
            .iter()
            .map(|item| decode_scalar(inner, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        (FieldKind::List(inner), scalar) => Ok(Value::List(vec![decode_scalar(inner, scalar)?])),

        // single-valued field stored as a one-element multi-value
        (kind, Value::List(items)) if items.len() == 1 => decode_scalar(kind, &items[0]),
        (kind, scalar) => decode_scalar(kind, scalar),
    }
}

fn decode_scalar(kind: &FieldKind, value: &Value) -> Result<Value, CoercionError> {
    let decoded = match (kind, value) {
        (_, Value::Null) => Value::Null,

        (FieldKind::String | FieldKind::Text, Value::Text(v)) => Value::Text(v.clone()),
        (FieldKind::String | FieldKind::Text, Value::Int(v)) => Value::Text(v.to_string()),
        (FieldKind::String | FieldKind::Text, Value::Uint(v)) => Value::Text(v.to_string()),
        (FieldKind::String | FieldKind::Text, Value::Float(v)) => Value::Text(v.to_string()),
        (FieldKind::String | FieldKind::Text, Value::Bool(v)) => Value::Text(v.to_string()),

        (FieldKind::Int, Value::Int(v)) => Value::Int(*v),
        (FieldKind::Int, Value::Uint(v)) => Value::Int(narrow(kind, *v)?),
        (FieldKind::Int, Value::Text(v)) => Value::Int(
            v.trim()
                .parse::<i64>()
                .map_err(|_| CoercionError::parse(kind, v))?,
        ),
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        (FieldKind::Int, Value::Float(v))
            if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 =>
        {
            Value::Int(*v as i64)
        }

        (FieldKind::Float, Value::Float(v)) => Value::Float(*v),
        #[allow(clippy::cast_precision_loss)]
        (FieldKind::Float, Value::Int(v)) => Value::Float(*v as f64),
        #[allow(clippy::cast_precision_loss)]
        (FieldKind::Float, Value::Uint(v)) => Value::Float(*v as f64),
        (FieldKind::Float, Value::Text(v)) => Value::Float(
            v.trim()
                .parse::<f64>()
                .map_err(|_| CoercionError::parse(kind, v))?,
        ),

        (FieldKind::Bool, Value::Bool(v)) => Value::Bool(*v),
        (FieldKind::Bool, Value::Text(v)) => match v.trim() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(CoercionError::parse(kind, v)),
        },

        (FieldKind::Date, Value::Text(v)) => Value::Int(parse_timestamp(v)?),
        (FieldKind::Date, Value::Int(secs)) => Value::Int(*secs),

        _ => return Err(CoercionError::mismatch(kind, value)),
    };

    Ok(decoded)
}

// narrow
// int fields hold i64; larger unsigned values are an error, never null
fn narrow(kind: &FieldKind, value: u64) -> Result<i64, CoercionError> {
    i64::try_from(value).map_err(|_| CoercionError::out_of_range(kind, value))
}

// format_timestamp
// unix seconds → RFC 3339 in UTC, the layout search engines accept for dates
fn format_timestamp(secs: i64) -> Result<String, CoercionError> {
    OffsetDateTime::from_unix_timestamp(secs)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .ok_or(CoercionError::DateRange(secs))
}

fn parse_timestamp(input: &str) -> Result<i64, CoercionError> {
    OffsetDateTime::parse(input.trim(), &Rfc3339)
        .map(OffsetDateTime::unix_timestamp)
        .map_err(|_| CoercionError::parse(&FieldKind::Date, input))
}
