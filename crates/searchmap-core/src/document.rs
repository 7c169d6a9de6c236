use crate::{DOCUMENT_KEY_FIELD, value::Value};
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Document
///
/// Flat field → value record exchanged with the search index.
/// Read access derefs to the underlying ordered map; writes go through
/// `set`, which never stores `Value::Null` (null means absent).
///
/// Boosts travel beside the fields for the index client; they are not part
/// of the serialized field map.
///

#[derive(Clone, Debug, Default, Deref, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    #[deref]
    fields: BTreeMap<String, Value>,

    #[serde(skip)]
    boost: Option<f32>,

    #[serde(skip)]
    field_boosts: BTreeMap<String, f32>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field; a null value removes it instead.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();

        if value.is_null() {
            self.remove(&field);
        } else {
            self.fields.insert(field, value);
        }
    }

    /// Remove a field together with its boost.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.field_boosts.remove(field);
        self.fields.remove(field)
    }

    #[must_use]
    pub const fn boost(&self) -> Option<f32> {
        self.boost
    }

    pub const fn set_boost(&mut self, boost: Option<f32>) {
        self.boost = boost;
    }

    #[must_use]
    pub fn field_boost(&self, field: &str) -> Option<f32> {
        self.field_boosts.get(field).copied()
    }

    /// Boost a field the document carries; boosts for absent fields are
    /// ignored.
    pub fn set_field_boost(&mut self, field: &str, boost: f32) {
        if self.fields.contains_key(field) {
            self.field_boosts.insert(field.to_string(), boost);
        }
    }

    /// The document key (`id` field) as a non-empty string.
    #[must_use]
    pub fn key(&self) -> Option<String> {
        self.fields.get(DOCUMENT_KEY_FIELD).and_then(Value::key_string)
    }

    #[must_use]
    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        fields.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Document
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Self::new();
        for (field, value) in iter {
            doc.set(field, value);
        }

        doc
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_values_are_absent() {
        let doc: Document = [("id", Value::from("post_1")), ("title_t", Value::Null)]
            .into_iter()
            .collect();

        assert_eq!(doc.len(), 1);
        assert!(doc.get("title_t").is_none(), "null must not be stored");
    }

    #[test]
    fn setting_null_clears_an_existing_field() {
        let mut doc = Document::new();
        doc.set("title_t", "first");
        doc.set("title_t", Value::Null);

        assert!(!doc.contains_key("title_t"));
    }

    #[test]
    fn field_boosts_follow_their_field() {
        let mut doc = Document::new();
        doc.set_field_boost("title_t", 2.0);
        assert_eq!(doc.field_boost("title_t"), None, "no boost without a value");

        doc.set("title_t", "boosted");
        doc.set_field_boost("title_t", 2.0);
        assert_eq!(doc.field_boost("title_t"), Some(2.0));

        doc.set("title_t", Value::Null);
        assert_eq!(doc.field_boost("title_t"), None);
    }

    #[test]
    fn key_reads_text_and_numeric_ids() {
        let text: Document = [("id", "post_1")].into_iter().collect();
        let numeric: Document = [("id", 7_i64)].into_iter().collect();
        let empty: Document = [("id", "")].into_iter().collect();

        assert_eq!(text.key().as_deref(), Some("post_1"));
        assert_eq!(numeric.key().as_deref(), Some("7"));
        assert_eq!(empty.key(), None, "empty keys are treated as missing");
        assert_eq!(Document::new().key(), None);
    }

    #[test]
    fn serializes_as_a_flat_json_object() {
        let mut doc = Document::new();
        doc.set("id", "post_1");
        doc.set("tags_ss", vec!["a", "b"]);
        doc.set("views_i", 3_i64);

        let json = serde_json::to_value(&doc).expect("document should serialize");
        assert_eq!(
            json,
            serde_json::json!({ "id": "post_1", "tags_ss": ["a", "b"], "views_i": 3 })
        );

        let back: Document = serde_json::from_value(json).expect("document should deserialize");
        assert_eq!(back, doc);
    }
}
