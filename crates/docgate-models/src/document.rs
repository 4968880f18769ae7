//! Document models.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use uuid::Uuid;

/// Identifier of a document within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Generate a new random document ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A JSON document that may carry an identity.
///
/// `id()` returning `Some` means the document already has an identity and a
/// save should update it. `None` leaves identifier assignment to the backend.
/// Implementations must treat an empty identifier as absent.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    fn id(&self) -> Option<Cow<'_, str>>;
}

/// A document of shape `T` with an optional identifier.
///
/// The identifier is written as `id`. Backends that return Mongo-style
/// `_id` are accepted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,

    #[serde(flatten)]
    pub fields: T,
}

impl<T> Record<T> {
    /// A record without identity; the backend assigns one on creation.
    pub fn new(fields: T) -> Self {
        Self { id: None, fields }
    }

    /// A record with a caller-chosen identifier.
    pub fn with_id(id: impl Into<DocumentId>, fields: T) -> Self {
        Self {
            id: Some(id.into()),
            fields,
        }
    }
}

impl<T> Document for Record<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn id(&self) -> Option<Cow<'_, str>> {
        self.id
            .as_ref()
            .filter(|id| !id.is_empty())
            .map(|id| Cow::Borrowed(id.as_str()))
    }
}

/// Free-form JSON documents. The identifier is the value under `id`,
/// falling back to `_id`. Non-empty strings and numbers count; numbers are
/// rendered in their JSON form.
impl Document for serde_json::Value {
    fn id(&self) -> Option<Cow<'_, str>> {
        ["id", "_id"]
            .iter()
            .filter_map(|key| match self.get(*key)? {
                serde_json::Value::String(s) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
                serde_json::Value::Number(n) => Some(Cow::Owned(n.to_string())),
                _ => None,
            })
            .next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Task {
        title: String,
        #[serde(default)]
        done: bool,
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(DocumentId::new(), DocumentId::new());
    }

    #[test]
    fn test_record_without_id_omits_field() {
        let record = Record::new(Task {
            title: "buy milk".to_string(),
            done: false,
        });
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"title": "buy milk", "done": false}));
        assert_eq!(record.id().as_deref(), None);
    }

    #[test]
    fn test_record_id_is_flattened_alongside_fields() {
        let record = Record::with_id(
            "k1",
            Task {
                title: "buy milk".to_string(),
                done: true,
            },
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"id": "k1", "title": "buy milk", "done": true}));
        assert_eq!(record.id().as_deref(), Some("k1"));
    }

    #[test]
    fn test_record_accepts_mongo_style_id() {
        let record: Record<Task> =
            serde_json::from_value(json!({"_id": "abc", "title": "t"})).unwrap();
        assert_eq!(record.id().as_deref(), Some("abc"));
        assert_eq!(record.fields.title, "t");
        assert!(!record.fields.done);
    }

    #[test]
    fn test_empty_record_id_counts_as_absent() {
        let record = Record::with_id("", Map::new());
        assert_eq!(record.id().as_deref(), None);
    }

    #[test]
    fn test_free_form_record_keeps_other_fields() {
        let record: Record<Map<String, Value>> =
            serde_json::from_value(json!({"id": "k1", "title": "x", "n": 3})).unwrap();
        assert_eq!(record.id().as_deref(), Some("k1"));
        assert_eq!(record.fields.len(), 2);
        assert!(!record.fields.contains_key("id"));
    }

    #[test]
    fn test_json_value_id_lookup() {
        assert_eq!(json!({"id": "a"}).id().as_deref(), Some("a"));
        assert_eq!(json!({"_id": "b"}).id().as_deref(), Some("b"));
        assert_eq!(json!({"id": "", "_id": "c"}).id().as_deref(), Some("c"));
        assert_eq!(json!({"title": "x"}).id().as_deref(), None);
        assert_eq!(json!({"id": null, "_id": true}).id().as_deref(), None);
    }

    #[test]
    fn test_json_value_numeric_id() {
        assert_eq!(json!({"id": 7, "title": "x"}).id().as_deref(), Some("7"));
        assert_eq!(json!({"_id": 0}).id().as_deref(), Some("0"));
        assert_eq!(json!({"id": "", "_id": 42}).id().as_deref(), Some("42"));
    }
}
