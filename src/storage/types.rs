//! Storage types: collection paths and documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use super::error::{StorageError, StorageResult};

pub const HISTORY_COLLECTION: &str = "recipe_history";
pub const USERS_COLLECTION: &str = "users";
pub const FAVORITES_COLLECTION: &str = "favorites";

/// Path of a collection, either top-level or nested under a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionPath {
    segments: Vec<String>,
}

impl CollectionPath {
    /// Flat, unscoped history collection
    pub fn history() -> Self {
        Self {
            segments: vec![HISTORY_COLLECTION.to_string()],
        }
    }

    /// Per-user favorites sub-collection
    pub fn favorites(user_id: &str) -> Self {
        Self {
            segments: vec![
                USERS_COLLECTION.to_string(),
                user_id.to_string(),
                FAVORITES_COLLECTION.to_string(),
            ],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// User that owns this collection, if it is user-scoped
    pub fn owner(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [users, uid, _] if users == USERS_COLLECTION => Some(uid.as_str()),
            _ => None,
        }
    }

    /// Reject segments that could escape a backend's namespace
    pub fn validate(&self) -> StorageResult<()> {
        if self.segments.len() % 2 == 0 {
            return Err(StorageError::InvalidPath(format!(
                "{self} does not name a collection"
            )));
        }

        for segment in &self.segments {
            if segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains(['/', '\\', '\0'])
            {
                return Err(StorageError::InvalidPath(format!(
                    "invalid segment {segment:?} in {self}"
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Document to append, with an optional field the store stamps itself
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub fields: Map<String, Value>,
    pub server_timestamp: Option<String>,
}

impl NewDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            server_timestamp: None,
        }
    }

    /// Build a document from any value that serializes to a JSON object
    pub fn from_serializable<T: Serialize>(value: &T) -> StorageResult<Self> {
        match serde_json::to_value(value)? {
            Value::Object(fields) => Ok(Self::new(fields)),
            other => Err(StorageError::serialization(format!(
                "document must be an object, got {other}"
            ))),
        }
    }

    /// Ask the store to write its own clock into `field`
    pub fn with_server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.server_timestamp = Some(field.into());
        self
    }

    /// Assign an id and resolve the server timestamp
    pub(crate) fn into_stored(self, path: &CollectionPath, now: DateTime<Utc>) -> StoredDocument {
        let mut fields = self.fields;
        if let Some(field) = self.server_timestamp {
            fields.insert(field, Value::String(now.to_rfc3339()));
        }

        StoredDocument {
            id: Uuid::new_v4().to_string(),
            path: path.to_string(),
            fields,
            created_at: now,
        }
    }
}

/// A document as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub path: String,
    pub fields: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Deserialize the fields into a typed value
    pub fn decode<T: for<'de> Deserialize<'de>>(&self) -> StorageResult<T> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paths() {
        assert_eq!(CollectionPath::history().to_string(), "recipe_history");
        let favorites = CollectionPath::favorites("user-1");
        assert_eq!(favorites.to_string(), "users/user-1/favorites");
        assert_eq!(favorites.owner(), Some("user-1"));
        assert_eq!(CollectionPath::history().owner(), None);
    }

    #[test]
    fn test_validate_rejects_traversal() {
        assert!(CollectionPath::favorites("user-1").validate().is_ok());
        assert!(CollectionPath::favorites("..").validate().is_err());
        assert!(CollectionPath::favorites("a/b").validate().is_err());
        assert!(CollectionPath::favorites("").validate().is_err());
    }

    #[test]
    fn test_server_timestamp_is_stamped() {
        let fields = json!({ "ingredients": "kip" });
        let doc = NewDocument::from_serializable(&fields)
            .unwrap()
            .with_server_timestamp("timestamp");

        let now = Utc::now();
        let stored = doc.into_stored(&CollectionPath::history(), now);
        assert_eq!(stored.created_at, now);
        assert_eq!(stored.fields["timestamp"], json!(now.to_rfc3339()));
        assert_eq!(stored.fields["ingredients"], "kip");
        assert!(!stored.id.is_empty());
    }

    #[test]
    fn test_from_serializable_requires_object() {
        assert!(NewDocument::from_serializable(&vec![1, 2, 3]).is_err());
    }
}
