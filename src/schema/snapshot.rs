//! Read-only schema lookup
//!
//! The rewriter only ever borrows a snapshot for the duration of one
//! report generation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::SchemaObject;

/// Schema snapshot trait for the rewriter (read-only)
pub trait SchemaSnapshot {
    /// Look up a schema object by id
    fn lookup(&self, id: &Uuid) -> Option<&SchemaObject>;
}

/// Hash-map backed snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemorySchema {
    #[serde(default)]
    objects: HashMap<Uuid, SchemaObject>,
}

impl InMemorySchema {
    /// Creates an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object, replacing any previous object with the same id
    pub fn insert(&mut self, id: Uuid, object: SchemaObject) {
        self.objects.insert(id, object);
    }

    /// Builder form of [`InMemorySchema::insert`]
    pub fn with_object(mut self, id: Uuid, object: SchemaObject) -> Self {
        self.insert(id, object);
        self
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the snapshot holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates over all objects
    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &SchemaObject)> {
        self.objects.iter()
    }
}

impl SchemaSnapshot for InMemorySchema {
    fn lookup(&self, id: &Uuid) -> Option<&SchemaObject> {
        self.objects.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::NamedObject;
    use serde_json::json;

    #[test]
    fn test_lookup_present_and_absent() {
        let id = Uuid::from_u128(7);
        let schema = InMemorySchema::new().with_object(
            id,
            SchemaObject::Named(NamedObject {
                name: "default::User".into(),
            }),
        );

        assert_eq!(schema.len(), 1);
        assert!(schema.lookup(&id).is_some());
        assert!(schema.lookup(&Uuid::from_u128(8)).is_none());
    }

    #[test]
    fn test_deserialize_keys_as_uuids() {
        let schema: InMemorySchema = serde_json::from_value(json!({
            "objects": {
                "6f1c2a1e-8b8e-11ee-9d4b-0b1f0c6e5a01": {
                    "type": "named",
                    "name": "default::User"
                }
            }
        }))
        .unwrap();

        let id = Uuid::parse_str("6f1c2a1e8b8e11ee9d4b0b1f0c6e5a01").unwrap();
        assert_eq!(schema.lookup(&id).unwrap().qualified_name(), "default::User");
    }
}
