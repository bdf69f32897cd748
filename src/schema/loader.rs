//! Schema snapshot loader
//!
//! Reads a snapshot from a JSON document of the form
//! `{"objects": {"<uuid>": {"type": "...", ...}}}` and validates every
//! object before handing it out.

use std::fs;
use std::path::Path;

use crate::observability::{log_event_with_fields, Event};

use super::errors::{LoadError, LoadResult};
use super::snapshot::InMemorySchema;

/// Loads and validates schema snapshots
pub struct SchemaLoader;

impl SchemaLoader {
    /// Loads a snapshot from a file
    pub fn load(path: &Path) -> LoadResult<InMemorySchema> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let schema = Self::from_json(&content)?;
        log_event_with_fields(
            Event::SchemaLoaded,
            &[
                ("objects", &schema.len().to_string()),
                ("path", &path.display().to_string()),
            ],
        );
        Ok(schema)
    }

    /// Parses a snapshot from a JSON string
    pub fn from_json(content: &str) -> LoadResult<InMemorySchema> {
        let schema: InMemorySchema = serde_json::from_str(content)?;
        Self::validate(&schema)?;
        Ok(schema)
    }

    /// Validates every object of an already-deserialized snapshot
    pub fn validate(schema: &InMemorySchema) -> LoadResult<()> {
        for (id, object) in schema.iter() {
            object
                .validate_structure()
                .map_err(|reason| LoadError::InvalidObject {
                    id: id.to_string(),
                    reason,
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_json_rejects_empty_names() {
        let err = SchemaLoader::from_json(
            r#"{"objects": {"00000000-0000-0000-0000-000000000001": {"type": "named", "name": ""}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidObject { .. }));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            SchemaLoader::from_json("not json").unwrap_err(),
            LoadError::Parse(_)
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"objects": {{"00000000-0000-0000-0000-000000000001": {{"type": "named", "name": "default::User"}}}}}}"#
        )
        .unwrap();

        let schema = SchemaLoader::load(file.path()).unwrap();
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SchemaLoader::load(Path::new("/nonexistent/schema.json")).unwrap_err();
        assert_eq!(err.code(), "PLANLENS_LOAD_IO");
    }
}
