//! Loader for segment definitions written in YAML or JSON
//!
//! ```yaml
//! name: UTILMD
//! version: "5.2e"
//! segments:
//!   - tag: UNT
//!     name: Nachrichten-Endesegment
//!     elements:
//!       - id: DE0074
//!       - id: DE0062
//!   - tag: UNH
//!     elements:
//!       - id: DE0062
//!       - id: S009
//!         components:
//!           - id: DE0065
//!           - id: DE0052
//! ```

use crate::model::{ElementDefinition, Schema, SegmentDefinition};
use crate::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, trace};

/// Serializable schema format for loading from files
#[derive(Debug, Deserialize)]
struct SchemaFile {
    name: String,
    version: String,
    #[serde(default)]
    segments: Vec<SegmentFile>,
}

#[derive(Debug, Deserialize)]
struct SegmentFile {
    tag: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    elements: Vec<ElementFile>,
}

#[derive(Debug, Deserialize)]
struct ElementFile {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    components: Option<Vec<ElementFile>>,
}

/// Pattern segment tags must match unless the loader is configured otherwise
pub const DEFAULT_TAG_PATTERN: &str = r"^[A-Z0-9]{3}$";

/// Loads and checks segment definitions
pub struct SchemaLoader {
    tag_pattern: String,
}

impl SchemaLoader {
    /// Create a loader accepting three-character alphanumeric tags
    #[must_use]
    pub fn new() -> Self {
        Self::with_tag_pattern(DEFAULT_TAG_PATTERN)
    }

    /// Create a loader with a custom segment tag pattern
    #[must_use]
    pub fn with_tag_pattern(pattern: impl Into<String>) -> Self {
        Self {
            tag_pattern: pattern.into(),
        }
    }

    /// Load definitions from a file, choosing the format by extension
    pub fn load_from_file(&self, path: &Path) -> Result<Schema> {
        trace!("Loading segment definitions from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;

        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            self.load_from_yaml(&content)
        } else {
            self.load_from_json(&content)
        }
    }

    /// Load definitions from a JSON string
    pub fn load_from_json(&self, json: &str) -> Result<Schema> {
        let schema_file: SchemaFile = serde_json::from_str(json)
            .map_err(|e| Error::InvalidFormat(format!("JSON parse error: {e}")))?;

        self.convert_schema_file(schema_file)
    }

    /// Load definitions from a YAML string
    pub fn load_from_yaml(&self, yaml: &str) -> Result<Schema> {
        let schema_file: SchemaFile = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidFormat(format!("YAML parse error: {e}")))?;

        self.convert_schema_file(schema_file)
    }

    fn convert_schema_file(&self, schema_file: SchemaFile) -> Result<Schema> {
        let tag_pattern = Regex::new(&self.tag_pattern)
            .map_err(|e| Error::InvalidFormat(format!("Invalid tag pattern: {e}")))?;
        let mut seen = HashSet::new();
        let mut segments = Vec::with_capacity(schema_file.segments.len());

        for segment in schema_file.segments {
            if !tag_pattern.is_match(&segment.tag) {
                return Err(Error::InvalidFormat(format!(
                    "Invalid segment tag '{}'",
                    segment.tag
                )));
            }
            if !seen.insert(segment.tag.clone()) {
                return Err(Error::InvalidFormat(format!(
                    "Duplicate segment tag '{}'",
                    segment.tag
                )));
            }

            let elements = segment
                .elements
                .into_iter()
                .map(|e| convert_element(&segment.tag, e))
                .collect::<Result<Vec<_>>>()?;

            segments.push(SegmentDefinition {
                tag: segment.tag,
                name: segment.name,
                elements,
            });
        }

        debug!(
            "Loaded {} segment definitions for {} {}",
            segments.len(),
            schema_file.name,
            schema_file.version
        );

        Ok(Schema::new(schema_file.name, schema_file.version).with_segments(segments))
    }
}

fn convert_element(tag: &str, element: ElementFile) -> Result<ElementDefinition> {
    if element.id.trim().is_empty() {
        return Err(Error::InvalidFormat(format!(
            "Element without id in segment '{tag}'"
        )));
    }

    match element.components {
        None => Ok(ElementDefinition::Simple {
            id: element.id,
            name: element.name,
        }),
        Some(components) if components.is_empty() => Err(Error::InvalidFormat(format!(
            "Composite '{}' in segment '{tag}' has no components",
            element.id
        ))),
        Some(components) => Ok(ElementDefinition::Composite {
            id: element.id,
            name: element.name,
            components: components
                .into_iter()
                .map(|c| convert_element(tag, c))
                .collect::<Result<Vec<_>>>()?,
        }),
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const UTILMD_YAML: &str = r#"
name: UTILMD
version: "5.2e"
segments:
  - tag: UNT
    name: Nachrichten-Endesegment
    elements:
      - id: DE0074
        name: Anzahl der Segmente in einer Nachricht
      - id: DE0062
  - tag: UNH
    elements:
      - id: DE0062
      - id: S009
        components:
          - id: DE0065
          - id: DE0052
"#;

    #[test]
    fn test_load_from_yaml() {
        let loader = SchemaLoader::default();
        let schema = loader.load_from_yaml(UTILMD_YAML).unwrap();

        assert_eq!(schema.name, "UTILMD");
        assert_eq!(schema.version, "5.2e");
        assert_eq!(schema.segments.len(), 2);

        let unh = schema.segment("UNH").unwrap();
        assert_eq!(unh.arity(), 2);
        assert!(matches!(
            &unh.elements[1],
            ElementDefinition::Composite { components, .. } if components.len() == 2
        ));
    }

    #[test]
    fn test_load_from_json() {
        let loader = SchemaLoader::default();
        let json = r#"{"name": "TEST", "version": "1.0", "segments": [
            {"tag": "UNZ", "elements": [{"id": "DE0036"}, {"id": "DE0020"}]}
        ]}"#;

        let schema = loader.load_from_json(json).unwrap();
        assert_eq!(schema.segments[0].tag, "UNZ");
        assert_eq!(schema.segments[0].elements[0].id(), "DE0036");
        assert_eq!(schema.segments[0].elements[0].name(), None);
    }

    #[test]
    fn test_load_from_json_invalid() {
        let loader = SchemaLoader::default();
        let result = loader.load_from_json("{ not json");
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_rejects_bad_tag() {
        let loader = SchemaLoader::default();
        let json = r#"{"name": "TEST", "version": "1.0", "segments": [{"tag": "un"}]}"#;

        assert!(matches!(
            loader.load_from_json(json),
            Err(Error::InvalidFormat(msg)) if msg.contains("Invalid segment tag")
        ));
    }

    #[test]
    fn test_rejects_duplicate_tag() {
        let loader = SchemaLoader::default();
        let json = r#"{"name": "TEST", "version": "1.0",
            "segments": [{"tag": "UNT"}, {"tag": "UNT"}]}"#;

        assert!(matches!(
            loader.load_from_json(json),
            Err(Error::InvalidFormat(msg)) if msg.contains("Duplicate")
        ));
    }

    #[test]
    fn test_rejects_empty_composite() {
        let loader = SchemaLoader::default();
        let json = r#"{"name": "TEST", "version": "1.0",
            "segments": [{"tag": "UNH", "elements": [{"id": "S009", "components": []}]}]}"#;

        assert!(matches!(
            loader.load_from_json(json),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_custom_tag_pattern() {
        let loader = SchemaLoader::with_tag_pattern(r"^[A-Z]{2,3}$");
        let json = r#"{"name": "TEST", "version": "1.0", "segments": [{"tag": "RF"}]}"#;

        assert!(loader.load_from_json(json).is_ok());
        assert!(SchemaLoader::default().load_from_json(json).is_err());
    }

    #[test]
    fn test_load_from_file_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("utilmd.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(UTILMD_YAML.as_bytes()).unwrap();

        let loader = SchemaLoader::default();
        let schema = loader.load_from_file(&path).unwrap();
        assert_eq!(schema.segments.len(), 2);
    }

    #[test]
    fn test_load_from_missing_file() {
        let loader = SchemaLoader::default();
        let result = loader.load_from_file(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
