//! Root: one base document plus its branch declarations
//!
//! Loading goes through serde, so any field or declaration whose shape does
//! not match a known variant is rejected here as a [`LoadError`].

use crate::branch::Branch;
use crate::document::{to_document, BaseDocument, Document};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A base document and the ordered branch declarations over it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Root {
    /// Base document fields, in declaration order
    pub base: BaseDocument,
    /// Branch declarations, in declaration order
    #[serde(default)]
    pub branches: Vec<Branch>,
}

impl Root {
    /// Create root from parts
    #[inline]
    #[must_use]
    pub fn new(base: BaseDocument, branches: Vec<Branch>) -> Self {
        Self { base, branches }
    }

    /// Parse from YAML string
    ///
    /// # Errors
    /// Returns error if YAML is invalid or does not match the document shape
    pub fn from_yaml(yaml: &str) -> Result<Self, LoadError> {
        serde_yaml::from_str(yaml).map_err(LoadError::InvalidYaml)
    }

    /// Parse from JSON string
    ///
    /// # Errors
    /// Returns error if JSON is invalid or does not match the document shape
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(LoadError::InvalidJson)
    }

    /// Read and parse a file
    ///
    /// `.json` files are read as JSON, everything else as YAML.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    /// Shallow copy of the base document as plain values
    #[inline]
    #[must_use]
    pub fn base_document(&self) -> Document {
        to_document(&self.base)
    }

    /// Serialize to YAML string
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> Result<String, LoadError> {
        serde_yaml::to_string(self).map_err(LoadError::InvalidYaml)
    }
}

/// Errors while loading a root
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[source] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::document::FieldValue;
    use std::io::Write;

    const DEMO: &str = r#"
base:
  title: demo
  sections:
    type: list
    key: s
    fields:
      - {slot: 0, tag: a, val: Intro}
      - {slot: 0, tag: b, val: Overview}
      - {slot: 1, tag: x, val: Details}
  tags: [one, two]
branches:
  - type: doc
    key: m
    tag: s
    doc: {level: strict}
    weight: 0.8
  - type: address
    key: c
    tag: r
    address: [title]
    value: Red Demo
"#;

    #[test]
    fn from_yaml_parses_fields_in_order() {
        let root = Root::from_yaml(DEMO).unwrap();
        let names: Vec<&String> = root.base.keys().collect();
        assert_eq!(names, vec!["title", "sections", "tags"]);
        assert!(root.base["sections"].is_branch());
        assert!(matches!(root.base["tags"], FieldValue::Sequence(_)));
        assert_eq!(root.branches.len(), 2);
        assert_eq!(root.branches[1].key(), "c");
    }

    #[test]
    fn from_yaml_keeps_nested_mappings_and_nulls() {
        let yaml = "base:\n  title: ~\n  meta: {author: me, tags: [a]}\n";
        let root = Root::from_yaml(yaml).unwrap();
        assert_eq!(root.base["title"], FieldValue::Null);
        assert!(matches!(root.base["meta"], FieldValue::Mapping(_)));

        let mut doc = root.base_document();
        assert_eq!(doc["title"], serde_json::Value::Null);
        let address: Address = "meta.author".parse().unwrap();
        address.set_in(&mut doc, serde_json::json!("you")).unwrap();
        assert_eq!(doc["meta"], serde_json::json!({"author": "you", "tags": ["a"]}));
    }

    #[test]
    fn from_yaml_rejects_unknown_branch_type() {
        let yaml = "base: {}\nbranches:\n  - {type: merge, key: k, tag: t}\n";
        assert!(Root::from_yaml(yaml).is_err());
    }

    #[test]
    fn from_json_defaults_branches() {
        let root = Root::from_json(r#"{"base": {"title": "demo"}}"#).unwrap();
        assert!(root.branches.is_empty());
        assert_eq!(root.base_document()["title"], serde_json::json!("demo"));
    }

    #[test]
    fn from_path_selects_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml_path = dir.path().join("doc.yml");
        std::fs::File::create(&yaml_path)
            .unwrap()
            .write_all(DEMO.as_bytes())
            .unwrap();
        assert_eq!(Root::from_path(&yaml_path).unwrap().branches.len(), 2);

        let json_path = dir.path().join("doc.json");
        std::fs::write(&json_path, r#"{"base": {"n": 1}, "branches": []}"#).unwrap();
        assert!(Root::from_path(&json_path).is_ok());
    }

    #[test]
    fn from_path_missing_file() {
        let result = Root::from_path("/nonexistent/branchfile.yml");
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn yaml_roundtrip_preserves_root() {
        let root = Root::from_yaml(DEMO).unwrap();
        let again = Root::from_yaml(&root.to_yaml().unwrap()).unwrap();
        assert_eq!(root, again);
    }
}
