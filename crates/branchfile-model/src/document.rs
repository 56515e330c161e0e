//! Base document fields
//!
//! A base document is an ordered mapping from field name to [`FieldValue`].
//! Only [`ListBranch`] fields carry branch semantics; every other shape is an
//! opaque value copied through to the output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};

/// Ordered field mapping of a base document (or of a doc-merge sub-document)
pub type BaseDocument = IndexMap<String, FieldValue>;

/// Resolved output document
pub type Document = Map<String, Value>;

/// Value of one base-document field
///
/// Deserialization tries the list-branch shape first, so a mapping with
/// `type: list` always becomes [`FieldValue::List`]. Any other mapping is an
/// opaque [`FieldValue::Mapping`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Branch point with per-slot tagged alternatives
    List(ListBranch),
    /// Plain string
    Text(String),
    /// Plain number
    Number(Number),
    /// Plain boolean
    Bool(bool),
    /// Opaque collection, never branched into
    Sequence(Vec<Value>),
    /// Opaque nested mapping, never branched into
    Mapping(Map<String, Value>),
    /// Explicit null
    Null,
}

impl FieldValue {
    /// Check if this field is a list-branch
    #[inline]
    #[must_use]
    pub fn is_branch(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Get the list-branch, if this field is one
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&ListBranch> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Convert to a plain document value
    ///
    /// List-branches keep their declaration form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::List(list) => list.to_value(),
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Sequence(items) => Value::Array(items.clone()),
            Self::Mapping(map) => Value::Object(map.clone()),
            Self::Null => Value::Null,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<ListBranch> for FieldValue {
    fn from(list: ListBranch) -> Self {
        Self::List(list)
    }
}

/// Discriminant of a list-branch mapping (`type: list`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// The only list-branch kind
    #[default]
    List,
}

/// Field whose value is assembled from one chosen item per slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListBranch {
    /// Discriminant
    #[serde(rename = "type")]
    pub kind: ListKind,
    /// Branch key this field is selected by
    pub key: String,
    /// Tagged alternatives across all slots
    pub fields: Vec<ListItem>,
}

impl ListBranch {
    /// Create list-branch from items
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>, fields: Vec<ListItem>) -> Self {
        Self {
            kind: ListKind::List,
            key: key.into(),
            fields,
        }
    }

    /// Find the item offering `tag` in `slot`
    #[must_use]
    pub fn find(&self, slot: usize, tag: &str) -> Option<&ListItem> {
        self.fields.iter().find(|item| item.slot == slot && item.tag == tag)
    }

    /// Declaration form as a plain value
    #[must_use]
    pub fn to_value(&self) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .map(|item| json!({"slot": item.slot, "tag": item.tag, "val": item.val}))
            .collect();
        json!({"type": "list", "key": self.key, "fields": fields})
    }
}

/// One alternative of a list-branch slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Slot position (not necessarily contiguous)
    pub slot: usize,
    /// Tag, unique within its slot
    pub tag: String,
    /// Payload written to the output when chosen
    pub val: Value,
}

impl ListItem {
    /// Create new item
    #[inline]
    #[must_use]
    pub fn new(slot: usize, tag: impl Into<String>, val: impl Into<Value>) -> Self {
        Self {
            slot,
            tag: tag.into(),
            val: val.into(),
        }
    }
}

/// Shallow copy of a field mapping as plain values
#[must_use]
pub fn to_document(fields: &BaseDocument) -> Document {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), value.to_value()))
        .collect()
}
