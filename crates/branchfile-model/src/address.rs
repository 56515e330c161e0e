//! Addresses for locating values inside a document tree
//!
//! Provides [`Address`] for hierarchical addressing of values within documents,
//! and [`Address::set_in`] for writing a value at that location.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One step of an [`Address`]
///
/// Mappings are indexed by key, sequences by position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    /// Sequence position
    Index(usize),
    /// Mapping key
    Key(String),
}

impl Segment {
    /// Segment as a mapping key
    #[inline]
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            Self::Index(i) => i.to_string(),
            Self::Key(k) => k.clone(),
        }
    }

    /// Segment as a sequence position, if it is numeric
    #[inline]
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(i) => Some(*i),
            Self::Key(k) => k.parse().ok(),
        }
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => f.write_str(k),
        }
    }
}

impl From<&str> for Segment {
    fn from(s: &str) -> Self {
        Self::Key(s.to_string())
    }
}

/// Path within a document tree
///
/// # Examples
/// - `["sections", 0, "title"]` → `sections.0.title`
/// - `["config", "database", "host"]` → `config.database.host`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Vec<Segment>);

impl Address {
    /// Create new address from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// Empty address (document root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get address segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if address is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Write `value` at this address inside `doc`
    ///
    /// Descends through every segment but the last, then assigns the last
    /// segment on the parent container. Mapping entries are inserted or
    /// overwritten; sequence elements must already exist.
    ///
    /// # Errors
    /// Returns error if the address is empty, an intermediate key or index is
    /// missing, or a segment descends into a scalar.
    pub fn set_in(&self, doc: &mut Map<String, Value>, value: Value) -> Result<(), AddressError> {
        let Some((last, parents)) = self.0.split_last() else {
            return Err(AddressError::Empty);
        };

        let Some((first, rest)) = parents.split_first() else {
            doc.insert(last.as_key(), value);
            return Ok(());
        };

        let first_key = first.as_key();
        let mut node = doc.get_mut(&first_key).ok_or_else(|| AddressError::MissingKey {
            address: self.to_string(),
            key: first_key.clone(),
        })?;
        for segment in rest {
            node = self.descend(node, segment)?;
        }
        self.assign(node, last, value)
    }

    fn descend<'a>(&self, node: &'a mut Value, segment: &Segment) -> Result<&'a mut Value, AddressError> {
        match node {
            Value::Object(map) => {
                let key = segment.as_key();
                map.get_mut(&key).ok_or_else(|| AddressError::MissingKey {
                    address: self.to_string(),
                    key,
                })
            }
            Value::Array(items) => {
                let index = self.index_of(segment)?;
                let len = items.len();
                items.get_mut(index).ok_or_else(|| AddressError::IndexOutOfRange {
                    address: self.to_string(),
                    index,
                    len,
                })
            }
            _ => Err(AddressError::NotContainer {
                address: self.to_string(),
                segment: segment.to_string(),
            }),
        }
    }

    fn assign(&self, parent: &mut Value, segment: &Segment, value: Value) -> Result<(), AddressError> {
        match parent {
            Value::Object(map) => {
                map.insert(segment.as_key(), value);
                Ok(())
            }
            Value::Array(items) => {
                let index = self.index_of(segment)?;
                let len = items.len();
                let slot = items.get_mut(index).ok_or_else(|| AddressError::IndexOutOfRange {
                    address: self.to_string(),
                    index,
                    len,
                })?;
                *slot = value;
                Ok(())
            }
            _ => Err(AddressError::NotContainer {
                address: self.to_string(),
                segment: segment.to_string(),
            }),
        }
    }

    fn index_of(&self, segment: &Segment) -> Result<usize, AddressError> {
        segment.as_index().ok_or_else(|| AddressError::InvalidIndex {
            address: self.to_string(),
            segment: segment.to_string(),
        })
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let segments = s
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(AddressError::EmptySegment)
                } else if let Ok(index) = seg.parse::<usize>() {
                    Ok(Segment::Index(index))
                } else {
                    Ok(Segment::Key(seg.to_string()))
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

/// Errors related to addresses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// Address has no segments
    #[error("cannot write at an empty address")]
    Empty,

    /// Empty segment in dotted form
    #[error("address contains empty segment")]
    EmptySegment,

    /// Intermediate mapping key missing
    #[error("key '{key}' not found while resolving '{address}'")]
    MissingKey { address: String, key: String },

    /// Sequence position past the end
    #[error("index {index} out of range (len {len}) while resolving '{address}'")]
    IndexOutOfRange {
        address: String,
        index: usize,
        len: usize,
    },

    /// Non-numeric segment used on a sequence
    #[error("segment '{segment}' is not a sequence index in '{address}'")]
    InvalidIndex { address: String, segment: String },

    /// Segment applied to a scalar
    #[error("cannot descend into scalar at '{segment}' in '{address}'")]
    NotContainer { address: String, segment: String },
}
