//! Branch declarations
//!
//! Declarations sharing a key form a branch group of mutually exclusive
//! alternatives. The variant is chosen by an explicit `type` discriminant.

use crate::address::Address;
use crate::document::BaseDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Implicit tag of a [`BoolBranch`] that writes `true`
pub const TRUE_TAG: &str = "y";

/// Implicit tag of a [`BoolBranch`] that writes `false`
pub const FALSE_TAG: &str = "n";

/// One declared alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Branch {
    /// Shallow-merges a sub-document when selected
    Doc(DocBranch),
    /// Writes a fixed value at an address when selected
    Address(AddressBranch),
    /// Yes/no branch point with implicit tags
    Bool(BoolBranch),
}

impl Branch {
    /// Branch key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Doc(b) => &b.key,
            Self::Address(b) => &b.key,
            Self::Bool(b) => &b.key,
        }
    }

    /// Tags this declaration contributes to its group
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        match self {
            Self::Doc(b) => vec![b.tag.as_str()],
            Self::Address(b) => vec![b.tag.as_str()],
            Self::Bool(_) => vec![TRUE_TAG, FALSE_TAG],
        }
    }

    /// Declared selection weight
    #[inline]
    #[must_use]
    pub fn weight(&self) -> Option<f64> {
        match self {
            Self::Doc(b) => b.weight,
            Self::Address(b) => b.weight,
            Self::Bool(b) => b.weight,
        }
    }

    /// Variant name, for diagnostics
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Doc(_) => "doc",
            Self::Address(_) => "address",
            Self::Bool(_) => "bool",
        }
    }
}

/// Alternative that merges a sub-document into the base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocBranch {
    pub key: String,
    pub tag: String,
    pub doc: BaseDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Alternative that sets a value at an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressBranch {
    pub key: String,
    pub tag: String,
    pub address: Address,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Binary branch point
///
/// `weight` is the probability of [`TRUE_TAG`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolBranch {
    pub key: String,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl BoolBranch {
    /// Value written for an implicit tag
    #[inline]
    #[must_use]
    pub fn value_for(tag: &str) -> Option<bool> {
        match tag {
            TRUE_TAG => Some(true),
            FALSE_TAG => Some(false),
            _ => None,
        }
    }
}
