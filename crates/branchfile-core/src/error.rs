//! Error types for branch resolution
//!
//! Provides error handling for:
//! - Index construction (structural problems in the root)
//! - Spec expansion (empty candidate sets)
//! - Document application (unresolvable or unsupported choices)

use crate::validate::InvalidTag;
use branchfile_model::{AddressError, LoadError};

/// Root shape the index builder cannot accept
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructuralError {
    /// Same (slot, tag) twice in one list field
    #[error("duplicate tag '{tag}' in slot {slot} of list field '{field}' (key '{key}')")]
    DuplicateSlotTag {
        field: String,
        key: String,
        slot: usize,
        tag: String,
    },

    /// List field with no items
    #[error("list field '{field}' (key '{key}') declares no items")]
    EmptyList { field: String, key: String },

    /// Same (key, tag) declared twice
    #[error("duplicate tag '{tag}' for key '{key}' at declaration {position}")]
    DuplicateTag {
        key: String,
        tag: String,
        position: usize,
    },

    /// Negative or non-finite weight
    #[error("invalid weight {weight} for key '{key}' tag '{tag}' at declaration {position}")]
    InvalidWeight {
        key: String,
        tag: String,
        position: usize,
        weight: f64,
    },

    /// Boolean weight outside [0, 1]
    #[error("boolean weight {weight} for key '{key}' at declaration {position} is not a probability")]
    InvalidProbability {
        key: String,
        position: usize,
        weight: f64,
    },

    /// Weighted group with nothing to draw
    #[error("weights for key '{key}' sum to zero")]
    ZeroWeight { key: String },

    /// Declared weights whose sum is not finite
    #[error("weights for key '{key}' overflow when summed")]
    WeightOverflow { key: String },

    /// One list key used by two base fields
    #[error("list key '{key}' is used by both base field '{first}' and '{second}'")]
    SharedListKey {
        key: String,
        first: String,
        second: String,
    },
}

/// Errors while completing a partial spec
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpandError {
    /// Selection attempted against an empty option set
    #[error("no candidates for key '{key}'{}", .slot.map(|s| format!(" slot {s}")).unwrap_or_default())]
    NoCandidates { key: String, slot: Option<usize> },
}

/// Errors while applying a full spec to a root
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    /// (key, tag) absent from the index
    #[error("unknown tag '{tag}' for key '{key}'")]
    UnknownTag { key: String, tag: String },

    /// Tag not offered by the slot it was chosen for
    #[error("tag '{tag}' is not an option of slot {slot} for key '{key}'")]
    UnknownSlotTag {
        key: String,
        slot: usize,
        tag: String,
    },

    /// Wrong number of slot tags for a list key
    #[error("key '{key}' expects {expected} slot tag(s), got {actual}")]
    SlotCountMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    /// Per-slot tags supplied for a scalar key
    #[error("key '{key}' is not a list branch but was given per-slot tags")]
    UnexpectedSlots { key: String },

    /// Resolution site kind not handled for this key
    #[error("unsupported source {site} for key '{key}' tag '{tag}'")]
    Unsupported {
        key: String,
        tag: String,
        site: String,
    },

    /// Address write failed
    #[error("cannot apply key '{key}' tag '{tag}' (declaration {position}): {source}")]
    Address {
        key: String,
        tag: String,
        position: usize,
        #[source]
        source: AddressError,
    },
}

/// Any failure of one invocation
#[derive(Debug, thiserror::Error)]
pub enum BranchError {
    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("unknown branch tags: {}", format_invalid(.0))]
    Validation(Vec<InvalidTag>),

    #[error("expansion failed: {0}")]
    Expand(#[from] ExpandError),

    #[error("apply failed: {0}")]
    Apply(#[from] ApplyError),
}

impl BranchError {
    /// Check if error is a recoverable validation report
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

fn format_invalid(invalid: &[InvalidTag]) -> String {
    invalid
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
