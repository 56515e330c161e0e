//! Branch index
//!
//! Built once per invocation from a [`Root`]: every branch key with its tag
//! options, per-slot options for list keys, the resolution site of every
//! (key, tag), and normalized selection weights.

use crate::error::StructuralError;
use crate::weights;
use branchfile_model::{Branch, FieldValue, ListBranch, Root, FALSE_TAG, TRUE_TAG};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashSet};
use std::fmt::{self, Display, Formatter};

/// Where a (key, tag) pair is declared
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Site {
    /// Item `position` of the list-branch field `field` in the base document
    ListItem { field: String, position: usize },
    /// Branch declaration at `position`
    Declaration { position: usize },
}

impl Display for Site {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListItem { field, position } => write!(f, "base field '{field}' item {position}"),
            Self::Declaration { position } => write!(f, "declaration {position}"),
        }
    }
}

/// All alternatives registered under one branch key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchGroup {
    sites: IndexMap<String, Site>,
    slots: Option<Vec<Vec<String>>>,
    weights: IndexMap<String, f64>,
}

impl BranchGroup {
    /// Tag options, in registration order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.sites.keys().map(String::as_str)
    }

    /// Number of tag options
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Check if the group has no options
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Resolution site of `tag`
    #[inline]
    #[must_use]
    pub fn site(&self, tag: &str) -> Option<&Site> {
        self.sites.get(tag)
    }

    /// Per-slot options, for list keys
    ///
    /// Slot numbers with no items yield an empty option set at their position.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> Option<&[Vec<String>]> {
        self.slots.as_deref()
    }

    /// Check if this is a list key
    #[inline]
    #[must_use]
    pub fn is_slotted(&self) -> bool {
        self.slots.is_some()
    }

    /// Normalized weights; empty when the group is drawn uniformly
    #[inline]
    #[must_use]
    pub fn weights(&self) -> &IndexMap<String, f64> {
        &self.weights
    }

    /// Check if any tag carries a weight
    #[inline]
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        !self.weights.is_empty()
    }

    fn register(&mut self, key: &str, tag: &str, site: Site) -> Result<(), StructuralError> {
        if let Site::Declaration { position } = site {
            if self.sites.contains_key(tag) {
                return Err(StructuralError::DuplicateTag {
                    key: key.to_string(),
                    tag: tag.to_string(),
                    position,
                });
            }
        }
        // List tags may repeat across slots; the first occurrence names the field.
        self.sites.entry(tag.to_string()).or_insert(site);
        Ok(())
    }
}

/// Index of every branch choice available in a root
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchIndex {
    groups: IndexMap<String, BranchGroup>,
}

impl BranchIndex {
    /// Scan `root` and build its index
    ///
    /// Keys are ordered by first appearance: base-document fields first, then
    /// declarations.
    ///
    /// # Errors
    /// Returns [`StructuralError`] for duplicate tags, empty list fields and
    /// invalid weights.
    pub fn build(root: &Root) -> Result<Self, StructuralError> {
        let mut groups: IndexMap<String, BranchGroup> = IndexMap::new();
        let mut slot_tags: IndexMap<String, BTreeMap<usize, Vec<String>>> = IndexMap::new();
        let mut list_fields: IndexMap<&str, &str> = IndexMap::new();

        for (field, value) in &root.base {
            let FieldValue::List(list) = value else {
                continue;
            };
            // One list key names exactly one base field.
            if let Some(first) = list_fields.insert(&list.key, field) {
                return Err(StructuralError::SharedListKey {
                    key: list.key.clone(),
                    first: first.to_string(),
                    second: field.clone(),
                });
            }
            let group = groups.entry(list.key.clone()).or_default();
            let slots = slot_tags.entry(list.key.clone()).or_default();
            index_list(field, list, group, slots)?;
        }

        let mut explicit: IndexMap<String, IndexMap<String, f64>> = IndexMap::new();
        for (position, branch) in root.branches.iter().enumerate() {
            let key = branch.key();
            let group = groups.entry(key.to_string()).or_default();
            for tag in branch.tags() {
                group.register(key, tag, Site::Declaration { position })?;
            }
            if let Some(weight) = branch.weight() {
                let declared = declared_weights(branch, position, weight)?;
                explicit.entry(key.to_string()).or_default().extend(declared);
            }
        }

        for (key, by_slot) in slot_tags {
            let len = by_slot.keys().next_back().map_or(0, |max| max + 1);
            let mut dense = vec![Vec::new(); len];
            for (slot, tags) in by_slot {
                dense[slot] = tags;
            }
            if let Some(group) = groups.get_mut(&key) {
                group.slots = Some(dense);
            }
        }

        for (key, declared) in explicit {
            let Some(group) = groups.get_mut(&key) else {
                continue;
            };
            if !declared.values().sum::<f64>().is_finite() {
                return Err(StructuralError::WeightOverflow { key });
            }
            group.weights = weights::normalize(group.tags(), &declared)
                .ok_or_else(|| StructuralError::ZeroWeight { key: key.clone() })?;
        }

        tracing::debug!(
            keys = groups.len(),
            list_keys = groups.values().filter(|g| g.is_slotted()).count(),
            "built branch index"
        );
        Ok(Self { groups })
    }

    /// Group registered under `key`
    #[inline]
    #[must_use]
    pub fn group(&self, key: &str) -> Option<&BranchGroup> {
        self.groups.get(key)
    }

    /// All groups, in key order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &BranchGroup)> {
        self.groups.iter().map(|(k, g)| (k.as_str(), g))
    }

    /// All keys, in index order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Check if `key` is a list key
    #[inline]
    #[must_use]
    pub fn is_slotted(&self, key: &str) -> bool {
        self.group(key).is_some_and(BranchGroup::is_slotted)
    }

    /// Resolution site of (key, tag)
    #[inline]
    #[must_use]
    pub fn site(&self, key: &str, tag: &str) -> Option<&Site> {
        self.group(key)?.site(tag)
    }

    /// Check if (key, tag) is a known choice
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str, tag: &str) -> bool {
        self.site(key, tag).is_some()
    }

    /// Number of keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no key is indexed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn index_list(
    field: &str,
    list: &ListBranch,
    group: &mut BranchGroup,
    slots: &mut BTreeMap<usize, Vec<String>>,
) -> Result<(), StructuralError> {
    if list.fields.is_empty() {
        return Err(StructuralError::EmptyList {
            field: field.to_string(),
            key: list.key.clone(),
        });
    }

    let mut seen: HashSet<(usize, &str)> = HashSet::new();
    for (position, item) in list.fields.iter().enumerate() {
        if !seen.insert((item.slot, item.tag.as_str())) {
            return Err(StructuralError::DuplicateSlotTag {
                field: field.to_string(),
                key: list.key.clone(),
                slot: item.slot,
                tag: item.tag.clone(),
            });
        }
        group.register(
            &list.key,
            &item.tag,
            Site::ListItem {
                field: field.to_string(),
                position,
            },
        )?;
        let options = slots.entry(item.slot).or_default();
        if !options.contains(&item.tag) {
            options.push(item.tag.clone());
        }
    }
    Ok(())
}

fn declared_weights(
    branch: &Branch,
    position: usize,
    weight: f64,
) -> Result<Vec<(String, f64)>, StructuralError> {
    match branch {
        Branch::Bool(b) => {
            if !(0.0..=1.0).contains(&weight) {
                return Err(StructuralError::InvalidProbability {
                    key: b.key.clone(),
                    position,
                    weight,
                });
            }
            Ok(vec![
                (TRUE_TAG.to_string(), weight),
                (FALSE_TAG.to_string(), 1.0 - weight),
            ])
        }
        Branch::Doc(b) => scalar_weight(&b.key, &b.tag, position, weight),
        Branch::Address(b) => scalar_weight(&b.key, &b.tag, position, weight),
    }
}

fn scalar_weight(
    key: &str,
    tag: &str,
    position: usize,
    weight: f64,
) -> Result<Vec<(String, f64)>, StructuralError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(StructuralError::InvalidWeight {
            key: key.to_string(),
            tag: tag.to_string(),
            position,
            weight,
        });
    }
    Ok(vec![(tag.to_string(), weight)])
}
