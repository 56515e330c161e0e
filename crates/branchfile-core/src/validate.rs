//! Membership check of a spec against a branch index

use crate::index::BranchIndex;
use crate::spec::{Choice, Spec};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// A (key, tag) pair the index does not know
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InvalidTag {
    pub key: String,
    pub tag: String,
}

impl InvalidTag {
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            tag: tag.into(),
        }
    }
}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.key, self.tag)
    }
}

/// Every (key, tag) in `spec` that `index` does not contain, in spec order
///
/// A tag payload on a known scalar key is checked whole; on a list key or an
/// unknown key it is checked one character at a time.
#[must_use]
pub fn check(index: &BranchIndex, spec: &Spec) -> Vec<InvalidTag> {
    let mut invalid = Vec::new();
    for (key, choice) in spec.iter() {
        for tag in requested_tags(index, key, choice) {
            if !index.contains(key, &tag) {
                invalid.push(InvalidTag::new(key, tag));
            }
        }
    }
    invalid
}

fn requested_tags(index: &BranchIndex, key: &str, choice: &Choice) -> Vec<String> {
    match (choice, index.group(key)) {
        (Choice::Tag(tag), Some(group)) if !group.is_slotted() => vec![tag.clone()],
        _ => choice.slot_tags(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchfile_model::{BaseDocument, Branch, DocBranch, ListBranch, ListItem, Root};

    fn index() -> BranchIndex {
        let mut base = BaseDocument::new();
        base.insert(
            "sections".into(),
            ListBranch::new("s", vec![ListItem::new(0, "a", 1), ListItem::new(1, "x", 2)]).into(),
        );
        let branches = ["strict", "loose"]
            .into_iter()
            .map(|tag| {
                Branch::Doc(DocBranch {
                    key: "mode".into(),
                    tag: tag.into(),
                    doc: BaseDocument::new(),
                    weight: None,
                })
            })
            .collect();
        BranchIndex::build(&Root::new(base, branches)).unwrap()
    }

    #[test]
    fn unknown_key_reported_per_character() {
        let invalid = check(&index(), &Spec::parse("tA"));
        assert_eq!(invalid, vec![InvalidTag::new("t", "A")]);
    }

    #[test]
    fn list_payload_checked_per_slot() {
        let index = index();
        assert!(check(&index, &Spec::parse("sax")).is_empty());
        assert_eq!(check(&index, &Spec::parse("saq")), vec![InvalidTag::new("s", "q")]);
    }

    #[test]
    fn scalar_tag_checked_whole() {
        let index = index();
        assert!(check(&index, &Spec::new().with("mode", "strict")).is_empty());
        assert_eq!(
            check(&index, &Spec::new().with("mode", "tight")),
            vec![InvalidTag::new("mode", "tight")]
        );
    }

    #[test]
    fn empty_spec_is_valid() {
        assert!(check(&index(), &Spec::new()).is_empty());
    }
}
