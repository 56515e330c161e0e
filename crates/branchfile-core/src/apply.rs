//! Application of a full spec to a root
//!
//! Works on a shallow copy of the base document; the root is never mutated.
//! Choices are applied in spec order, so later doc merges overwrite earlier
//! fields.

use crate::error::ApplyError;
use crate::index::{BranchGroup, BranchIndex, Site};
use crate::spec::{Choice, Spec};
use branchfile_model::{AddressError, BoolBranch, Branch, Document, Root};
use serde_json::Value;

/// Produce the resolved document for `spec`
///
/// # Errors
/// Returns [`ApplyError`] when a choice cannot be resolved or written.
pub fn apply(root: &Root, index: &BranchIndex, spec: &Spec) -> Result<Document, ApplyError> {
    let mut doc = root.base_document();
    for (key, choice) in spec.iter() {
        let Some(group) = index.group(key) else {
            return Err(ApplyError::UnknownTag {
                key: key.to_string(),
                tag: choice.payload(),
            });
        };
        if group.is_slotted() {
            apply_slots(root, key, group, choice, &mut doc)?;
        } else {
            apply_scalar(root, key, group, choice, &mut doc)?;
        }
    }
    Ok(doc)
}

fn apply_slots(
    root: &Root,
    key: &str,
    group: &BranchGroup,
    choice: &Choice,
    doc: &mut Document,
) -> Result<(), ApplyError> {
    let slots = group.slots().unwrap_or_default();
    let tags = choice.slot_tags();
    if tags.len() != slots.len() {
        return Err(ApplyError::SlotCountMismatch {
            key: key.to_string(),
            expected: slots.len(),
            actual: tags.len(),
        });
    }

    let mut target: Option<&str> = None;
    let mut values = Vec::with_capacity(tags.len());
    for (slot, tag) in tags.iter().enumerate() {
        let field = match group.site(tag) {
            Some(Site::ListItem { field, .. }) => *target.get_or_insert(field.as_str()),
            Some(site) => {
                return Err(ApplyError::Unsupported {
                    key: key.to_string(),
                    tag: tag.clone(),
                    site: site.to_string(),
                })
            }
            None => {
                return Err(ApplyError::UnknownTag {
                    key: key.to_string(),
                    tag: tag.clone(),
                })
            }
        };
        let item = root
            .base
            .get(field)
            .and_then(|value| value.as_list())
            .and_then(|list| list.find(slot, tag))
            .ok_or_else(|| ApplyError::UnknownSlotTag {
                key: key.to_string(),
                slot,
                tag: tag.clone(),
            })?;
        values.push(item.val.clone());
    }

    if let Some(field) = target {
        tracing::debug!(key, field, slots = values.len(), "writing list branch");
        doc.insert(field.to_string(), Value::Array(values));
    }
    Ok(())
}

fn apply_scalar(
    root: &Root,
    key: &str,
    group: &BranchGroup,
    choice: &Choice,
    doc: &mut Document,
) -> Result<(), ApplyError> {
    let Choice::Tag(tag) = choice else {
        return Err(ApplyError::UnexpectedSlots {
            key: key.to_string(),
        });
    };
    let unknown = || ApplyError::UnknownTag {
        key: key.to_string(),
        tag: tag.clone(),
    };

    let site = group.site(tag).ok_or_else(unknown)?;
    let Site::Declaration { position } = *site else {
        return Err(ApplyError::Unsupported {
            key: key.to_string(),
            tag: tag.clone(),
            site: site.to_string(),
        });
    };
    let branch = root.branches.get(position).ok_or_else(|| ApplyError::Unsupported {
        key: key.to_string(),
        tag: tag.clone(),
        site: site.to_string(),
    })?;

    tracing::debug!(key, tag = %tag, kind = branch.kind(), position, "applying branch");
    let address_error = |source: AddressError| ApplyError::Address {
        key: key.to_string(),
        tag: tag.clone(),
        position,
        source,
    };
    match branch {
        Branch::Doc(b) => {
            for (name, value) in &b.doc {
                doc.insert(name.clone(), value.to_value());
            }
        }
        Branch::Address(b) => {
            b.address
                .set_in(doc, b.value.clone())
                .map_err(address_error)?;
        }
        Branch::Bool(b) => {
            let value = BoolBranch::value_for(tag).ok_or_else(unknown)?;
            b.address
                .set_in(doc, Value::Bool(value))
                .map_err(address_error)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchfile_model::{AddressBranch, BaseDocument, ListBranch, ListItem};
    use serde_json::json;

    fn root() -> Root {
        let mut base = BaseDocument::new();
        base.insert("title".into(), "demo".into());
        base.insert(
            "sections".into(),
            ListBranch::new(
                "s",
                vec![
                    ListItem::new(0, "a", "Intro"),
                    ListItem::new(0, "b", "Overview"),
                    ListItem::new(1, "a", "Appendix"),
                ],
            )
            .into(),
        );
        let branches = vec![Branch::Address(AddressBranch {
            key: "t".into(),
            tag: "u".into(),
            address: "title".parse().unwrap(),
            value: json!("DEMO"),
            weight: None,
        })];
        Root::new(base, branches)
    }

    #[test]
    fn slot_tags_resolve_within_their_slot() {
        let root = root();
        let index = BranchIndex::build(&root).unwrap();
        let doc = apply(&root, &index, &Spec::new().with("s", vec!["b", "a"])).unwrap();
        assert_eq!(doc["sections"], json!(["Overview", "Appendix"]));
        assert_eq!(doc["title"], json!("demo"));
    }

    #[test]
    fn tag_not_in_slot_is_rejected() {
        let root = root();
        let index = BranchIndex::build(&root).unwrap();
        let result = apply(&root, &index, &Spec::new().with("s", vec!["a", "b"]));
        assert_eq!(
            result,
            Err(ApplyError::UnknownSlotTag {
                key: "s".into(),
                slot: 1,
                tag: "b".into()
            })
        );
    }

    #[test]
    fn short_slot_list_is_rejected() {
        let root = root();
        let index = BranchIndex::build(&root).unwrap();
        for spec in [Spec::new().with("s", vec!["a"]), Spec::new().with("s", Vec::<&str>::new())] {
            let result = apply(&root, &index, &spec);
            assert!(matches!(
                result,
                Err(ApplyError::SlotCountMismatch { expected: 2, .. })
            ));
        }
    }

    #[test]
    fn slots_on_scalar_key_are_rejected() {
        let root = root();
        let index = BranchIndex::build(&root).unwrap();
        let result = apply(&root, &index, &Spec::new().with("t", vec!["u"]));
        assert_eq!(result, Err(ApplyError::UnexpectedSlots { key: "t".into() }));
    }

    #[test]
    fn root_is_not_mutated() {
        let root = root();
        let before = root.clone();
        let index = BranchIndex::build(&root).unwrap();
        let doc = apply(&root, &index, &Spec::parse("sba.tu")).unwrap();
        assert_eq!(doc["title"], json!("DEMO"));
        assert_eq!(root, before);
    }

    #[test]
    fn unresolved_list_keeps_declaration_form() {
        let root = root();
        let index = BranchIndex::build(&root).unwrap();
        let doc = apply(&root, &index, &Spec::new()).unwrap();
        assert_eq!(doc["sections"]["type"], json!("list"));
    }
}
