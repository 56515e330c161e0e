//! Completion of partial specs by random selection
//!
//! The only source of randomness in the pipeline; the generator is injected
//! so callers can seed it.

use crate::error::ExpandError;
use crate::index::{BranchGroup, BranchIndex};
use crate::spec::{Choice, Spec};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

/// Fill every indexed key missing from `partial`
///
/// Explicit choices are copied through; a tag payload on a list key is stored
/// as one slot tag per character. List keys draw each slot independently and
/// uniformly. Scalar keys draw by normalized weight when the group is
/// weighted, uniformly otherwise. Keys unknown to the index are dropped.
///
/// # Errors
/// Returns [`ExpandError::NoCandidates`] when a draw has nothing to choose from.
pub fn expand<R: Rng + ?Sized>(
    index: &BranchIndex,
    partial: &Spec,
    rng: &mut R,
) -> Result<Spec, ExpandError> {
    for key in partial.keys().filter(|k| index.group(k).is_none()) {
        tracing::warn!(key, "dropping spec key not present in branch index");
    }

    let mut expanded = Spec::new();
    for (key, group) in index.groups() {
        let choice = match partial.get(key) {
            Some(explicit) if group.is_slotted() => Choice::Slots(explicit.slot_tags()),
            Some(explicit) => explicit.clone(),
            None => draw(key, group, rng)?,
        };
        expanded.insert(key, choice);
    }
    Ok(expanded)
}

fn draw<R: Rng + ?Sized>(key: &str, group: &BranchGroup, rng: &mut R) -> Result<Choice, ExpandError> {
    if let Some(slots) = group.slots() {
        let tags = slots
            .iter()
            .enumerate()
            .map(|(slot, options)| {
                options.choose(rng).cloned().ok_or_else(|| ExpandError::NoCandidates {
                    key: key.to_string(),
                    slot: Some(slot),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Choice::Slots(tags));
    }

    let tags: Vec<&str> = group.tags().collect();
    let no_candidates = || ExpandError::NoCandidates {
        key: key.to_string(),
        slot: None,
    };

    let tag = if group.is_weighted() {
        let weights = tags.iter().map(|t| group.weights().get(*t).copied().unwrap_or(0.0));
        let dist = WeightedIndex::new(weights).map_err(|_| no_candidates())?;
        tags[dist.sample(rng)]
    } else {
        *tags.choose(rng).ok_or_else(no_candidates)?
    };
    Ok(Choice::Tag(tag.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchfile_model::{BaseDocument, ListBranch, ListItem, Root};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gapped_root() -> Root {
        let mut base = BaseDocument::new();
        base.insert(
            "sections".into(),
            ListBranch::new("s", vec![ListItem::new(0, "a", 1), ListItem::new(2, "b", 2)]).into(),
        );
        Root::new(base, Vec::new())
    }

    #[test]
    fn empty_slot_has_no_candidates() {
        let index = BranchIndex::build(&gapped_root()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let result = expand(&index, &Spec::new(), &mut rng);
        assert_eq!(
            result,
            Err(ExpandError::NoCandidates {
                key: "s".into(),
                slot: Some(1)
            })
        );
    }

    #[test]
    fn explicit_list_payload_becomes_slots() {
        let index = BranchIndex::build(&gapped_root()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let expanded = expand(&index, &Spec::parse("sa?b"), &mut rng).unwrap();
        assert_eq!(expanded.get("s"), Some(&Choice::from(vec!["a", "?", "b"])));
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let index = BranchIndex::build(&gapped_root()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let expanded = expand(&index, &Spec::parse("sab.zq"), &mut rng).unwrap();
        assert!(!expanded.contains_key("z"));
        assert_eq!(expanded.len(), 1);
    }
}
