//! Selection weight normalization
//!
//! Two phases: tags without an explicit weight split the shortfall below 1.0
//! evenly, then every weight is divided by the adjusted total.

use indexmap::IndexMap;

/// Normalize the explicit weights of one branch group
///
/// `tags` is the group's tag order; `explicit` holds the declared weights.
/// Returns weights in tag order summing to 1.0, or `None` when the adjusted
/// total is zero or not finite. Tags that get no share (explicit total already at or
/// above 1.0) are absent from the result.
#[must_use]
pub fn normalize<'a>(
    tags: impl IntoIterator<Item = &'a str>,
    explicit: &IndexMap<String, f64>,
) -> Option<IndexMap<String, f64>> {
    let tags: Vec<&str> = tags.into_iter().collect();
    let adjusted = distribute_remainder(&tags, explicit);

    let total: f64 = adjusted.values().sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    Some(
        tags.iter()
            .filter_map(|tag| adjusted.get(*tag).map(|w| ((*tag).to_string(), w / total)))
            .collect(),
    )
}

fn distribute_remainder(tags: &[&str], explicit: &IndexMap<String, f64>) -> IndexMap<String, f64> {
    let total: f64 = explicit.values().sum();
    let missing: Vec<&str> = tags
        .iter()
        .copied()
        .filter(|tag| !explicit.contains_key(*tag))
        .collect();

    let mut adjusted = explicit.clone();
    if !missing.is_empty() && total < 1.0 {
        #[allow(clippy::cast_precision_loss)]
        let share = (1.0 - total) / missing.len() as f64;
        for tag in missing {
            adjusted.insert(tag.to_string(), share);
        }
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(pairs: &[(&str, f64)]) -> IndexMap<String, f64> {
        pairs.iter().map(|(t, w)| ((*t).to_string(), *w)).collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn shortfall_goes_to_unweighted_tag() {
        let out = normalize(["strict", "loose"], &weights(&[("strict", 0.8)])).unwrap();
        assert!(close(out["strict"], 0.8));
        assert!(close(out["loose"], 0.2));
    }

    #[test]
    fn shortfall_split_evenly() {
        let out = normalize(["a", "b", "c"], &weights(&[("a", 0.4)])).unwrap();
        assert!(close(out["b"], 0.3));
        assert!(close(out["c"], 0.3));
    }

    #[test]
    fn over_one_scales_down_and_skips_unweighted() {
        let out = normalize(["a", "b", "c"], &weights(&[("a", 3.0), ("b", 1.0)])).unwrap();
        assert!(close(out["a"], 0.75));
        assert!(close(out["b"], 0.25));
        assert!(!out.contains_key("c"));
    }

    #[test]
    fn fully_weighted_below_one_scales_up() {
        let out = normalize(["a", "b"], &weights(&[("a", 0.1), ("b", 0.3)])).unwrap();
        assert!(close(out["a"], 0.25));
        assert!(close(out["b"], 0.75));
    }

    #[test]
    fn result_follows_tag_order() {
        let out = normalize(["x", "y", "z"], &weights(&[("z", 0.5)])).unwrap();
        let order: Vec<&String> = out.keys().collect();
        assert_eq!(order, vec!["x", "y", "z"]);
    }

    #[test]
    fn all_zero_is_none() {
        assert!(normalize(["a", "b"], &weights(&[("a", 0.0), ("b", 0.0)])).is_none());
    }

    #[test]
    fn overflowing_total_is_none() {
        let out = normalize(["a", "b"], &weights(&[("a", 1e308), ("b", 1e308)]));
        assert!(out.is_none());
    }

    #[test]
    fn zero_explicit_weight_is_kept() {
        let out = normalize(["a", "b"], &weights(&[("a", 0.0)])).unwrap();
        assert!(close(out["a"], 0.0));
        assert!(close(out["b"], 1.0));
    }
}
