//! Testing utilities for Branchfile workspace
//!
//! Shared fixtures and builders.

#![allow(missing_docs)]

use branchfile_model::{
    AddressBranch, BaseDocument, BoolBranch, Branch, DocBranch, FieldValue, ListBranch, ListItem,
    Root,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

/// YAML form of [`demo_root`]
pub const DEMO_YAML: &str = r#"
base:
  title: demo
  sections:
    type: list
    key: s
    fields:
      - {slot: 0, tag: a, val: Intro}
      - {slot: 0, tag: b, val: Overview}
      - {slot: 1, tag: x, val: Details}
branches: []
"#;

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn list_field(key: &str, items: &[(usize, &str, Value)]) -> FieldValue {
    let items = items
        .iter()
        .map(|(slot, tag, val)| ListItem::new(*slot, *tag, val.clone()))
        .collect();
    FieldValue::List(ListBranch::new(key, items))
}

pub fn doc_branch(key: &str, tag: &str, fields: &[(&str, FieldValue)], weight: Option<f64>) -> Branch {
    let doc: BaseDocument = fields
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect();
    Branch::Doc(DocBranch {
        key: key.into(),
        tag: tag.into(),
        doc,
        weight,
    })
}

pub fn address_branch(key: &str, tag: &str, address: &str, value: Value) -> Branch {
    Branch::Address(AddressBranch {
        key: key.into(),
        tag: tag.into(),
        address: address.parse().unwrap(),
        value,
        weight: None,
    })
}

pub fn bool_branch(key: &str, address: &str, weight: Option<f64>) -> Branch {
    Branch::Bool(BoolBranch {
        key: key.into(),
        address: address.parse().unwrap(),
        weight,
    })
}

/// `title: demo` plus list key `s` with slots `[[a, b], [x]]`
pub fn demo_root() -> Root {
    let mut base = BaseDocument::new();
    base.insert("title".into(), "demo".into());
    base.insert(
        "sections".into(),
        list_field(
            "s",
            &[
                (0, "a", json!("Intro")),
                (0, "b", json!("Overview")),
                (1, "x", json!("Details")),
            ],
        ),
    );
    Root::new(base, Vec::new())
}

/// Doc-merge group `mode`: `strict` (0.8) and `loose` (unweighted)
pub fn weighted_root() -> Root {
    let mut base = BaseDocument::new();
    base.insert("title".into(), "demo".into());
    let branches = vec![
        doc_branch("mode", "strict", &[("level", "high".into())], Some(0.8)),
        doc_branch("mode", "loose", &[("level", "low".into())], None),
    ];
    Root::new(base, branches)
}

/// Every branch variant over one base document
pub fn mixed_root() -> Root {
    let mut base = BaseDocument::new();
    base.insert("title".into(), "demo".into());
    base.insert(
        "sections".into(),
        list_field(
            "s",
            &[
                (0, "a", json!("Intro")),
                (0, "b", json!("Overview")),
                (1, "x", json!({"heading": "Details", "body": ["one", "two"]})),
                (1, "y", json!("Summary")),
            ],
        ),
    );
    base.insert(
        "theme".into(),
        FieldValue::Sequence(vec![json!({"color": "black"}), json!({"color": "white"})]),
    );
    let branches = vec![
        doc_branch("m", "S", &[("level", "high".into()), ("title", "Strict".into())], Some(0.8)),
        doc_branch("m", "L", &[("level", "low".into())], None),
        address_branch("c", "r", "theme.0.color", json!("red")),
        address_branch("c", "g", "theme.0.color", json!("green")),
        bool_branch("d", "draft", Some(0.25)),
    ];
    Root::new(base, branches)
}
