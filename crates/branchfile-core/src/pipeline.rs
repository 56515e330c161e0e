//! One invocation: index → parse → check → expand → format → apply

use crate::apply::apply;
use crate::error::BranchError;
use crate::expand::expand;
use crate::index::BranchIndex;
use crate::spec::Spec;
use crate::validate::{check, InvalidTag};
use branchfile_model::{Document, Root};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Seed for the expansion draws; entropy when unset
    pub seed: Option<u64>,
    /// Abort when the spec names unknown tags
    pub strict: bool,
}

impl PipelineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With fixed seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// With strict validation
    #[inline]
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Everything one invocation produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// Unknown (key, tag) pairs in the raw spec
    pub invalid: Vec<InvalidTag>,
    /// Spec as parsed
    pub partial: Spec,
    /// Spec covering every indexed key
    pub expanded: Spec,
    /// String form of `expanded`, for reproducing the draw
    pub serial: String,
    /// Resolved document
    pub document: Document,
}

/// Resolves raw specs against one root
#[derive(Debug, Clone)]
pub struct Pipeline<'r> {
    root: &'r Root,
    index: BranchIndex,
    config: PipelineConfig,
}

impl<'r> Pipeline<'r> {
    /// Build the index for `root`
    ///
    /// # Errors
    /// Returns error if the root is structurally invalid
    pub fn new(root: &'r Root, config: PipelineConfig) -> Result<Self, BranchError> {
        let index = BranchIndex::build(root)?;
        Ok(Self {
            root,
            index,
            config,
        })
    }

    /// Branch index of the root
    #[inline]
    #[must_use]
    pub fn index(&self) -> &BranchIndex {
        &self.index
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolve `raw` drawing from `rng`
    ///
    /// # Errors
    /// Returns error on strict validation failure, empty candidate sets, or
    /// unresolvable choices.
    pub fn run<R: Rng + ?Sized>(&self, raw: &str, rng: &mut R) -> Result<Outcome, BranchError> {
        let partial = Spec::parse(raw);
        let invalid = check(&self.index, &partial);
        if !invalid.is_empty() {
            tracing::warn!(count = invalid.len(), spec = raw, "spec names unknown branch tags");
            if self.config.strict {
                return Err(BranchError::Validation(invalid));
            }
        }

        let expanded = expand(&self.index, &partial, rng)?;
        let serial = expanded.format();
        tracing::info!(serial = %serial, "expanded branch spec");

        let document = apply(self.root, &self.index, &expanded)?;
        Ok(Outcome {
            invalid,
            partial,
            expanded,
            serial,
            document,
        })
    }

    /// Resolve `raw` with a generator seeded from the configuration
    ///
    /// # Errors
    /// See [`Pipeline::run`].
    pub fn run_seeded(&self, raw: &str) -> Result<Outcome, BranchError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run(raw, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchfile_model::{BaseDocument, Branch, DocBranch};

    fn root() -> Root {
        let mut base = BaseDocument::new();
        base.insert("title".into(), "demo".into());
        let branches = ["a", "b", "c"]
            .into_iter()
            .map(|tag| {
                let mut doc = BaseDocument::new();
                doc.insert("pick".into(), tag.into());
                Branch::Doc(DocBranch {
                    key: "p".into(),
                    tag: tag.into(),
                    doc,
                    weight: None,
                })
            })
            .collect();
        Root::new(base, branches)
    }

    #[test]
    fn config_builders() {
        let config = PipelineConfig::new().with_seed(9).with_strict(true);
        assert_eq!(config.seed, Some(9));
        assert!(config.strict);
        assert_eq!(PipelineConfig::default().seed, None);
    }

    #[test]
    fn same_seed_same_outcome() {
        let root = root();
        let pipeline = Pipeline::new(&root, PipelineConfig::new().with_seed(42)).unwrap();
        let first = pipeline.run_seeded("").unwrap();
        let second = pipeline.run_seeded("").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.serial.len(), 2);
    }

    #[test]
    fn strict_mode_aborts_on_unknown_tags() {
        let root = root();
        let pipeline = Pipeline::new(&root, PipelineConfig::new().with_strict(true)).unwrap();
        let err = pipeline.run_seeded("pz").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn lenient_mode_reports_and_continues() {
        let root = root();
        let pipeline = Pipeline::new(&root, PipelineConfig::new().with_seed(1)).unwrap();
        let outcome = pipeline.run_seeded("pb.qz").unwrap();
        assert_eq!(outcome.invalid, vec![InvalidTag::new("q", "z")]);
        assert_eq!(outcome.serial, "pb");
        assert_eq!(outcome.document["pick"], serde_json::json!("b"));
    }
}
