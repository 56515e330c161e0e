//! Branchfile Core
//!
//! Expands compact branch specs into fully resolved documents:
//! - [`BranchIndex`]: every branch choice a [`Root`](branchfile_model::Root) offers
//! - [`Spec`]: chosen tags per key, with a compact `.`-separated string form
//! - [`check`]: unknown (key, tag) pairs in a spec
//! - [`expand`]: fill missing keys by (weighted) random draws
//! - [`apply`]: resolve a full spec into a new document
//!
//! # Example
//!
//! ```rust,ignore
//! use branchfile_core::{Pipeline, PipelineConfig};
//! use branchfile_model::Root;
//!
//! let root = Root::from_path("doc.yml")?;
//! let pipeline = Pipeline::new(&root, PipelineConfig::new().with_seed(7))?;
//! let outcome = pipeline.run_seeded("sab.m")?;
//!
//! println!("{}", outcome.serial);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod apply;
mod error;
mod expand;
mod index;
mod pipeline;
mod spec;
mod validate;

pub mod weights;

pub use apply::apply;
pub use error::{ApplyError, BranchError, ExpandError, StructuralError};
pub use expand::expand;
pub use index::{BranchGroup, BranchIndex, Site};
pub use pipeline::{Outcome, Pipeline, PipelineConfig};
pub use spec::{Choice, Spec, SEPARATOR};
pub use validate::{check, InvalidTag};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for resolving branch specs
    pub use crate::{
        apply, check, expand, BranchError, BranchIndex, Choice, Outcome, Pipeline,
        PipelineConfig, Spec,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
