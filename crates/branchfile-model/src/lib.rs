//! Branchfile Document Model
//!
//! Typed base documents and the branch declarations over them.
//!
//! # Core Concepts
//!
//! - [`Root`]: A base document plus ordered [`Branch`] declarations
//! - [`FieldValue`]: A base-document field; [`ListBranch`] fields hold per-slot alternatives
//! - [`Branch`]: Doc-merge, address-set or boolean alternative under a branch key
//! - [`Address`]: Path of mapping keys / sequence indices inside a document
//!
//! # Example
//!
//! ```
//! use branchfile_model::Root;
//!
//! let root = Root::from_yaml("base:\n  title: demo\nbranches: []\n").unwrap();
//! assert_eq!(root.base_document()["title"], "demo");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod address;
mod branch;
mod document;
mod root;

pub use address::{Address, AddressError, Segment};
pub use branch::{AddressBranch, BoolBranch, Branch, DocBranch, FALSE_TAG, TRUE_TAG};
pub use document::{to_document, BaseDocument, Document, FieldValue, ListBranch, ListItem, ListKind};
pub use root::{LoadError, Root};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
