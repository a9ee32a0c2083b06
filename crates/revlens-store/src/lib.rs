//! Revision storage for revlens.
//!
//! The comparison engine only ever reads: it asks a store for the history of
//! an item and for the document text of two revisions. Retention, pruning and
//! revert belong to whatever system writes the history.
//!
//! # Storage Backends
//!
//! All backends implement the [`RevisionStore`] trait:
//!
//! - [`InMemoryRevisionStore`] -- `HashMap`-based store for tests and embedding
//! - [`DirRevisionStore`] -- one directory per item, one file per revision

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod revision;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::DirRevisionStore;
pub use memory::InMemoryRevisionStore;
pub use names::validate_name;
pub use revision::RevisionInfo;
pub use traits::RevisionStore;
