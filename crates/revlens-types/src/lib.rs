//! Foundation types for revlens.
//!
//! Every other revlens crate depends on `revlens-types`. The types here carry
//! no behaviour beyond construction and lookup: parsing lives in
//! `revlens-decompose`, classification and rendering in `revlens-diff`.
//!
//! # Key Types
//!
//! - [`Path`] -- Hierarchical component key, compared segment by segment
//! - [`Component`] / [`Category`] -- One extracted, independently diff-able sub-tree
//! - [`DecompositionResult`] -- Ordered, uniquely keyed set of components for one revision
//! - [`ChangeType`] -- Four-valued change classification for leaves and groups

pub mod change;
pub mod component;
pub mod path;
pub mod result;

pub use change::ChangeType;
pub use component::{Category, Component};
pub use path::Path;
pub use result::{DecompositionBuilder, DecompositionResult};
