//! High-level API for comparing channel revisions.
//!
//! `revlens-sdk` ties the pieces together: it decomposes both revisions,
//! classifies every component, rolls changes up the group tree and renders
//! per-component side-by-side views. If either side is not well-formed the
//! comparison degrades to a whole-document view instead of failing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use revlens_sdk::{InMemoryRevisionStore, Revlens, RevlensConfig};
//!
//! let revlens = Revlens::new(InMemoryRevisionStore::new(), RevlensConfig::default());
//! let view = revlens.compare_texts("<channel>...</channel>", "<channel>...</channel>");
//! println!("{}", view.summary());
//! ```
//!
//! # Key Types
//!
//! - [`Revlens`] -- Entry point over a [`RevisionStore`]
//! - [`ComparisonView`] / [`Comparison`] -- Result of comparing two revisions
//! - [`RevlensConfig`] -- Decomposition and display settings, loadable from TOML

pub mod comparison;
pub mod config;
pub mod error;
pub mod revlens;

pub use comparison::{Comparison, ComparisonView, RawComparison};
pub use config::{DisplayConfig, RevlensConfig};
pub use error::{SdkError, SdkResult};
pub use revlens::{RevisionComparison, Revlens};

pub use revlens_decompose::{Decomposer, DecomposerConfig, Granularity};
pub use revlens_diff::{ChangeNode, HighlightPolicy, LineStyle, RenderedLine, Row, SideBySide};
pub use revlens_store::{
    DirRevisionStore, InMemoryRevisionStore, RevisionInfo, RevisionStore, StoreError,
};
pub use revlens_types::{Category, ChangeType, Component, DecompositionResult, Path};
