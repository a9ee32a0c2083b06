//! Diff engines for revlens.
//!
//! Classifies the components of two decompositions, rolls the classification
//! up the group hierarchy, and computes line and character deltas for the
//! side-by-side view of a single component.
//!
//! # Key Types
//!
//! - [`ComponentDiff`] / [`ComponentChange`] -- Per-key classification of two revisions
//! - [`GroupTree`] / [`ChangeNode`] -- Group hierarchy and its rolled-up statuses
//! - [`LineDiff`] / [`Delta`] -- Line-level edit script
//! - [`InlineHighlights`] -- Character-level highlights of one changed line pair
//! - [`SideBySide`] / [`Row`] / [`RenderedLine`] -- Aligned two-column render model

pub mod char_diff;
pub mod component_diff;
pub mod line_diff;
pub mod render;
pub mod rollup;

pub use char_diff::{diff_chars, InlineHighlights};
pub use component_diff::{diff_components, ComponentChange, ComponentDiff};
pub use line_diff::{diff_lines, split_lines, Delta, DeltaKind, LineDiff};
pub use render::{render_side_by_side, HighlightPolicy, LineStyle, RenderedLine, Row, SideBySide};
pub use rollup::{combine, rollup, rollup_leaves, ChangeNode, GroupTree, TreeNode};
