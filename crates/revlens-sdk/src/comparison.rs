//! The result of comparing two document revisions.
//!
//! # Key Types
//!
//! - [`ComparisonView`] -- Decomposed comparison, or raw fallback when a side does not parse
//! - [`Comparison`] -- Component classification, group rollup and per-component detail
//! - [`RawComparison`] -- Whole-document side-by-side view with the parse failure

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use revlens_decompose::Decomposer;
use revlens_diff::{
    diff_components, render_side_by_side, rollup, ChangeNode, ComponentDiff, GroupTree,
    HighlightPolicy, SideBySide,
};
use revlens_types::{ChangeType, DecompositionResult, Path};

/// Either a component-level comparison or, if a side failed to parse, a
/// whole-document one.
///
/// A comparison is never built from a partial decomposition.
#[derive(Clone, Debug)]
pub enum ComparisonView {
    Decomposed(Comparison),
    Raw(RawComparison),
}

impl ComparisonView {
    /// Decompose both texts and compare them.
    pub fn build(decomposer: &Decomposer, policy: HighlightPolicy, old: &str, new: &str) -> Self {
        let parsed = decomposer
            .decompose(old)
            .map_err(|e| format!("old revision: {e}"))
            .and_then(|o| {
                decomposer
                    .decompose(new)
                    .map(|n| (o, n))
                    .map_err(|e| format!("new revision: {e}"))
            });

        match parsed {
            Ok((old_result, new_result)) => Self::Decomposed(Comparison::new(
                old_result,
                new_result,
                old.to_string(),
                new.to_string(),
                policy,
            )),
            Err(reason) => {
                warn!(%reason, "falling back to raw comparison");
                Self::Raw(RawComparison {
                    reason,
                    view: render_side_by_side(old, new, policy),
                })
            }
        }
    }

    /// The decomposed comparison, if both sides parsed.
    pub fn as_decomposed(&self) -> Option<&Comparison> {
        match self {
            Self::Decomposed(c) => Some(c),
            Self::Raw(_) => None,
        }
    }

    /// Returns `true` for the raw fallback.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// One-line status for the view.
    pub fn summary(&self) -> String {
        match self {
            Self::Decomposed(c) => c.summary(),
            Self::Raw(r) => format!("{} lines changed (raw view)", r.view.changed_rows()),
        }
    }
}

/// Whole-document comparison used when a side is not well-formed.
#[derive(Clone, Debug, Serialize)]
pub struct RawComparison {
    /// Why decomposition was not possible.
    pub reason: String,
    pub view: SideBySide,
}

/// Component-level comparison of two revisions.
#[derive(Clone, Debug)]
pub struct Comparison {
    old: DecompositionResult,
    new: DecompositionResult,
    old_text: String,
    new_text: String,
    diff: ComponentDiff,
    statuses: BTreeMap<Path, ChangeType>,
    tree: ChangeNode,
    policy: HighlightPolicy,
}

impl Comparison {
    /// Classify and roll up two decompositions.
    pub fn new(
        old: DecompositionResult,
        new: DecompositionResult,
        old_text: String,
        new_text: String,
        policy: HighlightPolicy,
    ) -> Self {
        let diff = diff_components(&old, &new);
        let leaves = diff.to_map();
        let groups = GroupTree::from_keys(diff.iter().map(|c| &c.key));
        let statuses = rollup(&groups, &leaves);
        let tree = ChangeNode::annotate(&groups, &leaves, &statuses);
        debug!(summary = %diff.summary(), "built comparison");

        Self {
            old,
            new,
            old_text,
            new_text,
            diff,
            statuses,
            tree,
            policy,
        }
    }

    pub fn diff(&self) -> &ComponentDiff {
        &self.diff
    }

    /// Rolled-up status of every node, root included.
    pub fn statuses(&self) -> &BTreeMap<Path, ChangeType> {
        &self.statuses
    }

    /// Status of a leaf or group; unknown paths are unchanged.
    pub fn status(&self, path: &Path) -> ChangeType {
        self.statuses.get(path).copied().unwrap_or_default()
    }

    /// The annotated tree, optionally without unchanged sub-trees.
    pub fn display_tree(&self, changed_only: bool) -> ChangeNode {
        if changed_only {
            self.tree.changed_only()
        } else {
            self.tree.clone()
        }
    }

    /// Human-readable name of a node.
    ///
    /// Groups use their recorded display name, newer revision first.
    /// Components use their display name, older revision first. Anything
    /// else falls back to the final key segment.
    pub fn label(&self, path: &Path) -> String {
        if let Some(name) = self
            .new
            .group_display_name(path)
            .or_else(|| self.old.group_display_name(path))
        {
            return name.to_string();
        }
        if let Some(component) = self.old.get(path).or_else(|| self.new.get(path)) {
            return component.display_name.clone();
        }
        path.last().unwrap_or_default().to_string()
    }

    /// [`label`](Self::label) with the change suffix appended.
    pub fn label_with_change(&self, path: &Path) -> String {
        format!("{}{}", self.label(path), self.status(path).label())
    }

    /// Side-by-side diff of one component; a missing side is empty.
    ///
    /// Returns `None` if neither revision has the key.
    pub fn detail(&self, key: &Path) -> Option<SideBySide> {
        let old = self.old.content(key);
        let new = self.new.content(key);
        if old.is_none() && new.is_none() {
            return None;
        }
        Some(render_side_by_side(
            old.unwrap_or_default(),
            new.unwrap_or_default(),
            self.policy,
        ))
    }

    /// Side-by-side diff of the complete documents.
    pub fn raw(&self) -> SideBySide {
        render_side_by_side(&self.old_text, &self.new_text, self.policy)
    }

    /// The component to show first: the first changed leaf, if any.
    pub fn initial_selection(&self) -> Option<&Path> {
        self.tree.first_changed_leaf()
    }

    /// `"<changed> of <total> components changed"`.
    pub fn summary(&self) -> String {
        self.diff.summary()
    }
}
