//! Component-level diff: classify every key of two decompositions.
//!
//! Only component content takes part in classification. A changed display
//! name or category on an otherwise identical component is not a change.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use revlens_types::{ChangeType, DecompositionResult, Path};

/// Classification of one component key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComponentChange {
    pub key: Path,
    pub change: ChangeType,
}

/// The classification of the union of keys of two decompositions.
///
/// Keys appear in the old revision's order, followed by keys only present
/// in the new revision in the new revision's order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ComponentDiff {
    pub changes: Vec<ComponentChange>,
}

impl ComponentDiff {
    /// Classification of `key`, or `None` if neither side has it.
    pub fn get(&self, key: &Path) -> Option<ChangeType> {
        self.changes.iter().find(|c| &c.key == key).map(|c| c.change)
    }

    /// Every classified key in order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentChange> {
        self.changes.iter()
    }

    /// Leaf map for the group rollup.
    pub fn to_map(&self) -> BTreeMap<Path, ChangeType> {
        self.changes
            .iter()
            .map(|c| (c.key.clone(), c.change))
            .collect()
    }

    /// Number of keys across both revisions.
    pub fn total(&self) -> usize {
        self.changes.len()
    }

    /// Number of keys that are not unchanged.
    pub fn changed_count(&self) -> usize {
        self.changes.iter().filter(|c| c.change.is_changed()).count()
    }

    /// Returns `true` if nothing changed.
    pub fn is_identical(&self) -> bool {
        self.changed_count() == 0
    }

    /// Number of keys only present in the new revision.
    pub fn additions(&self) -> usize {
        self.count(ChangeType::RightOnly)
    }

    /// Number of keys only present in the old revision.
    pub fn removals(&self) -> usize {
        self.count(ChangeType::LeftOnly)
    }

    /// Number of keys whose content differs.
    pub fn modifications(&self) -> usize {
        self.count(ChangeType::Modified)
    }

    /// One-line status, e.g. `"3 of 12 components changed"`.
    pub fn summary(&self) -> String {
        format!("{} of {} components changed", self.changed_count(), self.total())
    }

    fn count(&self, change: ChangeType) -> usize {
        self.changes.iter().filter(|c| c.change == change).count()
    }
}

/// Classify every key present in `old`, `new`, or both.
pub fn diff_components(old: &DecompositionResult, new: &DecompositionResult) -> ComponentDiff {
    let mut changes = Vec::with_capacity(old.len().max(new.len()));

    for component in old {
        changes.push(ComponentChange {
            key: component.key.clone(),
            change: ChangeType::classify(Some(component.content.as_str()), new.content(&component.key)),
        });
    }
    for component in new {
        if !old.contains_key(&component.key) {
            changes.push(ComponentChange {
                key: component.key.clone(),
                change: ChangeType::RightOnly,
            });
        }
    }

    let diff = ComponentDiff { changes };
    debug!(
        total = diff.total(),
        added = diff.additions(),
        removed = diff.removals(),
        modified = diff.modifications(),
        "classified components"
    );
    diff
}
