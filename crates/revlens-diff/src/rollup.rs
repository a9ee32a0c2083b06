//! Group rollup: derive a status for every group from its leaves.
//!
//! Groups are implied by key prefixes. A group's status is the
//! [`combine`] of its children's statuses, computed bottom-up, so a
//! collapsed group still tells the reader whether anything inside changed.
//!
//! # Key Types
//!
//! - [`GroupTree`] / [`TreeNode`] -- Group hierarchy derived from component keys
//! - [`ChangeNode`] -- The hierarchy annotated with rolled-up statuses

use std::collections::BTreeMap;

use serde::Serialize;

use revlens_types::{ChangeType, Path};

/// Combine the statuses of a group's children.
///
/// | children                   | result      |
/// |----------------------------|-------------|
/// | none                       | `Unchanged` |
/// | all `LeftOnly`             | `LeftOnly`  |
/// | all `RightOnly`            | `RightOnly` |
/// | all `Unchanged`            | `Unchanged` |
/// | anything else              | `Modified`  |
pub fn combine<I>(children: I) -> ChangeType
where
    I: IntoIterator<Item = ChangeType>,
{
    let mut iter = children.into_iter();
    let Some(first) = iter.next() else {
        return ChangeType::Unchanged;
    };
    if first == ChangeType::Modified {
        return ChangeType::Modified;
    }
    for next in iter {
        if next != first {
            return ChangeType::Modified;
        }
    }
    first
}

/// A node of the group hierarchy.
///
/// A node is a leaf when a component has exactly its key. It may also have
/// children if other keys extend it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub path: Path,
    pub is_leaf: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn insert(&mut self, key: &Path) {
        let depth = self.path.len();
        if depth == key.len() {
            self.is_leaf = true;
            return;
        }
        let child_path = Path::new(key.segments()[..=depth].iter().cloned());
        let index = match self.children.iter().position(|c| c.path == child_path) {
            Some(index) => index,
            None => {
                self.children.push(TreeNode {
                    path: child_path,
                    ..Default::default()
                });
                self.children.len() - 1
            }
        };
        self.children[index].insert(key);
    }

    /// Returns `true` if this node groups other nodes.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    fn leaf_keys<'a>(&'a self, out: &mut Vec<&'a Path>) {
        if self.is_leaf {
            out.push(&self.path);
        }
        for child in &self.children {
            child.leaf_keys(out);
        }
    }
}

/// The group hierarchy implied by a set of component keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupTree {
    root: TreeNode,
}

impl GroupTree {
    /// Build the hierarchy, keeping first-appearance order at every level.
    pub fn from_keys<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut root = TreeNode::default();
        for key in keys {
            root.insert(key);
        }
        Self { root }
    }

    /// The root group (empty path).
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Leaf keys in depth-first order.
    pub fn leaves(&self) -> Vec<&Path> {
        let mut out = Vec::new();
        self.root.leaf_keys(&mut out);
        out
    }
}

/// Status of every node of `tree`, root included.
///
/// Leaves missing from `leaves` count as `Unchanged`. A node that is both a
/// leaf and a group combines its own status with its children's.
pub fn rollup(tree: &GroupTree, leaves: &BTreeMap<Path, ChangeType>) -> BTreeMap<Path, ChangeType> {
    let mut out = BTreeMap::new();
    rollup_node(&tree.root, leaves, &mut out);
    out
}

/// [`rollup`] over the hierarchy implied by the leaf map itself.
pub fn rollup_leaves(leaves: &BTreeMap<Path, ChangeType>) -> BTreeMap<Path, ChangeType> {
    rollup(&GroupTree::from_keys(leaves.keys()), leaves)
}

fn rollup_node(
    node: &TreeNode,
    leaves: &BTreeMap<Path, ChangeType>,
    out: &mut BTreeMap<Path, ChangeType>,
) -> ChangeType {
    let own = node
        .is_leaf
        .then(|| leaves.get(&node.path).copied().unwrap_or_default());
    let children: Vec<ChangeType> = node
        .children
        .iter()
        .map(|child| rollup_node(child, leaves, out))
        .collect();

    let status = if node.is_group() {
        combine(own.into_iter().chain(children))
    } else {
        own.unwrap_or_default()
    };
    out.insert(node.path.clone(), status);
    status
}

/// A hierarchy node annotated with its rolled-up status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChangeNode {
    pub path: Path,
    /// Rolled-up status of this node.
    pub change: ChangeType,
    /// The node's own component status, if it is a leaf.
    pub leaf: Option<ChangeType>,
    pub children: Vec<ChangeNode>,
}

impl ChangeNode {
    /// Annotate `tree` with the statuses computed by [`rollup`].
    pub fn annotate(
        tree: &GroupTree,
        leaves: &BTreeMap<Path, ChangeType>,
        statuses: &BTreeMap<Path, ChangeType>,
    ) -> Self {
        Self::from_node(&tree.root, leaves, statuses)
    }

    fn from_node(
        node: &TreeNode,
        leaves: &BTreeMap<Path, ChangeType>,
        statuses: &BTreeMap<Path, ChangeType>,
    ) -> Self {
        Self {
            path: node.path.clone(),
            change: statuses.get(&node.path).copied().unwrap_or_default(),
            leaf: node
                .is_leaf
                .then(|| leaves.get(&node.path).copied().unwrap_or_default()),
            children: node
                .children
                .iter()
                .map(|c| Self::from_node(c, leaves, statuses))
                .collect(),
        }
    }

    /// Returns `true` if this node stands for a component.
    pub fn is_leaf(&self) -> bool {
        self.leaf.is_some()
    }

    /// A copy without unchanged sub-trees.
    ///
    /// Every changed leaf keeps its full ancestor chain. The node this is
    /// called on is always kept.
    pub fn changed_only(&self) -> Self {
        Self {
            path: self.path.clone(),
            change: self.change,
            leaf: self.leaf,
            children: self
                .children
                .iter()
                .filter(|c| c.change.is_changed())
                .map(ChangeNode::changed_only)
                .collect(),
        }
    }

    /// The first changed leaf in depth-first document order.
    pub fn first_changed_leaf(&self) -> Option<&Path> {
        if self.leaf.is_some_and(|c| c.is_changed()) {
            return Some(&self.path);
        }
        self.children.iter().find_map(ChangeNode::first_changed_leaf)
    }

    /// Number of leaves in this sub-tree.
    pub fn leaf_count(&self) -> usize {
        usize::from(self.is_leaf()) + self.children.iter().map(ChangeNode::leaf_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use revlens_types::ChangeType::*;

    fn p(s: &str) -> Path {
        if s.is_empty() {
            Path::root()
        } else {
            s.split('/').collect()
        }
    }

    fn leaves(pairs: &[(&str, ChangeType)]) -> BTreeMap<Path, ChangeType> {
        pairs.iter().map(|(k, c)| (p(k), *c)).collect()
    }

    #[test]
    fn combine_table() {
        assert_eq!(combine(Vec::new()), Unchanged);
        assert_eq!(combine([LeftOnly, LeftOnly]), LeftOnly);
        assert_eq!(combine([RightOnly]), RightOnly);
        assert_eq!(combine([Unchanged, Unchanged]), Unchanged);
        assert_eq!(combine([Unchanged, RightOnly]), Modified);
        assert_eq!(combine([LeftOnly, RightOnly]), Modified);
        assert_eq!(combine([Modified]), Modified);
        assert_eq!(combine([Unchanged, Unchanged, Modified]), Modified);
    }

    #[test]
    fn tree_preserves_first_appearance_order() {
        let keys = [p("b/x"), p("a"), p("b/y"), p("c/d/e")];
        let tree = GroupTree::from_keys(&keys);
        let top: Vec<String> = tree.root().children.iter().map(|c| c.path.to_string()).collect();
        assert_eq!(top, vec!["b", "a", "c"]);

        let b = &tree.root().children[0];
        assert!(b.is_group());
        assert!(!b.is_leaf);
        assert_eq!(b.children.len(), 2);
        assert_eq!(tree.leaves(), vec![&p("b/x"), &p("b/y"), &p("a"), &p("c/d/e")]);
    }

    #[test]
    fn group_prefixes_are_segment_wise() {
        let keys = [p("Destination [1]/Script"), p("Destination [10]/Script")];
        let tree = GroupTree::from_keys(&keys);
        assert_eq!(tree.root().children.len(), 2);
    }

    #[test]
    fn added_group() {
        let map = leaves(&[
            ("Destination [3]/Configuration", RightOnly),
            ("Destination [3]/Script", RightOnly),
        ]);
        let statuses = rollup_leaves(&map);
        assert_eq!(statuses[&p("Destination [3]")], RightOnly);
        assert_eq!(statuses[&Path::root()], RightOnly);
    }

    #[test]
    fn mixed_group_is_modified() {
        let map = leaves(&[
            ("Channel Properties", Unchanged),
            ("Destination [1]/Configuration", Unchanged),
            ("Destination [1]/Script", LeftOnly),
            ("Destination [2]/Configuration", Unchanged),
        ]);
        let statuses = rollup_leaves(&map);
        assert_eq!(statuses[&p("Destination [1]")], Modified);
        assert_eq!(statuses[&p("Destination [2]")], Unchanged);
        assert_eq!(statuses[&p("Channel Properties")], Unchanged);
        assert_eq!(statuses[&Path::root()], Modified);
    }

    #[test]
    fn missing_leaf_counts_as_unchanged() {
        let keys = [p("g/a"), p("g/b")];
        let tree = GroupTree::from_keys(&keys);
        let map = leaves(&[("g/a", Unchanged)]);
        let statuses = rollup(&tree, &map);
        assert_eq!(statuses[&p("g/b")], Unchanged);
        assert_eq!(statuses[&p("g")], Unchanged);
    }

    #[test]
    fn deep_nesting() {
        let map = leaves(&[
            ("Destination [2]/Transformer/Step 0", RightOnly),
            ("Destination [2]/Configuration", Modified),
        ]);
        let statuses = rollup_leaves(&map);
        assert_eq!(statuses[&p("Destination [2]/Transformer")], RightOnly);
        assert_eq!(statuses[&p("Destination [2]")], Modified);
    }

    #[test]
    fn empty_leaf_map() {
        let statuses = rollup_leaves(&BTreeMap::new());
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[&Path::root()], Unchanged);
    }

    #[test]
    fn node_that_is_leaf_and_group() {
        let map = leaves(&[("t", Unchanged), ("t/Step 0", RightOnly)]);
        let statuses = rollup_leaves(&map);
        assert_eq!(statuses[&p("t")], Modified);
    }

    fn annotated(map: &BTreeMap<Path, ChangeType>, order: &[&str]) -> ChangeNode {
        let keys: Vec<Path> = order.iter().map(|k| p(k)).collect();
        let tree = GroupTree::from_keys(&keys);
        let statuses = rollup(&tree, map);
        ChangeNode::annotate(&tree, map, &statuses)
    }

    #[test]
    fn changed_only_keeps_ancestor_chains() {
        let order = [
            "Channel Properties",
            "Channel Scripts/Deploy Script",
            "Channel Scripts/Undeploy Script",
            "Destination [1]/Configuration",
        ];
        let map = leaves(&[
            ("Channel Properties", Unchanged),
            ("Channel Scripts/Deploy Script", Modified),
            ("Channel Scripts/Undeploy Script", Unchanged),
            ("Destination [1]/Configuration", Unchanged),
        ]);
        let tree = annotated(&map, &order);
        assert_eq!(tree.leaf_count(), 4);

        let pruned = tree.changed_only();
        assert_eq!(pruned.children.len(), 1);
        let scripts = &pruned.children[0];
        assert_eq!(scripts.path, p("Channel Scripts"));
        assert_eq!(scripts.change, Modified);
        assert_eq!(scripts.children.len(), 1);
        assert_eq!(scripts.children[0].path, p("Channel Scripts/Deploy Script"));
        assert_eq!(pruned.leaf_count(), 1);
    }

    #[test]
    fn first_changed_leaf_is_depth_first() {
        let order = ["a", "g/x", "g/y", "z"];
        let map = leaves(&[("a", Unchanged), ("g/x", Unchanged), ("g/y", LeftOnly), ("z", Modified)]);
        let tree = annotated(&map, &order);
        assert_eq!(tree.first_changed_leaf(), Some(&p("g/y")));

        let unchanged = leaves(&[("a", Unchanged)]);
        assert_eq!(annotated(&unchanged, &["a"]).first_changed_leaf(), None);
    }

    fn arb_change() -> impl Strategy<Value = ChangeType> {
        prop_oneof![Just(Unchanged), Just(Modified), Just(LeftOnly), Just(RightOnly)]
    }

    proptest! {
        #[test]
        fn group_is_unchanged_iff_all_leaves_are(
            map in proptest::collection::btree_map("[a-c]/[a-c](/[a-c])?", arb_change(), 1..10)
        ) {
            let leaves: BTreeMap<Path, ChangeType> = map.iter().map(|(k, c)| (p(k), *c)).collect();
            let statuses = rollup_leaves(&leaves);
            for (group, status) in &statuses {
                let descendants: Vec<ChangeType> = leaves
                    .iter()
                    .filter(|(k, _)| k.starts_with(group))
                    .map(|(_, c)| *c)
                    .collect();
                let all_unchanged = descendants.iter().all(|c| *c == Unchanged);
                prop_assert_eq!(*status == Unchanged, all_unchanged);
                if descendants.iter().all(|c| *c == RightOnly) {
                    prop_assert_eq!(*status, RightOnly);
                }
            }
        }
    }
}
