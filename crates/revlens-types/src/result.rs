use std::collections::BTreeMap;

use serde::Serialize;

use crate::component::Component;
use crate::path::Path;

/// The decomposition of one document revision.
///
/// Components keep their insertion order; keys are unique. A result is
/// immutable once built: it can only be produced through a
/// [`DecompositionBuilder`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DecompositionResult {
    components: Vec<Component>,
    #[serde(skip)]
    index: BTreeMap<Path, usize>,
    group_display_names: BTreeMap<Path, String>,
}

impl DecompositionResult {
    /// Look up a component by key.
    pub fn get(&self, key: &Path) -> Option<&Component> {
        self.index.get(key).map(|&i| &self.components[i])
    }

    /// Content of the component at `key`, if present.
    pub fn content(&self, key: &Path) -> Option<&str> {
        self.get(key).map(|c| c.content.as_str())
    }

    /// Returns `true` if a component with this key exists.
    pub fn contains_key(&self, key: &Path) -> bool {
        self.index.contains_key(key)
    }

    /// Components in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Path> {
        self.components.iter().map(|c| &c.key)
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if there are no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Human-readable label for a group whose name may change across
    /// revisions without affecting its identity.
    pub fn group_display_name(&self, group: &Path) -> Option<&str> {
        self.group_display_names.get(group).map(String::as_str)
    }
}

/// Accumulates components in discovery order and keeps keys unique.
#[derive(Debug, Default)]
pub struct DecompositionBuilder {
    components: Vec<Component>,
    index: BTreeMap<Path, usize>,
    group_display_names: BTreeMap<Path, String>,
}

impl DecompositionBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component and return the key it was stored under.
    ///
    /// A key that is already taken gets its last segment suffixed with
    /// `" (2)"`, `" (3)"`, ... so that no content is overwritten.
    pub fn insert(&mut self, mut component: Component) -> Path {
        let key = unique_key(&self.index, &component.key);
        if key != component.key {
            component.rekey(key.clone());
        }
        self.index.insert(key.clone(), self.components.len());
        self.components.push(component);
        key
    }

    /// Record the display label of a group.
    pub fn set_group_display_name(&mut self, group: Path, name: impl Into<String>) {
        self.group_display_names.insert(group, name.into());
    }

    /// Finish the result, placing `leading` components before everything
    /// collected so far.
    pub fn build_with_leading(
        self,
        leading: impl IntoIterator<Item = Component>,
    ) -> DecompositionResult {
        let mut ordered = DecompositionBuilder {
            group_display_names: self.group_display_names,
            ..Default::default()
        };
        for component in leading.into_iter().chain(self.components) {
            ordered.insert(component);
        }
        ordered.build()
    }

    /// Finish the result in insertion order.
    pub fn build(self) -> DecompositionResult {
        DecompositionResult {
            components: self.components,
            index: self.index,
            group_display_names: self.group_display_names,
        }
    }
}

fn unique_key(index: &BTreeMap<Path, usize>, wanted: &Path) -> Path {
    if !index.contains_key(wanted) {
        return wanted.clone();
    }
    (2..)
        .map(|n| wanted.with_suffix(&format!(" ({n})")))
        .find(|candidate| !index.contains_key(candidate))
        .unwrap_or_else(|| wanted.clone())
}

impl<'a> IntoIterator for &'a DecompositionResult {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Category;

    fn comp(segments: &[&str], content: &str) -> Component {
        Component::new(
            Path::new(segments.iter().copied()),
            segments.last().copied().unwrap_or_default(),
            content,
            Category::ConnectorPlugin,
        )
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut b = DecompositionBuilder::new();
        b.insert(comp(&["b"], "1"));
        b.insert(comp(&["a"], "2"));
        let result = b.build();
        let keys: Vec<String> = result.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn duplicate_keys_are_suffixed_not_overwritten() {
        let mut b = DecompositionBuilder::new();
        let first = b.insert(comp(&["Src", "Plugin: Props"], "one"));
        let second = b.insert(comp(&["Src", "Plugin: Props"], "two"));
        let third = b.insert(comp(&["Src", "Plugin: Props"], "three"));

        assert_eq!(first, Path::new(["Src", "Plugin: Props"]));
        assert_eq!(second, Path::new(["Src", "Plugin: Props (2)"]));
        assert_eq!(third, Path::new(["Src", "Plugin: Props (3)"]));

        let result = b.build();
        assert_eq!(result.len(), 3);
        assert_eq!(result.content(&second), Some("two"));
        assert_eq!(result.get(&third).unwrap().key, third);
    }

    #[test]
    fn leading_components_come_first() {
        let mut b = DecompositionBuilder::new();
        b.insert(comp(&["Channel Scripts", "Deploy Script"], "x"));
        b.set_group_display_name(Path::new(["Destination [1]"]), "Destination: A [1]");
        let result = b.build_with_leading(vec![comp(&["Channel Properties"], "<channel/>")]);

        let first = result.iter().next().unwrap();
        assert_eq!(first.key, Path::new(["Channel Properties"]));
        assert_eq!(result.len(), 2);
        assert_eq!(
            result.group_display_name(&Path::new(["Destination [1]"])),
            Some("Destination: A [1]")
        );
    }

    #[test]
    fn lookup_of_missing_key() {
        let result = DecompositionBuilder::new().build();
        assert!(result.is_empty());
        assert!(result.get(&Path::new(["nope"])).is_none());
        assert!(!result.contains_key(&Path::root()));
    }
}
