use serde::{Deserialize, Serialize};

use crate::path::Path;

/// What part of the document a component was extracted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    ChannelScript,
    ConnectorConfiguration,
    ConnectorScript,
    ConnectorPlugin,
    Filter,
    Transformer,
    ResponseTransformer,
    /// The residual document, and the synthetic destination ordering.
    ChannelProperties,
}

impl Category {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ChannelScript => "Channel Script",
            Self::ConnectorConfiguration => "Connector Configuration",
            Self::ConnectorScript => "Connector Script",
            Self::ConnectorPlugin => "Connector Plugin",
            Self::Filter => "Filter",
            Self::Transformer => "Transformer",
            Self::ResponseTransformer => "Response Transformer",
            Self::ChannelProperties => "Channel Properties",
        }
    }
}

/// One extracted, independently keyed sub-tree of a document revision.
///
/// Only `content` takes part in change classification; `display_name` and
/// `category` are presentation data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Unique key within one decomposition result.
    pub key: Path,
    /// Label shown for this component; may change between revisions.
    pub display_name: String,
    /// Canonical serialized text of the sub-tree.
    pub content: String,
    /// Kind of sub-tree.
    pub category: Category,
    /// The group this component is listed under (always `key.parent()`).
    pub parent_group: Path,
}

impl Component {
    /// Create a component. The parent group is derived from the key.
    pub fn new(
        key: Path,
        display_name: impl Into<String>,
        content: impl Into<String>,
        category: Category,
    ) -> Self {
        let parent_group = key.parent().unwrap_or_default();
        Self {
            key,
            display_name: display_name.into(),
            content: content.into(),
            category,
            parent_group,
        }
    }

    /// Re-key the component, keeping the parent group consistent.
    pub(crate) fn rekey(&mut self, key: Path) {
        self.parent_group = key.parent().unwrap_or_default();
        self.key = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_group_follows_key() {
        let c = Component::new(
            Path::new(["Destination [2]", "Transformer", "Step 0"]),
            "Step 0: JavaScriptStep",
            "<step/>",
            Category::Transformer,
        );
        assert_eq!(c.parent_group, Path::new(["Destination [2]", "Transformer"]));
    }

    #[test]
    fn top_level_component_sits_in_root_group() {
        let c = Component::new(
            Path::new(["Channel Properties"]),
            "Channel Properties",
            "<channel/>",
            Category::ChannelProperties,
        );
        assert!(c.parent_group.is_root());
    }

    #[test]
    fn rekey_updates_parent_group() {
        let mut c = Component::new(Path::new(["a", "b"]), "b", "", Category::ConnectorPlugin);
        c.rekey(Path::new(["x", "b (2)"]));
        assert_eq!(c.parent_group, Path::new(["x"]));
    }
}
