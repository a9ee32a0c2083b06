use serde::{Deserialize, Serialize};

/// How processing pipelines (filter, transformer, response transformer)
/// are split into components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Every step of a pipeline is its own component, keyed by slot index.
    #[default]
    Step,
    /// The whole pipeline is one component.
    Block,
}

/// A top-level script element extracted into the "Channel Scripts" group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSlot {
    /// Element name under the document root.
    pub element: String,
    /// Key segment and display name of the extracted component.
    pub label: String,
}

impl ScriptSlot {
    pub fn new(element: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            label: label.into(),
        }
    }
}

/// Configuration for the document decomposer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecomposerConfig {
    /// Pipeline extraction granularity.
    pub granularity: Granularity,
    /// Channel script slots, extracted in this order.
    pub channel_scripts: Vec<ScriptSlot>,
}

impl Default for DecomposerConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Step,
            channel_scripts: vec![
                ScriptSlot::new("preprocessingScript", "Preprocessing Script"),
                ScriptSlot::new("postprocessingScript", "Postprocessing Script"),
                ScriptSlot::new("deployScript", "Deploy Script"),
                ScriptSlot::new("undeployScript", "Undeploy Script"),
            ],
        }
    }
}

impl DecomposerConfig {
    /// Default slots with whole-block pipeline extraction.
    pub fn whole_block() -> Self {
        Self {
            granularity: Granularity::Block,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = DecomposerConfig::default();
        assert_eq!(c.granularity, Granularity::Step);
        assert_eq!(c.channel_scripts.len(), 4);
        assert_eq!(c.channel_scripts[2].label, "Deploy Script");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c: DecomposerConfig = toml::from_str(r#"granularity = "block""#).unwrap();
        assert_eq!(c, DecomposerConfig::whole_block());
    }

    #[test]
    fn custom_slots_from_toml() {
        let c: DecomposerConfig = toml::from_str(
            r#"
            [[channel_scripts]]
            element = "deployScript"
            label = "Deploy"
            "#,
        )
        .unwrap();
        assert_eq!(c.granularity, Granularity::Step);
        assert_eq!(c.channel_scripts, vec![ScriptSlot::new("deployScript", "Deploy")]);
    }
}
