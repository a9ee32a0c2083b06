//! Channel document decomposition.
//!
//! Extraction runs in a fixed order (channel scripts, source connector,
//! destination connectors, residual). Each extraction marks its node as
//! consumed, so later steps and the residual "Channel Properties" component
//! never see content that already belongs to another component.

use std::collections::HashSet;

use roxmltree::{Document, Node};
use tracing::{debug, warn};

use revlens_types::{Category, Component, DecompositionBuilder, DecompositionResult, Path};

use crate::config::{DecomposerConfig, Granularity};
use crate::error::ParseResult;
use crate::xml::{
    child_element, child_text, element_children, is_exhausted, is_text_only, serialize, text_content,
    Consumed,
};

pub const CHANNEL_PROPERTIES: &str = "Channel Properties";
pub const DESTINATION_ORDER: &str = "Destination Order";
pub const CHANNEL_SCRIPTS: &str = "Channel Scripts";
pub const SOURCE_CONNECTOR: &str = "Source Connector";
pub const CONFIGURATION: &str = "Configuration";

struct Pipeline {
    element: &'static str,
    label: &'static str,
    category: Category,
}

const PIPELINES: [Pipeline; 3] = [
    Pipeline {
        element: "filter",
        label: "Filter",
        category: Category::Filter,
    },
    Pipeline {
        element: "transformer",
        label: "Transformer",
        category: Category::Transformer,
    },
    Pipeline {
        element: "responseTransformer",
        label: "Response Transformer",
        category: Category::ResponseTransformer,
    },
];

/// Display name for a type discriminator: the segment after the last `.`.
///
/// Unqualified names, and names ending in a dot, are returned unchanged.
pub fn step_type_name(tag: &str) -> &str {
    match tag.rfind('.') {
        Some(i) if i + 1 < tag.len() => &tag[i + 1..],
        _ => tag,
    }
}

/// Decompose a document with the default configuration.
pub fn decompose(text: &str) -> ParseResult<DecompositionResult> {
    Decomposer::default().decompose(text)
}

/// Splits one document revision into stably keyed components.
#[derive(Clone, Debug, Default)]
pub struct Decomposer {
    config: DecomposerConfig,
}

impl Decomposer {
    /// Create a decomposer with the given configuration.
    pub fn new(config: DecomposerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &DecomposerConfig {
        &self.config
    }

    /// Decompose one document revision.
    ///
    /// Fails only when `text` is not well-formed XML. Structure that matches
    /// no extraction rule stays in its enclosing component.
    pub fn decompose(&self, text: &str) -> ParseResult<DecompositionResult> {
        let doc = Document::parse(text)?;
        let mut run = Run {
            config: &self.config,
            consumed: Consumed::default(),
            builder: DecompositionBuilder::new(),
            order: Vec::new(),
        };

        let root = doc.root_element();
        if root.tag_name().name() == "channel" {
            run.channel_scripts(root);
            if let Some(source) = child_element(root, "sourceConnector") {
                run.connector(source, &Path::new([SOURCE_CONNECTOR]));
            }
            if let Some(wrapper) = child_element(root, "destinationConnectors") {
                run.destinations(wrapper);
            }
        } else {
            debug!(root = root.tag_name().name(), "not a channel document; keeping it whole");
        }

        let residual = serialize(doc.root(), &run.consumed);
        let mut leading = vec![Component::new(
            Path::new([CHANNEL_PROPERTIES]),
            CHANNEL_PROPERTIES,
            residual,
            Category::ChannelProperties,
        )];
        if !run.order.is_empty() {
            leading.push(Component::new(
                Path::new([DESTINATION_ORDER]),
                DESTINATION_ORDER,
                run.order.join("\n"),
                Category::ChannelProperties,
            ));
        }

        let destinations = run.order.len();
        let result = run.builder.build_with_leading(leading);
        debug!(
            components = result.len(),
            destinations,
            granularity = ?self.config.granularity,
            "decomposed document"
        );
        Ok(result)
    }
}

/// State of a single decomposition call.
struct Run<'c> {
    config: &'c DecomposerConfig,
    consumed: Consumed,
    builder: DecompositionBuilder,
    order: Vec<String>,
}

impl Run<'_> {
    fn push(&mut self, component: Component) {
        let wanted = component.key.clone();
        let stored = self.builder.insert(component);
        if stored != wanted {
            warn!(wanted = %wanted, stored = %stored, "duplicate component key disambiguated");
        }
    }

    /// Extract a script element.
    ///
    /// A plain script becomes its bare text. A script with attributes,
    /// comments, PIs or nested elements is serialized whole so none of
    /// them drop out of the comparison.
    fn extract_text(&mut self, node: Node<'_, '_>, key: Path, name: &str, category: Category) {
        let content = if is_text_only(node) {
            text_content(node)
        } else {
            serialize(node, &self.consumed)
        };
        self.push(Component::new(key, name, content, category));
        self.consumed.mark(node);
    }

    /// Extract `node` as a serialized sub-tree component.
    fn extract_tree(&mut self, node: Node<'_, '_>, key: Path, name: String, category: Category) {
        let content = serialize(node, &self.consumed);
        self.push(Component::new(key, name, content, category));
        self.consumed.mark(node);
    }

    fn channel_scripts(&mut self, root: Node<'_, '_>) {
        let group = Path::new([CHANNEL_SCRIPTS]);
        for slot in &self.config.channel_scripts {
            if let Some(node) = child_element(root, &slot.element) {
                self.extract_text(
                    node,
                    group.join(slot.label.as_str()),
                    &slot.label,
                    Category::ChannelScript,
                );
            }
        }
    }

    fn destinations(&mut self, wrapper: Node<'_, '_>) {
        let mut seen = HashSet::new();
        let connectors = element_children(wrapper).filter(|n| n.tag_name().name() == "connector");

        for (i, connector) in connectors.enumerate() {
            let position = i + 1;
            let name = child_text(connector, "name").unwrap_or_default();
            let id = child_text(connector, "metaDataId")
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("#{position}"));

            let mut segment = format!("Destination [{id}]");
            if !seen.insert(segment.clone()) {
                segment = format!("{segment} #{position}");
                seen.insert(segment.clone());
            }
            let group = Path::new([segment]);

            self.builder
                .set_group_display_name(group.clone(), format!("Destination: {name} [{id}]"));
            self.order.push(format!("{position}. {name} [{id}]"));
            self.connector(connector, &group);
        }

        if is_exhausted(wrapper, &self.consumed) {
            self.consumed.mark(wrapper);
        }
    }

    /// Script, plugins, pipelines, then the connector's own configuration.
    fn connector(&mut self, connector: Node<'_, '_>, group: &Path) {
        let properties = child_element(connector, "properties");

        if let Some(script) = properties.and_then(|p| child_element(p, "script")) {
            self.extract_text(script, group.join("Script"), "Script", Category::ConnectorScript);
        }

        if let Some(plugins) = properties.and_then(|p| child_element(p, "pluginProperties")) {
            for plugin in element_children(plugins) {
                let name = format!("Plugin: {}", step_type_name(plugin.tag_name().name()));
                self.extract_tree(plugin, group.join(name.as_str()), name, Category::ConnectorPlugin);
            }
        }

        for pipeline in &PIPELINES {
            if let Some(node) = child_element(connector, pipeline.element) {
                match self.config.granularity {
                    Granularity::Step => self.steps(node, group, pipeline),
                    Granularity::Block => self.extract_tree(
                        node,
                        group.join(pipeline.label),
                        pipeline.label.to_string(),
                        pipeline.category,
                    ),
                }
            }
        }

        self.extract_tree(
            connector,
            group.join(CONFIGURATION),
            CONFIGURATION.to_string(),
            Category::ConnectorConfiguration,
        );
    }

    /// One component per element of `<pipeline>/elements`, keyed by slot index.
    fn steps(&mut self, pipeline_node: Node<'_, '_>, group: &Path, pipeline: &Pipeline) {
        let Some(elements) = child_element(pipeline_node, "elements") else {
            return;
        };
        let sub_group = group.join(pipeline.label);

        for (index, step) in element_children(elements).enumerate() {
            let name = child_text(step, "name")
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| step_type_name(step.tag_name().name()).to_string());
            self.extract_tree(
                step,
                sub_group.join(format!("Step {index}")),
                format!("Step {index}: {name}"),
                pipeline.category,
            );
        }
    }
}
