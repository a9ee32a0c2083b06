//! Read-only XML helpers and the canonical serializer.
//!
//! The parsed `roxmltree` document is never modified. Extraction marks nodes
//! in a [`Consumed`] set and the serializer skips them, so the residual of a
//! sub-tree is simply "everything not yet claimed".
//!
//! Canonical form:
//! - two-space indentation, one node per line
//! - childless elements as `<a/>`, text-only elements inline with their text
//!   preserved verbatim
//! - whitespace-only text dropped inside elements that have element children
//! - attributes in document order; namespace declarations emitted where a
//!   prefix first comes into scope

use std::collections::{BTreeSet, HashSet};

use roxmltree::{Node, NodeId, NodeType};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
const INDENT: &str = "  ";

/// Nodes already claimed by an extracted component.
#[derive(Debug, Default)]
pub(crate) struct Consumed {
    ids: HashSet<NodeId>,
}

impl Consumed {
    pub(crate) fn mark(&mut self, node: Node<'_, '_>) {
        self.ids.insert(node.id());
    }

    pub(crate) fn contains(&self, node: Node<'_, '_>) -> bool {
        self.ids.contains(&node.id())
    }
}

/// First direct child element with the given local name.
pub(crate) fn child_element<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

/// Direct child elements in document order.
pub(crate) fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|c| c.is_element())
}

/// Concatenated text of all descendant text nodes.
pub(crate) fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Returns `true` if `node` carries nothing but text: no attributes and no
/// element, comment or PI children.
pub(crate) fn is_text_only(node: Node<'_, '_>) -> bool {
    node.attributes().next().is_none() && node.children().all(|c| c.is_text())
}

/// Trimmed text content of the first direct child named `name`.
pub(crate) fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child_element(node, name).map(|c| text_content(c).trim().to_string())
}

/// Returns `true` if serializing `node` would emit no children.
pub(crate) fn is_exhausted(node: Node<'_, '_>, consumed: &Consumed) -> bool {
    retained_children(node, consumed).is_empty()
}

/// Serialize `node` (an element or the document root) in canonical form,
/// skipping consumed sub-trees.
pub(crate) fn serialize(node: Node<'_, '_>, consumed: &Consumed) -> String {
    let mut out = String::new();
    match node.node_type() {
        NodeType::Root => {
            let mut first = true;
            for child in node.children().filter(|c| !consumed.contains(*c)) {
                if child.is_text() {
                    continue;
                }
                if !first {
                    out.push('\n');
                }
                first = false;
                write_node(child, 0, consumed, &BTreeSet::new(), &mut out);
            }
        }
        _ => write_node(node, 0, consumed, &BTreeSet::new(), &mut out),
    }
    out
}

type Scope = BTreeSet<(String, String)>;

fn write_node(
    node: Node<'_, '_>,
    depth: usize,
    consumed: &Consumed,
    parent_scope: &Scope,
    out: &mut String,
) {
    let indent = INDENT.repeat(depth);
    match node.node_type() {
        NodeType::Element => write_element(node, depth, consumed, parent_scope, out),
        NodeType::Text => {
            out.push_str(&indent);
            escape_text(node.text().unwrap_or_default().trim(), out);
        }
        NodeType::Comment => {
            out.push_str(&indent);
            out.push_str("<!--");
            out.push_str(node.text().unwrap_or_default());
            out.push_str("-->");
        }
        NodeType::PI => {
            if let Some(pi) = node.pi() {
                out.push_str(&indent);
                out.push_str("<?");
                out.push_str(pi.target);
                if let Some(value) = pi.value {
                    out.push(' ');
                    out.push_str(value);
                }
                out.push_str("?>");
            }
        }
        NodeType::Root => {}
    }
}

fn write_element(
    node: Node<'_, '_>,
    depth: usize,
    consumed: &Consumed,
    parent_scope: &Scope,
    out: &mut String,
) {
    let indent = INDENT.repeat(depth);
    let name = qualified_name(node, node.tag_name().namespace(), node.tag_name().name());

    out.push_str(&indent);
    out.push('<');
    out.push_str(&name);

    let scope = namespace_scope(node);
    for (prefix, uri) in scope.difference(parent_scope) {
        if prefix.is_empty() {
            out.push_str(" xmlns=\"");
        } else {
            out.push_str(" xmlns:");
            out.push_str(prefix);
            out.push_str("=\"");
        }
        escape_attr(uri, out);
        out.push('"');
    }

    for attr in node.attributes() {
        out.push(' ');
        out.push_str(&qualified_name(node, attr.namespace(), attr.name()));
        out.push_str("=\"");
        escape_attr(attr.value(), out);
        out.push('"');
    }

    let children = retained_children(node, consumed);
    if children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    if children.iter().all(|c| c.is_text()) {
        for child in &children {
            escape_text(child.text().unwrap_or_default(), out);
        }
    } else {
        for child in &children {
            out.push('\n');
            write_node(*child, depth + 1, consumed, &scope, out);
        }
        out.push('\n');
        out.push_str(&indent);
    }
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

fn retained_children<'a, 'input>(
    node: Node<'a, 'input>,
    consumed: &Consumed,
) -> Vec<Node<'a, 'input>> {
    let has_element_children = node.children().any(|c| c.is_element());
    node.children()
        .filter(|c| !consumed.contains(*c))
        .filter(|c| match c.node_type() {
            NodeType::Text => {
                let blank = c.text().map_or(true, |t| t.trim().is_empty());
                !(blank && has_element_children)
            }
            _ => true,
        })
        .collect()
}

fn namespace_scope(node: Node<'_, '_>) -> Scope {
    node.namespaces()
        .filter(|ns| ns.uri() != XML_NAMESPACE)
        .map(|ns| (ns.name().unwrap_or_default().to_string(), ns.uri().to_string()))
        .collect()
}

fn qualified_name(node: Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(ch),
        }
    }
}
