//! Read-only view of a rendered element tree, plus an in-memory arena implementation.

use indexmap::IndexMap;

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// The subset of the DOM the resolver and the interaction controller rely on.
///
/// Nodes are cheap handles; a browser binding can implement this over its own node
/// references.
pub trait DomTree {
    type Node: Copy + Eq + std::fmt::Debug;

    fn is_element(&self, node: Self::Node) -> bool;

    /// Parent node of any kind (element, shadow root, document)
    fn parent_node(&self, node: Self::Node) -> Option<Self::Node>;

    /// Host element when `node` is a shadow root
    fn shadow_host(&self, node: Self::Node) -> Option<Self::Node>;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Lowercase tag name; empty for non-elements
    fn tag_name(&self, node: Self::Node) -> String;

    /// Markup of the element and its light-DOM descendants, leaving out the named
    /// attributes everywhere in the subtree
    fn outer_html(&self, node: Self::Node, skip_attributes: &[&str]) -> String;

    fn parent_element(&self, node: Self::Node) -> Option<Self::Node> {
        self.parent_node(node).filter(|parent| self.is_element(*parent))
    }

    fn root_node(&self, node: Self::Node) -> Self::Node {
        let mut current = node;
        while let Some(parent) = self.parent_node(current) {
            current = parent;
        }
        current
    }

    /// The node itself when it is an element, otherwise its parent element
    fn nearest_element(&self, node: Self::Node) -> Option<Self::Node> {
        if self.is_element(node) {
            Some(node)
        } else {
            self.parent_element(node)
        }
    }

    /// Closest inclusive ancestor element carrying the attribute
    fn closest_with_attribute(&self, node: Self::Node, name: &str) -> Option<Self::Node> {
        let mut current = self.nearest_element(node);
        while let Some(element) = current {
            if self.attribute(element, name).is_some() {
                return Some(element);
            }
            current = self.parent_element(element);
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
    },
    Text(String),
    ShadowRoot {
        host: NodeId,
    },
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed element tree with open shadow roots
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document node itself
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: IndexMap::new(),
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// Appends `child` to `parent`, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        if let Some(old) = self.nodes[child.0].parent {
            self.nodes[old.0].children.retain(|c| *c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        child
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[node.0].kind {
            attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[node.0].kind {
            attributes.shift_remove(name);
        }
    }

    /// Creates and appends an element with the given attributes
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let element = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attribute(element, name, value);
        }
        self.append_child(parent, element)
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node)
    }

    /// Attaches an open shadow root to `host` and returns it.
    ///
    /// The shadow root is not a child of the host; it only links back to it.
    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        self.push(NodeKind::ShadowRoot { host })
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    fn write_html(&self, node: NodeId, skip: &[&str], out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    if skip.contains(&name.as_str()) {
                        continue;
                    }
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_html(value, true));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in &self.nodes[node.0].children {
                    self.write_html(*child, skip, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            NodeKind::Text(text) => out.push_str(&escape_html(text, false)),
            NodeKind::Document | NodeKind::ShadowRoot { .. } => {
                for child in &self.nodes[node.0].children {
                    self.write_html(*child, skip, out);
                }
            }
        }
    }
}

impl DomTree for Document {
    type Node = NodeId;

    fn is_element(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].kind, NodeKind::Element { .. })
    }

    fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn shadow_host(&self, node: NodeId) -> Option<NodeId> {
        match self.nodes[node.0].kind {
            NodeKind::ShadowRoot { host } => Some(host),
            _ => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).cloned(),
            _ => None,
        }
    }

    fn tag_name(&self, node: NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => tag.clone(),
            _ => String::new(),
        }
    }

    fn outer_html(&self, node: NodeId, skip_attributes: &[&str]) -> String {
        let mut out = String::new();
        self.write_html(node, skip_attributes, &mut out);
        out
    }
}

fn escape_html(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}
