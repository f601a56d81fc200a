//! Browser services the interaction controller needs beyond the element tree.

use crate::dom::{Document, DomTree, NodeId};

/// Environment the controller runs in: the element tree plus the services it calls
/// on a commit gesture
pub trait Host: DomTree {
    fn element_from_point(&self, x: f64, y: f64) -> Option<Self::Node>;
    fn write_clipboard(&mut self, text: &str);
    /// Follows a URI, which hands editor schemes to the operating system
    fn navigate(&mut self, uri: &str);
}

/// Host over an in-memory [`Document`] that records every side effect
#[derive(Debug, Default)]
pub struct MemoryHost {
    pub document: Document,
    pub clipboard: Vec<String>,
    pub navigations: Vec<String>,
    element_at_point: Option<NodeId>,
}

impl MemoryHost {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            ..Default::default()
        }
    }

    /// Node reported for every pointer position
    pub fn set_element_at_point(&mut self, node: Option<NodeId>) {
        self.element_at_point = node;
    }
}

impl DomTree for MemoryHost {
    type Node = NodeId;

    fn is_element(&self, node: NodeId) -> bool {
        self.document.is_element(node)
    }

    fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.document.parent_node(node)
    }

    fn shadow_host(&self, node: NodeId) -> Option<NodeId> {
        self.document.shadow_host(node)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.document.attribute(node, name)
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.document.tag_name(node)
    }

    fn outer_html(&self, node: NodeId, skip_attributes: &[&str]) -> String {
        self.document.outer_html(node, skip_attributes)
    }
}

impl Host for MemoryHost {
    fn element_from_point(&self, _x: f64, _y: f64) -> Option<NodeId> {
        self.element_at_point
    }

    fn write_clipboard(&mut self, text: &str) {
        self.clipboard.push(text.to_string());
    }

    fn navigate(&mut self, uri: &str) {
        self.navigations.push(uri.to_string());
    }
}
