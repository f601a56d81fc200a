//! Template tree produced by [`crate::parser`].
//!
//! Besides plain elements the tree carries the two control-flow shapes the annotator
//! descends into: `v-for` loops and `v-if` / `v-else-if` / `v-else` chains.

/// Position of a node in the whole component file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePosition {
    /// Byte offset in the component file
    pub offset: usize,
    /// 1-based line
    pub line: usize,
    /// 0-based column, in characters
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
    /// Added by the annotator rather than read from the source
    pub synthetic: bool,
}

impl Attribute {
    pub fn synthetic(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            synthetic: true,
        }
    }

    /// Plain attribute as opposed to a directive or a bound (`:x`, `@x`, `#x`) one
    pub fn is_static(&self) -> bool {
        !(self.name.starts_with("v-")
            || self.name.starts_with(':')
            || self.name.starts_with('@')
            || self.name.starts_with('#'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<TemplateNode>,
    pub loc: NodePosition,
    pub self_closing: bool,
}

impl ElementNode {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn has_static_attribute(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|a| a.is_static() && a.name == name)
    }
}

/// `v-for` block; its only child is the repeated element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForNode {
    pub source: String,
    pub children: Vec<TemplateNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfBranch {
    /// `None` for the `v-else` branch
    pub condition: Option<String>,
    pub children: Vec<TemplateNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfNode {
    pub branches: Vec<IfBranch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateNode {
    Element(ElementNode),
    For(ForNode),
    If(IfNode),
    Text(String),
    Interpolation(String),
    Comment(String),
}

impl TemplateNode {
    /// Nodes a control-flow chain may be separated by
    pub(crate) fn is_ignorable_between_branches(&self) -> bool {
        match self {
            TemplateNode::Text(text) => text.trim().is_empty(),
            TemplateNode::Comment(_) => true,
            _ => false,
        }
    }
}
