//! Hand-written parser for the HTML-like template syntax of single-file components.
//!
//! It understands elements, attributes (static, bound and directives), comments,
//! `{{ }}` interpolations, void and self-closing elements, and raw-text `script` /
//! `style` bodies. `v-for` and `v-if` chains are folded into [`ForNode`] / [`IfNode`]
//! while children are attached. Unclosed or mismatched tags are errors.

use std::ops::Range;

use locator_core::{LineIndex, LocatorError, Result};

use crate::ast::{Attribute, ElementNode, ForNode, IfBranch, IfNode, NodePosition, TemplateNode};

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Opening tag read from the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenTag {
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Offset just past the closing `>`
    pub end: usize,
    pub self_closing: bool,
}

/// Parses the template text in `range` of `source`.
///
/// Node positions refer to the whole of `source`; `index` must be built from it.
pub fn parse_template(
    source: &str,
    range: Range<usize>,
    index: &LineIndex,
    filename: &str,
) -> Result<Vec<TemplateNode>> {
    let mut parser = Parser {
        source,
        pos: range.start,
        end: range.end.min(source.len()),
        index,
        stack: Vec::new(),
        roots: Vec::new(),
    };
    parser
        .run()
        .map_err(|message| LocatorError::template(filename, message))?;
    Ok(parser.roots)
}

struct Parser<'a> {
    source: &'a str,
    pos: usize,
    end: usize,
    index: &'a LineIndex,
    stack: Vec<ElementNode>,
    roots: Vec<TemplateNode>,
}

impl<'a> Parser<'a> {
    fn run(&mut self) -> std::result::Result<(), String> {
        while self.pos < self.end {
            let rest = &self.source[self.pos..self.end];

            if rest.starts_with("{{") {
                let close = rest
                    .find("}}")
                    .ok_or_else(|| format!("unterminated interpolation at offset {}", self.pos))?;
                self.push_node(TemplateNode::Interpolation(rest[2..close].trim().to_string()));
                self.pos += close + 2;
            } else if rest.starts_with("<!--") {
                let close = rest
                    .find("-->")
                    .ok_or_else(|| format!("unterminated comment at offset {}", self.pos))?;
                self.push_node(TemplateNode::Comment(rest[4..close].to_string()));
                self.pos += close + 3;
            } else if rest.starts_with("<!") {
                // doctype and other bogus comments
                let close = rest.find('>').unwrap_or(rest.len());
                self.push_node(TemplateNode::Comment(rest[2..close].to_string()));
                self.pos += (close + 1).min(rest.len());
            } else if rest.starts_with("</") {
                self.close_tag()?;
            } else if rest.starts_with('<') {
                match read_open_tag(self.source, self.pos, self.end)? {
                    Some(tag) => self.open_tag(tag)?,
                    None => self.text(1),
                }
            } else {
                self.text(0);
            }
        }

        match self.stack.last() {
            Some(open) => Err(format!("element <{}> is missing end tag", open.tag)),
            None => Ok(()),
        }
    }

    /// Consumes text up to the next markup; `skip` bytes are taken unconditionally
    fn text(&mut self, skip: usize) {
        let rest = &self.source[self.pos..self.end];
        let len = rest[skip..]
            .find(|c| c == '<' || c == '{')
            .map(|i| i + skip)
            .unwrap_or(rest.len());
        // a lone `{` is plain text
        let len = len.max(1);
        self.push_text(&rest[..len]);
        self.pos += len;
    }

    fn push_text(&mut self, text: &str) {
        let siblings = self.siblings();
        if let Some(TemplateNode::Text(previous)) = siblings.last_mut() {
            previous.push_str(text);
        } else {
            siblings.push(TemplateNode::Text(text.to_string()));
        }
    }

    fn open_tag(&mut self, tag: OpenTag) -> std::result::Result<(), String> {
        let start = self.pos;
        let element = ElementNode {
            loc: self.position(start),
            tag: tag.name,
            attributes: tag.attributes,
            children: Vec::new(),
            self_closing: tag.self_closing,
        };
        self.pos = tag.end;

        if tag.self_closing || is_void(&element.tag) {
            return self.attach(element);
        }

        if RAW_TEXT_ELEMENTS.contains(&element.tag.to_ascii_lowercase().as_str()) {
            let mut element = element;
            let close = find_end_tag(self.source, self.pos, self.end, &element.tag)
                .ok_or_else(|| format!("element <{}> is missing end tag", element.tag))?;
            let body = &self.source[self.pos..close];
            if !body.is_empty() {
                element.children.push(TemplateNode::Text(body.to_string()));
            }
            let after = self.source[close..self.end]
                .find('>')
                .map(|i| close + i + 1)
                .unwrap_or(self.end);
            self.pos = after;
            return self.attach(element);
        }

        self.stack.push(element);
        Ok(())
    }

    fn close_tag(&mut self) -> std::result::Result<(), String> {
        let rest = &self.source[self.pos..self.end];
        let name: String = rest[2..]
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != '>')
            .collect();
        let close = rest
            .find('>')
            .ok_or_else(|| format!("unterminated end tag at offset {}", self.pos))?;
        if name.is_empty() {
            return Err(format!("invalid end tag at offset {}", self.pos));
        }

        let matching = self
            .stack
            .iter()
            .rposition(|open| open.tag.eq_ignore_ascii_case(&name));
        match matching {
            Some(idx) if idx + 1 == self.stack.len() => {
                self.pos += close + 1;
                match self.stack.pop() {
                    Some(element) => self.attach(element),
                    None => Ok(()),
                }
            }
            Some(_) => Err(format!(
                "element <{}> is missing end tag",
                self.stack.last().map(|e| e.tag.as_str()).unwrap_or_default()
            )),
            None => Err(format!("invalid end tag </{}>", name)),
        }
    }

    fn siblings(&mut self) -> &mut Vec<TemplateNode> {
        match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        }
    }

    fn push_node(&mut self, node: TemplateNode) {
        self.siblings().push(node);
    }

    /// Attaches a finished element, folding `v-for` and `v-if` chains
    fn attach(&mut self, element: ElementNode) -> std::result::Result<(), String> {
        let directive = |name: &str| {
            element
                .attribute(name)
                .map(|a| a.value.clone().unwrap_or_default())
        };
        let if_condition = directive("v-if");
        let else_if_condition = directive("v-else-if");
        let is_else = element.attribute("v-else").is_some();
        let tag = element.tag.clone();

        let node = match directive("v-for") {
            Some(source) => TemplateNode::For(ForNode {
                source,
                children: vec![TemplateNode::Element(element)],
            }),
            None => TemplateNode::Element(element),
        };

        let siblings = self.siblings();
        if let Some(condition) = if_condition {
            siblings.push(TemplateNode::If(IfNode {
                branches: vec![IfBranch {
                    condition: Some(condition),
                    children: vec![node],
                }],
            }));
            return Ok(());
        }

        if else_if_condition.is_none() && !is_else {
            siblings.push(node);
            return Ok(());
        }

        let chain = siblings
            .iter_mut()
            .rev()
            .find(|n| !n.is_ignorable_between_branches());
        match chain {
            Some(TemplateNode::If(if_node))
                if if_node.branches.last().is_some_and(|b| b.condition.is_some()) =>
            {
                if_node.branches.push(IfBranch {
                    condition: else_if_condition,
                    children: vec![node],
                });
                Ok(())
            }
            _ => Err(format!(
                "<{}> has v-else/v-else-if without an adjacent v-if",
                tag
            )),
        }
    }

    fn position(&self, offset: usize) -> NodePosition {
        let (line, column) = self.index.location(self.source, offset);
        NodePosition {
            offset,
            line,
            column,
        }
    }
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

fn is_name_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

/// Reads an opening tag starting at the `<` at `start`.
///
/// Returns `Ok(None)` when the `<` does not start a tag (e.g. `a < b` in text).
pub(crate) fn read_open_tag(
    source: &str,
    start: usize,
    end: usize,
) -> std::result::Result<Option<OpenTag>, String> {
    let bytes = &source.as_bytes()[..end];
    let mut i = start + 1;
    if i >= end || !is_name_start(bytes[i]) {
        return Ok(None);
    }
    while i < end && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' && bytes[i] != b'/' {
        i += 1;
    }
    let name = source[start + 1..i].to_string();

    let mut attributes = Vec::new();
    loop {
        while i < end && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= end {
            return Err(format!("unterminated start tag <{}>", name));
        }
        match bytes[i] {
            b'>' => {
                return Ok(Some(OpenTag {
                    name,
                    attributes,
                    end: i + 1,
                    self_closing: false,
                }))
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                return Ok(Some(OpenTag {
                    name,
                    attributes,
                    end: i + 2,
                    self_closing: true,
                }))
            }
            b'/' | b'=' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let name_start = i;
        while i < end
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let attr_name = source[name_start..i].to_string();

        let mut j = i;
        while j < end && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        let mut value = None;
        if j < end && bytes[j] == b'=' {
            j += 1;
            while j < end && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < end && (bytes[j] == b'"' || bytes[j] == b'\'') {
                let quote = bytes[j];
                let close = bytes[j + 1..]
                    .iter()
                    .position(|b| *b == quote)
                    .ok_or_else(|| format!("unterminated attribute value in <{}>", name))?;
                value = Some(source[j + 1..j + 1 + close].to_string());
                j += close + 2;
            } else {
                let value_start = j;
                while j < end && !bytes[j].is_ascii_whitespace() && bytes[j] != b'>' {
                    j += 1;
                }
                value = Some(source[value_start..j].to_string());
            }
            i = j;
        }

        attributes.push(Attribute {
            name: attr_name,
            value,
            synthetic: false,
        });
    }
}

/// Offset of the `</name` that closes a raw-text element, matched case-insensitively
pub(crate) fn find_end_tag(source: &str, from: usize, end: usize, name: &str) -> Option<usize> {
    let haystack = source.get(from..end)?.to_ascii_lowercase();
    let needle = format!("</{}", name.to_ascii_lowercase());
    let mut search = 0;
    while let Some(found) = haystack[search..].find(&needle) {
        let at = search + found;
        let next = haystack.as_bytes().get(at + needle.len());
        if matches!(next, None | Some(b'>')) || next.is_some_and(|b| b.is_ascii_whitespace()) {
            return Some(from + at);
        }
        search = at + needle.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Vec<TemplateNode>> {
        let index = LineIndex::new(source);
        parse_template(source, 0..source.len(), &index, "t.vue")
    }

    fn elements(nodes: &[TemplateNode]) -> Vec<&ElementNode> {
        nodes
            .iter()
            .filter_map(|n| match n {
                TemplateNode::Element(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_nested_elements_and_positions() {
        let nodes = parse("<div>\n  <span class=\"a\">{{ msg }}</span>\n</div>").unwrap();
        let div = elements(&nodes)[0];
        assert_eq!(div.tag, "div");
        assert_eq!((div.loc.line, div.loc.column, div.loc.offset), (1, 0, 0));

        let span = elements(&div.children)[0];
        assert_eq!((span.loc.line, span.loc.column), (2, 2));
        assert_eq!(span.attribute("class").unwrap().value.as_deref(), Some("a"));
        assert_eq!(
            span.children,
            vec![TemplateNode::Interpolation("msg".to_string())]
        );
    }

    #[test]
    fn test_attribute_forms() {
        let source = "<input disabled :value=\"x > 1\" @input='go' v-model=plain>";
        let nodes = parse(source).unwrap();
        let input = elements(&nodes)[0];
        let names: Vec<_> = input.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["disabled", ":value", "@input", "v-model"]);
        assert_eq!(input.attributes[0].value, None);
        assert_eq!(input.attributes[1].value.as_deref(), Some("x > 1"));
        assert_eq!(input.attributes[3].value.as_deref(), Some("plain"));
        assert!(!input.attributes[1].is_static());
    }

    #[test]
    fn test_void_and_self_closing() {
        let nodes = parse("<p><br><img src=\"a.png\"/><MyWidget /></p>").unwrap();
        let p = elements(&nodes)[0];
        let tags: Vec<_> = elements(&p.children).iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["br", "img", "MyWidget"]);
    }

    #[test]
    fn test_v_for_becomes_for_node() {
        let nodes = parse("<ul><li v-for=\"item in items\">{{ item }}</li></ul>").unwrap();
        let ul = elements(&nodes)[0];
        match &ul.children[0] {
            TemplateNode::For(for_node) => {
                assert_eq!(for_node.source, "item in items");
                assert_eq!(elements(&for_node.children)[0].tag, "li");
            }
            other => panic!("expected for node, got {:?}", other),
        }
    }

    #[test]
    fn test_if_chain_collects_branches() {
        let source = "<div>\n  <p v-if=\"a\">a</p>\n  <!-- b -->\n  <p v-else-if=\"b\">b</p>\n  <p v-else>c</p>\n</div>";
        let nodes = parse(source).unwrap();
        let div = elements(&nodes)[0];
        let if_node = div
            .children
            .iter()
            .find_map(|n| match n {
                TemplateNode::If(i) => Some(i),
                _ => None,
            })
            .unwrap();
        let conditions: Vec<_> = if_node
            .branches
            .iter()
            .map(|b| b.condition.as_deref())
            .collect();
        assert_eq!(conditions, vec![Some("a"), Some("b"), None]);
        let lines: Vec<_> = if_node
            .branches
            .iter()
            .map(|b| elements(&b.children)[0].loc.line)
            .collect();
        assert_eq!(lines, vec![2, 4, 5]);
    }

    #[test]
    fn test_v_else_without_v_if_is_error() {
        assert!(parse("<p v-else>c</p>").is_err());
    }

    #[test]
    fn test_unclosed_and_mismatched_tags() {
        assert!(parse("<div><span></div>").is_err());
        assert!(parse("<div>").is_err());
        assert!(parse("</div>").is_err());
        assert!(parse("<div class=\"x></div>").is_err());
    }

    #[test]
    fn test_less_than_in_text_and_raw_style() {
        let nodes = parse("<p>a < b</p><style>p > a { color: red }</style>").unwrap();
        let found = elements(&nodes);
        assert_eq!(found[0].children, vec![TemplateNode::Text("a < b".to_string())]);
        assert_eq!(found[1].tag, "style");
    }

    #[test]
    fn test_find_end_tag_case_insensitive() {
        let source = "x</scripts></SCRIPT >";
        assert_eq!(find_end_tag(source, 0, source.len(), "script"), Some(11));
    }
}
