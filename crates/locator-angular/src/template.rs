//! Regex-driven tag scanner for Angular templates.
//!
//! Angular template syntax is close enough to plain HTML that opening tags can be found
//! with a single pattern; no template AST is built.

use locator_core::annotator::escape_attribute;
use locator_core::{
    AnnotateOptions, AnnotatedElement, LineIndex, Result, SourceLocation, TransformOutput,
    ATTR_LOCATOR,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Structural elements that never render a DOM node of their own
pub const SKIP_ELEMENTS: [&str; 4] = ["ng-container", "ng-template", "ng-content", "router-outlet"];

/// `<name attrs? /?>`; group 1 = tag name, 2 = attribute text, 3 = self-closing slash
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<([a-zA-Z!][a-zA-Z0-9-]*)((?:\s+[^>]*?)?)\s*(/?)>").expect("valid tag pattern")
});

/// Quote character of the script literal a template region lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Enclosing {
    /// Standalone `.html` file
    Markup,
    /// Inline template inside a string literal delimited by this character
    Literal(char),
}

/// Transforms a standalone Angular template file
pub fn transform_angular_template(
    code: &str,
    options: &AnnotateOptions,
) -> Result<Option<TransformOutput>> {
    let filename = options.require_filename()?;
    let index = LineIndex::new(code);

    let elements = scan_region(code, &index, 0..code.len(), filename, options);
    if elements.is_empty() {
        return Ok(None);
    }

    tracing::debug!(file = %filename, elements = elements.len(), "Annotated Angular template");
    Ok(Some(TransformOutput::new(splice_region(
        code,
        0..code.len(),
        &elements,
        Enclosing::Markup,
    ))))
}

/// Finds every eligible opening tag inside `region` of `text`.
///
/// Positions are computed against the whole of `text`, so a region that is an inline
/// template reports lines and columns of the component file.
pub(crate) fn scan_region(
    text: &str,
    index: &LineIndex,
    region: Range<usize>,
    filename: &str,
    options: &AnnotateOptions,
) -> Vec<AnnotatedElement> {
    let Some(content) = text.get(region.clone()) else {
        return Vec::new();
    };

    let mut elements = Vec::new();
    for caps in TAG_RE.captures_iter(content) {
        let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let tag_name = tag.as_str();
        let attributes = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());

        if tag_name.starts_with('!')
            || SKIP_ELEMENTS.contains(&tag_name.to_ascii_lowercase().as_str())
            || options.is_ignored(tag_name)
            || attributes.contains(ATTR_LOCATOR)
        {
            continue;
        }

        let start = region.start + whole.start();
        let (line, column) = index.location(text, start);
        let close_len = if self_closing { 2 } else { 1 };

        elements.push(AnnotatedElement {
            name: tag_name.to_string(),
            location: SourceLocation::new(filename, line, column),
            insert_at: region.start + whole.end() - close_len,
        });
    }
    elements
}

/// Returns the text of `region` with an attribute spliced in for every element
pub(crate) fn splice_region(
    text: &str,
    region: Range<usize>,
    elements: &[AnnotatedElement],
    enclosing: Enclosing,
) -> String {
    let mut out = String::with_capacity(region.len() + elements.len() * 48);
    let mut last = region.start;
    for element in elements {
        out.push_str(&text[last..element.insert_at]);
        out.push_str(&attribute_for(element, enclosing));
        last = element.insert_at;
    }
    out.push_str(&text[last..region.end]);
    out
}

fn attribute_for(element: &AnnotatedElement, enclosing: Enclosing) -> String {
    let text = format!(
        " {}=\"{}\"",
        ATTR_LOCATOR,
        escape_attribute(&element.location.encoded())
    );
    match enclosing {
        Enclosing::Markup => text,
        Enclosing::Literal(quote) => escape_for_literal(&text, quote),
    }
}

/// Escapes inserted text so the surrounding script string literal stays intact
fn escape_for_literal(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            '$' if quote == '`' && chars.peek() == Some(&'{') => out.push_str("\\$"),
            c => out.push(c),
        }
    }
    out
}
