//! Markup snippets written to the clipboard in copy mode

use locator_core::{SourceLocation, MARKER_ATTRIBUTES};

use crate::dom::DomTree;

pub const DEFAULT_INDENT: usize = 2;

/// Outer markup of `element` with every location marker attribute removed from the
/// whole subtree
pub fn clean_outer_html<D: DomTree>(dom: &D, element: D::Node) -> String {
    dom.outer_html(element, &MARKER_ATTRIBUTES)
}

/// Bracket-based reindentation: one tag per line, nested by `indent` spaces
pub fn format_html(html: &str, indent: usize) -> String {
    let mut formatted = String::with_capacity(html.len() * 2);
    let mut level = 0usize;

    for line in html.replace("><", ">\n<").lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with("</") {
            level = level.saturating_sub(1);
        }

        formatted.push_str(&" ".repeat(level * indent));
        formatted.push_str(trimmed);
        formatted.push('\n');

        if trimmed.starts_with('<')
            && !trimmed.starts_with("</")
            && !trimmed.ends_with("/>")
            && !trimmed.contains("</")
        {
            level += 1;
        }
    }

    formatted.trim().to_string()
}

/// Clipboard text for an element: its location, then its cleaned markup
pub fn snippet<D: DomTree>(dom: &D, element: D::Node, location: &SourceLocation) -> String {
    let formatted = format_html(&clean_outer_html(dom, element), DEFAULT_INDENT);
    format!("{}\n{}", location.encoded(), formatted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_format_nested() {
        let html = "<div class=\"card\"><h2>Title</h2><ul><li>a</li><li>b</li></ul></div>";
        assert_eq!(
            format_html(html, 2),
            "<div class=\"card\">\n  <h2>Title</h2>\n  <ul>\n    <li>a</li>\n    <li>b</li>\n  </ul>\n</div>"
        );
    }

    #[test]
    fn test_format_self_closing_and_void() {
        let html = "<p><br/><input></p>";
        // `<input>` has no closing tag, so the naive indenter nests the `</p>` under it
        assert_eq!(format_html(html, 2), "<p>\n  <br/>\n  <input>\n  </p>");
    }

    #[test]
    fn test_unbalanced_closing_never_underflows() {
        assert_eq!(format_html("</a></b><c></c>", 4), "</a>\n</b>\n<c>\n</c>");
    }

    #[test]
    fn test_snippet_strips_markers() {
        let mut doc = Document::new();
        let root = doc.root();
        let card = doc.append_element(
            root,
            "section",
            &[("class", "card"), ("data-locatorjs", "/src/Card.tsx:4:6")],
        );
        let title = doc.append_element(card, "h2", &[("data-source-file", "/src/Card.tsx")]);
        doc.append_text(title, "Hi");

        let location = SourceLocation::new("/src/Card.tsx", 4, 6);
        assert_eq!(
            snippet(&doc, card, &location),
            "/src/Card.tsx:4:6\n<section class=\"card\">\n  <h2>Hi</h2>\n</section>"
        );
    }
}
