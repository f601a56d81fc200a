//! Top-level block splitter for `.vue` files

use std::ops::Range;

use locator_core::{LocatorError, Result};

use crate::ast::Attribute;
use crate::parser::{find_end_tag, read_open_tag};

/// One top-level block (`<template>`, `<script>`, `<style>` or a custom block)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfcBlock {
    pub kind: String,
    pub attributes: Vec<Attribute>,
    /// Byte range of the block body, between the opening and the closing tag
    pub content: Range<usize>,
}

impl SfcBlock {
    pub fn lang(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == "lang")
            .and_then(|a| a.value.as_deref())
    }

    /// Whether the body is plain HTML-like template markup
    pub fn is_markup(&self) -> bool {
        matches!(self.lang(), None | Some("html"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SfcDescriptor {
    pub template: Option<SfcBlock>,
    pub scripts: Vec<SfcBlock>,
    pub styles: Vec<SfcBlock>,
    pub custom_blocks: Vec<SfcBlock>,
}

/// Splits a single-file component into its top-level blocks
pub fn parse_sfc(source: &str, filename: &str) -> Result<SfcDescriptor> {
    let error = |message: String| LocatorError::template(filename, message);
    let mut descriptor = SfcDescriptor::default();
    let mut pos = 0;

    while let Some(found) = source[pos..].find('<') {
        let start = pos + found;
        let rest = &source[start..];

        if rest.starts_with("<!--") {
            let close = rest
                .find("-->")
                .ok_or_else(|| error(format!("unterminated comment at offset {}", start)))?;
            pos = start + close + 3;
            continue;
        }

        let Some(tag) = read_open_tag(source, start, source.len()).map_err(error)? else {
            pos = start + 1;
            continue;
        };

        let content_start = tag.end;
        let (content_end, after) = if tag.self_closing {
            (content_start, content_start)
        } else if tag.name == "template" {
            find_template_end(source, content_start)
                .ok_or_else(|| error("element <template> is missing end tag".to_string()))?
        } else {
            let close = find_end_tag(source, content_start, source.len(), &tag.name)
                .ok_or_else(|| error(format!("element <{}> is missing end tag", tag.name)))?;
            let after = source[close..]
                .find('>')
                .map(|i| close + i + 1)
                .unwrap_or(source.len());
            (close, after)
        };

        let block = SfcBlock {
            kind: tag.name,
            attributes: tag.attributes,
            content: content_start..content_end,
        };
        match block.kind.as_str() {
            "template" => {
                if descriptor.template.is_some() {
                    return Err(error(
                        "a single file component can contain only one <template> block".to_string(),
                    ));
                }
                descriptor.template = Some(block);
            }
            "script" => descriptor.scripts.push(block),
            "style" => descriptor.styles.push(block),
            _ => descriptor.custom_blocks.push(block),
        }
        pos = after;
    }

    Ok(descriptor)
}

/// Finds the `</template>` matching a top-level `<template>` whose body starts at `from`,
/// skipping nested `<template>` elements. Returns `(body end, offset past the end tag)`.
fn find_template_end(source: &str, from: usize) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    let mut pos = from;

    while let Some(found) = source[pos..].find('<') {
        let start = pos + found;
        let rest = &source[start..];

        if rest.starts_with("<!--") {
            pos = start + rest.find("-->")? + 3;
        } else if is_tag_named(rest, "</template") {
            depth -= 1;
            let after = start + rest.find('>')? + 1;
            if depth == 0 {
                return Some((start, after));
            }
            pos = after;
        } else if is_tag_named(rest, "<template") {
            let tag = read_open_tag(source, start, source.len()).ok()??;
            if !tag.self_closing {
                depth += 1;
            }
            pos = tag.end;
        } else {
            pos = start + 1;
        }
    }
    None
}

fn is_tag_named(text: &str, prefix: &str) -> bool {
    text.starts_with(prefix)
        && text[prefix.len()..]
            .bytes()
            .next()
            .is_some_and(|b| b == b'>' || b == b'/' || b.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_blocks() {
        let source = "<script setup>\nconst a = '<template>'\n</script>\n\n<template>\n  <div />\n</template>\n\n<style scoped>\n.a { }\n</style>\n";
        let descriptor = parse_sfc(source, "A.vue").unwrap();
        let template = descriptor.template.unwrap();
        assert_eq!(&source[template.content.clone()], "\n  <div />\n");
        assert_eq!(descriptor.scripts.len(), 1);
        assert_eq!(descriptor.styles.len(), 1);
        assert!(descriptor.styles[0]
            .attributes
            .iter()
            .any(|a| a.name == "scoped"));
    }

    #[test]
    fn test_nested_template_elements() {
        let source = "<template><template v-if=\"a\"><p/></template><template #x /></template><i18n>{}</i18n>";
        let descriptor = parse_sfc(source, "B.vue").unwrap();
        let template = descriptor.template.unwrap();
        assert_eq!(
            &source[template.content],
            "<template v-if=\"a\"><p/></template><template #x />"
        );
        assert_eq!(descriptor.custom_blocks[0].kind, "i18n");
    }

    #[test]
    fn test_no_template_block() {
        let descriptor = parse_sfc("<script>export default {}</script>", "C.vue").unwrap();
        assert!(descriptor.template.is_none());
    }

    #[test]
    fn test_duplicate_template_is_error() {
        assert!(parse_sfc("<template></template><template></template>", "D.vue").is_err());
    }

    #[test]
    fn test_unclosed_template_is_error() {
        assert!(parse_sfc("<template><div></div>", "E.vue").is_err());
    }

    #[test]
    fn test_template_lang() {
        let descriptor = parse_sfc("<template lang=\"pug\">div</template>", "F.vue").unwrap();
        assert!(!descriptor.template.unwrap().is_markup());
    }
}
