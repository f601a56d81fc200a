//! Attribute injection for the template block of a single-file component

use locator_core::annotator::escape_attribute;
use locator_core::{
    apply_insertions, AnnotateOptions, Insertion, LineIndex, Result, SourceLocation,
    TransformOutput, ATTR_LOCATOR,
};

use crate::ast::{Attribute, TemplateNode};
use crate::parser::parse_template;
use crate::sfc::parse_sfc;

/// Built-in tags that render no element of their own
pub const DISALLOWED_TAGS: [&str; 9] = [
    "template",
    "slot",
    "component",
    "transition",
    "transition-group",
    "keep-alive",
    "teleport",
    "suspense",
    "Component",
];

fn should_skip(tag: &str, options: &AnnotateOptions) -> bool {
    DISALLOWED_TAGS.contains(&tag) || options.is_ignored(tag)
}

/// Adds a synthetic location attribute to every eligible element of the tree.
///
/// Returns the number of elements that received one.
pub fn annotate_template(
    nodes: &mut [TemplateNode],
    filename: &str,
    options: &AnnotateOptions,
) -> usize {
    let mut count = 0;
    for node in nodes.iter_mut() {
        match node {
            TemplateNode::Element(element) => {
                if !should_skip(&element.tag, options)
                    && !element.has_static_attribute(ATTR_LOCATOR)
                {
                    let location =
                        SourceLocation::new(filename, element.loc.line, element.loc.column);
                    element
                        .attributes
                        .push(Attribute::synthetic(ATTR_LOCATOR, location.encoded()));
                    count += 1;
                }
                count += annotate_template(&mut element.children, filename, options);
            }
            TemplateNode::For(for_node) => {
                count += annotate_template(&mut for_node.children, filename, options);
            }
            TemplateNode::If(if_node) => {
                for branch in &mut if_node.branches {
                    count += annotate_template(&mut branch.children, filename, options);
                }
            }
            TemplateNode::Text(_) | TemplateNode::Interpolation(_) | TemplateNode::Comment(_) => {}
        }
    }
    count
}

/// Turns synthetic attributes into text insertions right after each tag name.
///
/// Offsets are relative to `base`, the start of the template body in the file.
pub fn collect_insertions(
    nodes: &[TemplateNode],
    filename: &str,
    base: usize,
    insertions: &mut Vec<Insertion>,
) {
    for node in nodes {
        match node {
            TemplateNode::Element(element) => {
                let added = element.attributes.iter().find(|a| {
                    a.synthetic
                        && a.name == ATTR_LOCATOR
                        && a.value.as_deref().is_some_and(|v| v.starts_with(filename))
                });
                if let Some(value) = added.and_then(|a| a.value.as_deref()) {
                    insertions.push(Insertion::new(
                        element.loc.offset - base + 1 + element.tag.len(),
                        format!(" {}=\"{}\"", ATTR_LOCATOR, escape_attribute(value)),
                    ));
                }
                collect_insertions(&element.children, filename, base, insertions);
            }
            TemplateNode::For(for_node) => {
                collect_insertions(&for_node.children, filename, base, insertions)
            }
            TemplateNode::If(if_node) => {
                for branch in &if_node.branches {
                    collect_insertions(&branch.children, filename, base, insertions);
                }
            }
            TemplateNode::Text(_) | TemplateNode::Interpolation(_) | TemplateNode::Comment(_) => {}
        }
    }
}

/// Annotates the `<template>` block of a `.vue` file.
///
/// Everything outside the template body is returned byte for byte. Files without a
/// template block, with a non-HTML template language or with markup errors are left
/// alone (`Ok(None)`).
///
/// Lines and columns count from the start of the `.vue` file, not of the template body.
pub fn transform_vue_sfc(code: &str, options: &AnnotateOptions) -> Result<Option<TransformOutput>> {
    let filename = options.require_filename()?;

    let descriptor = match parse_sfc(code, filename) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            tracing::debug!(file = %filename, error = %e, "Skipping component with invalid blocks");
            return Ok(None);
        }
    };
    let Some(block) = descriptor.template else {
        return Ok(None);
    };
    if !block.is_markup() {
        tracing::debug!(file = %filename, lang = ?block.lang(), "Skipping non-HTML template");
        return Ok(None);
    }

    let index = LineIndex::new(code);
    let mut nodes = match parse_template(code, block.content.clone(), &index, filename) {
        Ok(nodes) => nodes,
        Err(e) => {
            tracing::debug!(file = %filename, error = %e, "Skipping template with syntax errors");
            return Ok(None);
        }
    };

    let annotated = annotate_template(&mut nodes, filename, options);
    if annotated == 0 {
        return Ok(None);
    }

    let mut insertions = Vec::with_capacity(annotated);
    collect_insertions(&nodes, filename, block.content.start, &mut insertions);
    let template = apply_insertions(&code[block.content.clone()], insertions);

    tracing::debug!(file = %filename, elements = annotated, "Annotated Vue template");

    let mut output = String::with_capacity(code.len() + template.len() - block.content.len());
    output.push_str(&code[..block.content.start]);
    output.push_str(&template);
    output.push_str(&code[block.content.end..]);
    Ok(Some(TransformOutput::new(output)))
}
