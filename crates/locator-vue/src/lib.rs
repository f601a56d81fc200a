//! Vue single-file component annotator.
//!
//! The `<template>` block is parsed into its own tree, every eligible element gets a
//! synthetic location attribute, and the attributes are written back as textual
//! insertions so the rest of the file keeps its exact bytes.

pub mod ast;
pub mod parser;
pub mod sfc;
pub mod transform;

pub use ast::{Attribute, ElementNode, ForNode, IfBranch, IfNode, NodePosition, TemplateNode};
pub use parser::parse_template;
pub use sfc::{parse_sfc, SfcBlock, SfcDescriptor};
pub use transform::{annotate_template, collect_insertions, transform_vue_sfc, DISALLOWED_TAGS};

use locator_core::{AnnotateOptions, Annotator, Result, TransformOutput};

/// [`Annotator`] front for `.vue` files
#[derive(Debug, Default, Clone, Copy)]
pub struct VueAnnotator;

impl Annotator for VueAnnotator {
    fn dialect(&self) -> &'static str {
        "vue"
    }

    fn accepts(&self, filename: &str, _source: &str) -> bool {
        filename.ends_with(".vue")
    }

    fn annotate(&self, source: &str, options: &AnnotateOptions) -> Result<Option<TransformOutput>> {
        transform_vue_sfc(source, options)
    }
}
