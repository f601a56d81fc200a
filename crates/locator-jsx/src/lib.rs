//! JSX / TSX annotator built on the swc parser.
//!
//! Attributes are spliced into the original text at positions taken from the syntax
//! tree, so formatting and comments survive untouched.

pub mod disallow;
pub mod parser;
pub mod transform;

mod context;

pub use disallow::{is_disallowed_component, DISALLOWED_NAMES};
pub use parser::{parse_source, syntax_for, ParsedModule};
pub use transform::{
    registry_statement, transform_jsx, AttributeMode, JsxOptions, SplitOptions, REGISTRY_GLOBAL,
};

use locator_core::{AnnotateOptions, Annotator, Result, TransformOutput};

const SCRIPT_EXTENSIONS: [&str; 4] = [".js", ".jsx", ".ts", ".tsx"];

/// [`Annotator`] front for script files containing JSX
#[derive(Debug, Clone, Default)]
pub struct JsxAnnotator {
    pub options: JsxOptions,
}

impl JsxAnnotator {
    pub fn new(options: JsxOptions) -> Self {
        Self { options }
    }
}

impl Annotator for JsxAnnotator {
    fn dialect(&self) -> &'static str {
        "jsx"
    }

    fn accepts(&self, filename: &str, _source: &str) -> bool {
        SCRIPT_EXTENSIONS.iter().any(|ext| filename.ends_with(ext))
    }

    fn annotate(&self, source: &str, options: &AnnotateOptions) -> Result<Option<TransformOutput>> {
        transform_jsx(source, options, &self.options)
    }
}
