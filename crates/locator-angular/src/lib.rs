//! Angular template annotator: standalone `.html` templates and inline `template:`
//! literals of `@Component` classes.

pub mod component;
pub mod template;

pub use component::{transform_angular_component, COMPONENT_MARKER};
pub use template::{transform_angular_template, SKIP_ELEMENTS};

use locator_core::{AnnotateOptions, Annotator, Result, TransformOutput};

/// Dispatches on the file suffix: `.html` is a standalone template, `.ts` containing
/// the decorator marker carries inline templates, anything else is left alone.
pub fn transform_angular_file(
    code: &str,
    options: &AnnotateOptions,
) -> Result<Option<TransformOutput>> {
    let filename = options.require_filename()?;

    if filename.ends_with(".html") {
        return transform_angular_template(code, options);
    }
    if filename.ends_with(".ts") && code.contains(COMPONENT_MARKER) {
        return transform_angular_component(code, options);
    }
    Ok(None)
}

/// [`Annotator`] front for the Angular scanner
#[derive(Debug, Default, Clone, Copy)]
pub struct AngularAnnotator;

impl Annotator for AngularAnnotator {
    fn dialect(&self) -> &'static str {
        "angular"
    }

    fn accepts(&self, filename: &str, source: &str) -> bool {
        filename.ends_with(".html") || (filename.ends_with(".ts") && source.contains(COMPONENT_MARKER))
    }

    fn annotate(&self, source: &str, options: &AnnotateOptions) -> Result<Option<TransformOutput>> {
        transform_angular_file(source, options)
    }
}
