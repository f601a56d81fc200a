use crate::models::{AnnotateOptions, SourceLocation, TransformOutput};

/// A dialect-specific transform that injects location attributes into one file.
///
/// Implementations return `Ok(None)` when the file needs no change (nothing eligible,
/// everything already annotated, no template block). Any `Err` other than
/// [`crate::LocatorError::MissingFilename`] is recovered by the host, which then keeps
/// the original source.
pub trait Annotator {
    /// Short dialect name used in log fields
    fn dialect(&self) -> &'static str;

    /// Whether this annotator understands the given file
    fn accepts(&self, filename: &str, source: &str) -> bool;

    fn annotate(&self, source: &str, options: &AnnotateOptions)
        -> crate::Result<Option<TransformOutput>>;
}

/// Element that qualified for annotation while a file was being traversed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedElement {
    pub name: String,
    pub location: SourceLocation,
    /// Byte offset in the original text where the attribute goes
    pub insert_at: usize,
}

impl AnnotatedElement {
    /// ` name="value"` ready to be spliced after the tag name or before the tag close
    pub fn attribute_text(&self, attribute: &str) -> String {
        format!(" {}=\"{}\"", attribute, escape_attribute(&self.location.encoded()))
    }
}

/// Escapes a value for a double-quoted markup attribute
pub fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
