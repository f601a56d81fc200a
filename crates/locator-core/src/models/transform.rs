/// Result of a successful annotation.
///
/// Annotators return `Ok(None)` when nothing had to change; hosts then keep the
/// original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    /// Source map JSON, when the transform produced one
    pub map: Option<String>,
}

impl TransformOutput {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            map: None,
        }
    }
}

/// Per-file input every annotator accepts
#[derive(Debug, Clone, Default)]
pub struct AnnotateOptions {
    /// File identity written into every location
    pub filename: String,
    /// Tag or component names that must not receive an attribute
    pub ignore_component_names: Vec<String>,
}

impl AnnotateOptions {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ignore_component_names: Vec::new(),
        }
    }

    pub fn with_ignore_component_names(mut self, names: Vec<String>) -> Self {
        self.ignore_component_names = names;
        self
    }

    /// Whether the caller asked to skip this name
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_component_names.iter().any(|n| n == name)
    }

    /// Fails with [`crate::LocatorError::MissingFilename`] when no file identity was given
    pub fn require_filename(&self) -> crate::Result<&str> {
        if self.filename.is_empty() {
            return Err(crate::LocatorError::MissingFilename);
        }
        Ok(&self.filename)
    }
}
