use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocatorError>;

/// Errors raised while annotating a source file
#[derive(Debug, Error)]
pub enum LocatorError {
    /// The host invoked an annotator without a file identity.
    /// This is a misconfiguration of the integration, never a per-file problem.
    #[error("no filename available for the file being transformed")]
    MissingFilename,

    /// Script source could not be parsed
    #[error("failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    /// Template markup could not be parsed
    #[error("invalid template in {file}: {message}")]
    Template { file: String, message: String },

    /// Invalid or inconsistent configuration
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to serialize file metadata: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LocatorError {
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn template(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Whether the error must abort the build instead of degrading to a pass-through
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingFilename)
    }
}
