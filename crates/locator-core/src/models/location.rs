use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a renderable element in its original source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// File path (absolute or project-relative)
    pub file: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (0-based)
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// The `file:line:column` form used in attributes, URIs and snippets
    pub fn encoded(&self) -> String {
        crate::encoding::encode(&self.file, self.line, self.column)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_encoded() {
        let location = SourceLocation::new("C:\\src\\App.tsx", 12, 4);
        assert_eq!(location.to_string(), "C:\\src\\App.tsx:12:4");
        assert_eq!(location.to_string(), location.encoded());
    }
}
