use std::fmt;
use std::str::FromStr;

use locator_core::SourceLocation;
use serde::{Deserialize, Serialize};

/// Editor whose URI handler receives navigation requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorProtocol {
    #[default]
    VsCode,
    Cursor,
    Zed,
}

impl EditorProtocol {
    pub const ALL: [EditorProtocol; 3] = [Self::VsCode, Self::Cursor, Self::Zed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VsCode => "vscode",
            Self::Cursor => "cursor",
            Self::Zed => "zed",
        }
    }

    /// Human-readable name for settings menus
    pub fn label(&self) -> &'static str {
        match self {
            Self::VsCode => "VS Code",
            Self::Cursor => "Cursor",
            Self::Zed => "Zed",
        }
    }

    /// URI that opens the location in this editor.
    ///
    /// VS Code and Cursor take `scheme://file/<path>`, Zed takes `zed://file<path>`.
    pub fn uri(&self, location: &SourceLocation) -> String {
        let SourceLocation { file, line, column } = location;
        match self {
            Self::VsCode | Self::Cursor => {
                format!("{}://file/{}:{}:{}", self.as_str(), file, line, column)
            }
            Self::Zed => format!("zed://file{}:{}:{}", file, line, column),
        }
    }
}

impl fmt::Display for EditorProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vscode" => Ok(Self::VsCode),
            "cursor" => Ok(Self::Cursor),
            "zed" => Ok(Self::Zed),
            other => Err(format!("unknown editor protocol '{}'", other)),
        }
    }
}
