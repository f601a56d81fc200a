pub mod commands;
pub mod config;
pub mod hook;

use locator_jsx::AttributeMode;
use locator_runtime::EditorProtocol;

/// Name of the configuration file `locator init` writes and commands look for
pub const CONFIG_FILE: &str = "locator.toml";

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Editor {
    Vscode,
    Cursor,
    Zed,
}

impl From<Editor> for EditorProtocol {
    fn from(editor: Editor) -> Self {
        match editor {
            Editor::Vscode => EditorProtocol::VsCode,
            Editor::Cursor => EditorProtocol::Cursor,
            Editor::Zed => EditorProtocol::Zed,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Mode {
    Path,
    Id,
    Split,
}

impl From<Mode> for AttributeMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Path => AttributeMode::Path,
            Mode::Id => AttributeMode::Id,
            Mode::Split => AttributeMode::Split,
        }
    }
}
