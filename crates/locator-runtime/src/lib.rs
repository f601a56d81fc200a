//! Runtime half of the locator: maps rendered elements back to source locations and
//! drives the modifier-key overlay that opens or copies them.

pub mod dom;
pub mod editor;
pub mod host;
pub mod interaction;
pub mod mount;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod snippet;

pub use dom::{Document, DomTree, NodeId};
pub use locator_core::SourceLocation;
pub use editor::EditorProtocol;
pub use host::{Host, MemoryHost};
pub use interaction::{
    accent, Accent, Badge, ClickOutcome, ClickToSource, DisplayState, InteractionState, KeyEvent,
    Mode, Modifier, OverlayOptions, TargetLevel, TOGGLE_ATTRIBUTE,
};
pub use mount::{is_mounted, mount, Mounted, OverlayHandle};
pub use registry::MetadataRegistry;
pub use resolver::{get_target_location, LocationResolver, SourceLocationWithElement, Strategy};
pub use settings::{
    FileStore, MemoryStore, ModifierLocation, Settings, SettingsStore, StorageError,
    UnavailableStore, KEY_LOCATION_LEFT, KEY_LOCATION_RIGHT,
};
pub use snippet::{clean_outer_html, format_html, snippet};
