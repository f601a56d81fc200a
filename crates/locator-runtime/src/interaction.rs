//! Modifier-key driven interaction controller.
//!
//! Holding the navigate key (Control) or the copy key (Meta) activates the overlay;
//! Alt switches the target from the element to its parent component. A click while
//! active either opens the resolved location in the editor or copies a snippet.

use std::fmt;

use locator_core::SourceLocation;

use crate::dom::DomTree;
use crate::editor::EditorProtocol;
use crate::host::Host;
use crate::resolver::{get_target_location, LocationResolver};
use crate::settings::{
    self, ModifierLocation, Settings, SettingsStore, EDITOR_PROTOCOL_KEY, HIGHLIGHT_ENABLED_KEY,
    MODIFIER_LOCATION_KEY,
};
use crate::snippet::snippet;

/// Marker attribute of the overlay's own highlight toggle
pub const TOGGLE_ATTRIBUTE: &str = "data-cts-toggle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Copy key
    Meta,
    /// Navigate key
    Control,
    /// Parent-level key
    Alt,
}

impl Modifier {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Meta" => Some(Self::Meta),
            "Control" => Some(Self::Control),
            "Alt" => Some(Self::Alt),
            _ => None,
        }
    }
}

/// Keyboard event as delivered by the host (`KeyboardEvent.key` / `.location`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub location: u32,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, location: u32) -> Self {
        Self {
            key: key.into(),
            location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Editor,
    Copy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLevel {
    Element,
    Parent,
}

impl TargetLevel {
    pub fn wants_parent(&self) -> bool {
        matches!(self, Self::Parent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Inactive,
    Active { mode: Mode, level: TargetLevel },
}

/// What a click resolved to; anything but `PassThrough` must be intercepted
/// (default prevented, propagation stopped)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    PassThrough,
    Copied {
        location: SourceLocation,
        snippet: String,
    },
    Opened {
        location: SourceLocation,
        uri: String,
    },
}

impl ClickOutcome {
    pub fn intercepted(&self) -> bool {
        !matches!(self, Self::PassThrough)
    }
}

/// Colour shades of the current (mode, level) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accent {
    pub base: &'static str,
    pub dark: &'static str,
    pub light: &'static str,
}

pub fn accent(mode: Mode, level: TargetLevel) -> Accent {
    match (mode, level) {
        (Mode::Copy, TargetLevel::Parent) => Accent {
            base: "#47B379",
            dark: "#2D7A52",
            light: "#E8F5ED",
        },
        (Mode::Copy, TargetLevel::Element) => Accent {
            base: "#E57A2E",
            dark: "#B35D1C",
            light: "#FEF3E8",
        },
        (Mode::Editor, TargetLevel::Parent) => Accent {
            base: "#4A8FD4",
            dark: "#3468A0",
            light: "#E8F0F8",
        },
        (Mode::Editor, TargetLevel::Element) => Accent {
            base: "#715CC7",
            dark: "#5244A3",
            light: "#EDE8F5",
        },
    }
}

/// Badge content for the element the pointer resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge<N> {
    pub element: N,
    pub location: SourceLocation,
    /// `tag#id.firstClass`
    pub tag_info: String,
    /// `Element`, `Parent`, with ` + Copy` in copy mode
    pub mode_label: String,
    /// Last two path segments and the line
    pub file_label: String,
}

/// Everything the visual layer needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState<N> {
    pub mode: Mode,
    pub level: TargetLevel,
    pub accent: Accent,
    pub highlight_enabled: bool,
    /// Pointer position for the crosshair, when highlighting
    pub crosshair: Option<(f64, f64)>,
    pub badge: Option<Badge<N>>,
}

type Callback = Box<dyn FnMut()>;

/// Construction options; explicit values override stored preferences
pub struct OverlayOptions {
    pub editor_protocol: Option<EditorProtocol>,
    pub modifier_location: Option<ModifierLocation>,
    /// Whether commit gestures are intercepted at all
    pub intercept_clicks: bool,
    pub on_activate: Option<Callback>,
    pub on_deactivate: Option<Callback>,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            editor_protocol: None,
            modifier_location: None,
            intercept_clicks: true,
            on_activate: None,
            on_deactivate: None,
        }
    }
}

impl fmt::Debug for OverlayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayOptions")
            .field("editor_protocol", &self.editor_protocol)
            .field("modifier_location", &self.modifier_location)
            .field("intercept_clicks", &self.intercept_clicks)
            .field("on_activate", &self.on_activate.is_some())
            .field("on_deactivate", &self.on_deactivate.is_some())
            .finish()
    }
}

impl OverlayOptions {
    pub fn with_editor_protocol(mut self, protocol: EditorProtocol) -> Self {
        self.editor_protocol = Some(protocol);
        self
    }

    pub fn with_modifier_location(mut self, location: ModifierLocation) -> Self {
        self.modifier_location = Some(location);
        self
    }

    pub fn on_activate(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_activate = Some(Box::new(callback));
        self
    }

    pub fn on_deactivate(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_deactivate = Some(Box::new(callback));
        self
    }
}

pub struct ClickToSource<H: Host, S: SettingsStore> {
    settings: Settings,
    store: S,
    resolver: LocationResolver,
    intercept_clicks: bool,
    state: InteractionState,
    meta_down: bool,
    ctrl_down: bool,
    alt_down: bool,
    mouse: (f64, f64),
    hovered: Option<H::Node>,
    on_activate: Option<Callback>,
    on_deactivate: Option<Callback>,
}

impl<H: Host, S: SettingsStore> ClickToSource<H, S> {
    pub fn new(options: OverlayOptions, store: S) -> Self {
        let mut settings = Settings::load(&store);
        if let Some(protocol) = options.editor_protocol {
            settings.editor_protocol = protocol;
        }
        if let Some(location) = options.modifier_location {
            settings.modifier_location = location;
        }

        Self {
            settings,
            store,
            resolver: LocationResolver::new(),
            intercept_clicks: options.intercept_clicks,
            state: InteractionState::Inactive,
            meta_down: false,
            ctrl_down: false,
            alt_down: false,
            mouse: (0.0, 0.0),
            hovered: None,
            on_activate: options.on_activate,
            on_deactivate: options.on_deactivate,
        }
    }

    pub fn with_resolver(mut self, resolver: LocationResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn resolver_mut(&mut self) -> &mut LocationResolver {
        &mut self.resolver
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, InteractionState::Active { .. })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn hovered(&self) -> Option<H::Node> {
        self.hovered
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_editor_protocol(&mut self, protocol: EditorProtocol) {
        self.settings.editor_protocol = protocol;
        settings::write(&mut self.store, EDITOR_PROTOCOL_KEY, protocol.as_str());
    }

    pub fn set_modifier_location(&mut self, location: ModifierLocation) {
        self.settings.modifier_location = location;
        settings::write(&mut self.store, MODIFIER_LOCATION_KEY, location.as_str());
    }

    /// Flips the highlight layer and persists the new value
    pub fn toggle_highlight(&mut self) -> bool {
        self.settings.highlight_enabled = !self.settings.highlight_enabled;
        let value = if self.settings.highlight_enabled { "true" } else { "false" };
        settings::write(&mut self.store, HIGHLIGHT_ENABLED_KEY, value);
        self.settings.highlight_enabled
    }

    pub fn handle_key_down(&mut self, host: &H, event: &KeyEvent) {
        self.handle_key(host, event, true);
    }

    pub fn handle_key_up(&mut self, host: &H, event: &KeyEvent) {
        self.handle_key(host, event, false);
    }

    fn handle_key(&mut self, host: &H, event: &KeyEvent, down: bool) {
        if !self.settings.modifier_location.matches(event.location) {
            return;
        }
        match Modifier::from_key(&event.key) {
            Some(Modifier::Meta) => self.meta_down = down,
            Some(Modifier::Control) => self.ctrl_down = down,
            Some(Modifier::Alt) => self.alt_down = down,
            None => {}
        }
        self.update_state(host);
    }

    pub fn handle_mouse_move(&mut self, host: &H, x: f64, y: f64, target: Option<H::Node>) {
        self.mouse = (x, y);
        if self.is_active() && self.settings.highlight_enabled {
            self.hovered = target.and_then(|node| host.nearest_element(node));
        }
    }

    /// Window focus loss: forget every held key and deactivate
    pub fn handle_blur(&mut self) {
        self.meta_down = false;
        self.ctrl_down = false;
        self.alt_down = false;
        if self.is_active() {
            self.deactivate();
        }
    }

    /// Commit gesture (click or context menu)
    pub fn handle_click(&mut self, host: &mut H, target: Option<H::Node>) -> ClickOutcome {
        if !self.intercept_clicks || !(self.meta_down || self.ctrl_down) {
            return ClickOutcome::PassThrough;
        }

        let target = match target {
            Some(node) => host.nearest_element(node),
            None => self.hovered,
        };
        let Some(target) = target else {
            return ClickOutcome::PassThrough;
        };
        if host.closest_with_attribute(target, TOGGLE_ATTRIBUTE).is_some() {
            return ClickOutcome::PassThrough;
        }

        let locations = self.resolver.get_all_source_locations(&*host, target);
        let Some(chosen) = get_target_location(&locations, self.alt_down) else {
            return ClickOutcome::PassThrough;
        };
        let location = chosen.location.clone();

        if self.meta_down {
            let text = snippet(&*host, chosen.element, &location);
            host.write_clipboard(&text);
            tracing::info!(location = %location, "Copied snippet to clipboard");
            ClickOutcome::Copied {
                location,
                snippet: text,
            }
        } else {
            let uri = self.settings.editor_protocol.uri(&location);
            host.navigate(&uri);
            tracing::debug!(uri = %uri, "Opening location in editor");
            ClickOutcome::Opened { location, uri }
        }
    }

    /// Frame description for the visual layer, `None` while inactive
    pub fn display(&self, host: &H) -> Option<DisplayState<H::Node>> {
        let InteractionState::Active { mode, level } = self.state else {
            return None;
        };
        let highlight = self.settings.highlight_enabled;

        let badge = self.hovered.filter(|_| highlight).and_then(|hovered| {
            let locations = self.resolver.get_all_source_locations(host, hovered);
            let chosen = get_target_location(&locations, level.wants_parent())?;
            Some(Badge {
                element: chosen.element,
                location: chosen.location.clone(),
                tag_info: tag_info(host, chosen.element),
                mode_label: mode_label(mode, level),
                file_label: file_label(&chosen.location),
            })
        });

        Some(DisplayState {
            mode,
            level,
            accent: accent(mode, level),
            highlight_enabled: highlight,
            crosshair: highlight.then_some(self.mouse),
            badge,
        })
    }

    fn update_state(&mut self, host: &H) {
        let held = self.meta_down || self.ctrl_down;
        let mode = if self.meta_down { Mode::Copy } else { Mode::Editor };
        let level = if self.alt_down {
            TargetLevel::Parent
        } else {
            TargetLevel::Element
        };

        match (self.state, held) {
            (InteractionState::Inactive, true) => {
                self.state = InteractionState::Active { mode, level };
                if self.settings.highlight_enabled {
                    let (x, y) = self.mouse;
                    if let Some(element) = host
                        .element_from_point(x, y)
                        .and_then(|node| host.nearest_element(node))
                    {
                        self.hovered = Some(element);
                    }
                }
                if let Some(callback) = self.on_activate.as_mut() {
                    callback();
                }
            }
            (InteractionState::Active { .. }, false) => self.deactivate(),
            (InteractionState::Active { .. }, true) => {
                self.state = InteractionState::Active { mode, level };
            }
            (InteractionState::Inactive, false) => {}
        }
    }

    fn deactivate(&mut self) {
        self.state = InteractionState::Inactive;
        if let Some(callback) = self.on_deactivate.as_mut() {
            callback();
        }
    }
}

fn tag_info<D: DomTree>(dom: &D, element: D::Node) -> String {
    let mut info = dom.tag_name(element);
    if let Some(id) = dom.attribute(element, "id").filter(|id| !id.is_empty()) {
        info.push('#');
        info.push_str(&id);
    }
    if let Some(class) = dom
        .attribute(element, "class")
        .and_then(|class| class.split_whitespace().next().map(str::to_string))
    {
        info.push('.');
        info.push_str(&class);
    }
    info
}

fn mode_label(mode: Mode, level: TargetLevel) -> String {
    let base = match level {
        TargetLevel::Parent => "Parent",
        TargetLevel::Element => "Element",
    };
    match mode {
        Mode::Copy => format!("{} + Copy", base),
        Mode::Editor => base.to_string(),
    }
}

fn file_label(location: &SourceLocation) -> String {
    let segments: Vec<&str> = location.file.split('/').collect();
    let tail = &segments[segments.len().saturating_sub(2)..];
    format!("{}:{}", tail.join("/"), location.line)
}
