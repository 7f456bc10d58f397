use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// A screen-space point in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings.ts")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Window rectangle in logical pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings.ts")]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn with_origin(&self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }

    pub fn same_size(&self, other: &Bounds) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Bounds) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings.ts")]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

impl ScreenSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../ui/bindings.ts")]
pub enum WindowKind {
    Widget,
    Secondary,
}

impl WindowKind {
    pub const ALL: [WindowKind; 2] = [WindowKind::Widget, WindowKind::Secondary];

    /// Tauri window label
    pub fn label(&self) -> &'static str {
        match self {
            WindowKind::Widget => "widget-window",
            WindowKind::Secondary => "secondary-window",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowKind::Widget => write!(f, "widget"),
            WindowKind::Secondary => write!(f, "secondary"),
        }
    }
}

/// OS-level input routing for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../ui/bindings.ts")]
pub enum RoutingMode {
    /// Clicks reach whatever is behind the window.
    PassThrough,
    /// The window receives input normally.
    Capture,
}

/// UI components allowed to submit routing intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../ui/bindings.ts")]
pub enum ComponentId {
    Widget,
    Menu,
    Shell,
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::Widget => write!(f, "widget"),
            ComponentId::Menu => write!(f, "menu"),
            ComponentId::Shell => write!(f, "shell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../ui/bindings.ts")]
pub enum UiMode {
    Unauthenticated,
    AuthLoading,
    Collapsed,
    Expanding,
    Expanded,
    Collapsing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../ui/bindings.ts")]
pub enum CollapsedSubstate {
    Idle,
    Hovering,
    Dragging,
    MenuOpen,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings.ts")]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub route: String,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            route: route.into(),
        }
    }
}

/// Popup menu state as rendered by the widget webview.
///
/// `anchor` is the top-left corner of the menu surface and `orb_offset` the
/// top-left corner of the orb, both relative to the widget window origin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings.ts")]
pub struct MenuState {
    pub open: bool,
    pub anchor: Point,
    pub orb_offset: Point,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../ui/bindings.ts")]
pub enum MenuCloseReason {
    OutsideClick,
    Cancel,
    Selection,
    Toggle,
}

/// Auth signal published by the external auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings.ts")]
pub struct AuthStatus {
    pub auth_loading: bool,
    pub authenticated: bool,
}

/// Pointer event reported by the widget webview, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings.ts")]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    /// DOM `event.timeStamp` in milliseconds, fractional
    pub timestamp_ms: f64,
}

impl PointerSample {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Result of a routing request. Rejections are defined no-ops, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[ts(export, export_to = "../ui/bindings.ts")]
pub enum RoutingOutcome {
    Applied {
        #[ts(type = "number")]
        version: u64,
        mode: RoutingMode,
    },
    Stale {
        #[ts(type = "number")]
        version: u64,
        #[ts(type = "number")]
        last_applied: u64,
    },
    OwnershipViolation {
        source: ComponentId,
        owner: ComponentId,
    },
    PolicyViolation {
        requested: RoutingMode,
        forced: RoutingMode,
    },
    /// The version was never handed out for this window.
    UnallocatedVersion {
        #[ts(type = "number")]
        version: u64,
        #[ts(type = "number")]
        latest: u64,
    },
}

impl RoutingOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RoutingOutcome::Applied { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings.ts")]
pub struct WindowStatus {
    pub id: String,
    pub kind: WindowKind,
    pub bounds: Bounds,
    pub visible: bool,
    pub always_on_top: bool,
    pub transparent: bool,
    pub effective_mode: Option<RoutingMode>,
    #[ts(type = "number")]
    pub last_applied_version: u64,
    pub route: Option<String>,
}

/// Snapshot returned by `get_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings.ts")]
pub struct ShellStatus {
    pub mode: UiMode,
    pub substate: Option<CollapsedSubstate>,
    pub role: String,
    pub menu: MenuState,
    pub widget: Option<WindowStatus>,
    pub secondary: Option<WindowStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/bindings.ts")]
pub struct LogRequest {
    pub level: String,
    pub message: String,
}
