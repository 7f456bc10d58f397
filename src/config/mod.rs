//! Window configuration registry
//!
//! Centralized window geometry and presentation flags, keyed by window kind,
//! plus the popup menu layout metrics.

use serde::{Deserialize, Serialize};

use crate::shared::types::WindowKind;

/// Window configuration for one of the two shell windows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub transparent: bool,
    pub resizable: bool,
    pub always_on_top: bool,
    /// Page loaded into the webview on creation
    pub entry: String,
}

impl WindowConfig {
    pub fn new(width: f64, height: f64, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            transparent: true,
            resizable: false,
            always_on_top: true,
            entry: "index.html".to_string(),
        }
    }
}

/// Distance kept between the collapsed orb and the screen corner.
pub const WIDGET_MARGIN: f64 = 24.0;

/// Window registry mapping window kinds to configurations
pub fn get_window_config(kind: WindowKind) -> WindowConfig {
    match kind {
        WindowKind::Widget => WindowConfig {
            entry: "index.html?window=widget".to_string(),
            ..WindowConfig::new(64.0, 64.0, "Widget")
        },
        WindowKind::Secondary => WindowConfig {
            transparent: false,
            resizable: true,
            always_on_top: false,
            entry: "index.html?window=secondary".to_string(),
            ..WindowConfig::new(1100.0, 760.0, "Workspace")
        },
    }
}

/// Popup menu surface metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuMetrics {
    pub width: f64,
    pub item_height: f64,
    pub padding: f64,
    /// Space between the orb and the menu surface
    pub gap: f64,
}

impl MenuMetrics {
    pub fn surface_height(&self, item_count: usize) -> f64 {
        self.item_height * item_count.max(1) as f64 + self.padding * 2.0
    }
}

pub const MENU_METRICS: MenuMetrics = MenuMetrics {
    width: 220.0,
    item_height: 36.0,
    padding: 8.0,
    gap: 8.0,
};

/// Fixed set of global terminate combinations.
pub const ESCAPE_HOTKEYS: &[&str] = &["CommandOrControl+Alt+Shift+Q", "CommandOrControl+Alt+Escape"];

/// Grace period between asking the event loop to exit and a hard process exit.
pub const ESCAPE_HARD_EXIT_MS: u64 = 1500;

/// Cursor sampling interval for the hover probe.
pub const HOVER_PROBE_INTERVAL_MS: u64 = 40;
