use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::settings::AppSettings;
use super::types::{CollapsedSubstate, MenuState, UiMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../ui/events.ts")]
pub struct SecondaryVisibility {
    pub is_open: bool,
    pub route: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../ui/events.ts")]
pub struct ModeChange {
    pub mode: UiMode,
    pub substate: Option<CollapsedSubstate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "payload")] // Tagged enum for easier frontend parsing
#[ts(export, export_to = "../ui/events.ts")]
pub enum AppEvent {
    #[serde(rename = "secondary-window://visibility-changed")]
    SecondaryVisibilityChanged(SecondaryVisibility),

    #[serde(rename = "menu://state-changed")]
    MenuStateChanged(MenuState),

    #[serde(rename = "shell://mode-changed")]
    ModeChanged(ModeChange),

    #[serde(rename = "settings://updated")]
    SettingsUpdated(AppSettings),
}

impl AppEvent {
    /// Tauri event name, kept in sync with the serde tags above.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::SecondaryVisibilityChanged(_) => "secondary-window://visibility-changed",
            AppEvent::MenuStateChanged(_) => "menu://state-changed",
            AppEvent::ModeChanged(_) => "shell://mode-changed",
            AppEvent::SettingsUpdated(_) => "settings://updated",
        }
    }
}
