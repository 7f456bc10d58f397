use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tauri::AppHandle;
use tokio::fs;
use ts_rs::TS;

use crate::shared::emit::emit_event;
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::AppEvent;
use crate::shared::types::MenuItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "../ui/settings.ts")]
pub struct AppSettings {
    pub interaction: InteractionSettings,
    pub menus: MenuSettings,
}

/// Thresholds separating a click from a drag on the orb. Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "../ui/settings.ts")]
pub struct InteractionSettings {
    #[ts(type = "number")]
    pub click_threshold_ms: u64,
    pub move_threshold_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "../ui/settings.ts")]
pub struct MenuSettings {
    /// Role of the signed-in user, selects the menu items
    pub role: String,
    pub roles: BTreeMap<String, Vec<MenuItem>>,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            click_threshold_ms: 300,
            move_threshold_px: 5.0,
        }
    }
}

impl Default for MenuSettings {
    fn default() -> Self {
        let member = vec![
            MenuItem::new("tasks", "Tasks", "/tasks"),
            MenuItem::new("inbox", "Inbox", "/inbox"),
            MenuItem::new("calendar", "Calendar", "/calendar"),
            MenuItem::new("settings", "Settings", "/settings"),
        ];
        let mut admin = member.clone();
        admin.insert(3, MenuItem::new("reports", "Reports", "/reports"));

        let mut roles = BTreeMap::new();
        roles.insert("member".to_string(), member);
        roles.insert("admin".to_string(), admin);

        Self {
            role: "member".to_string(),
            roles,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            interaction: InteractionSettings::default(),
            menus: MenuSettings::default(),
        }
    }
}

impl AppSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "antigravity", "widget-shell")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Settings("Failed to determine config directory".to_string()))
    }

    pub async fn load() -> AppResult<Self> {
        Self::load_from(&Self::get_settings_path()?).await
    }

    /// Reads settings from `path`, writing defaults there on first run.
    pub async fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            let settings = Self::default();
            settings.save_to(path).await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.interaction.click_threshold_ms == 0 {
            return Err(AppError::Validation("click_threshold_ms must be positive".to_string()));
        }
        if !(self.interaction.move_threshold_px > 0.0) {
            return Err(AppError::Validation("move_threshold_px must be positive".to_string()));
        }
        Ok(())
    }

    /// Internal helper to save to disk without emission
    async fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Io(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .await
            .map_err(|e| AppError::Io(format!("Failed to write settings file: {}", e)))
    }

    /// Save settings to disk and emit update event
    pub async fn save(&self, app: &AppHandle) -> AppResult<()> {
        self.validate()?;
        self.save_to(&Self::get_settings_path()?).await?;
        emit_event(app, AppEvent::SettingsUpdated(self.clone()));
        Ok(())
    }
}
