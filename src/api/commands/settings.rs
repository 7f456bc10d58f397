//! Settings command module
//!
//! Handles application settings persistence.

use tauri::State;

use crate::core::control::ControlHandle;
use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;

/// Get current application settings
#[tauri::command]
pub async fn get_settings() -> AppResult<AppSettings> {
    AppSettings::load().await
}

/// Save settings, notify the webviews and apply them to the running shell
#[tauri::command]
pub async fn save_settings(
    app_handle: tauri::AppHandle,
    control: State<'_, ControlHandle>,
    settings: AppSettings,
) -> AppResult<()> {
    settings.save(&app_handle).await?;
    control.apply_settings(settings).await
}
