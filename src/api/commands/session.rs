//! Signals from the auth layer.

use tauri::State;

use crate::core::control::ControlHandle;
use crate::shared::error::AppResult;
use crate::shared::types::AuthStatus;

#[tauri::command]
pub async fn set_auth_status(control: State<'_, ControlHandle>, status: AuthStatus) -> AppResult<()> {
    control.set_auth_status(status).await
}

/// Role of the signed-in user; selects the menu items.
#[tauri::command]
pub async fn set_role(control: State<'_, ControlHandle>, role: String) -> AppResult<()> {
    control.set_role(role).await
}
