use tauri::State;

use crate::core::control::ControlHandle;
use crate::shared::error::AppResult;
use crate::shared::types::MenuCloseReason;

#[tauri::command]
pub async fn menu_toggle(control: State<'_, ControlHandle>) -> AppResult<()> {
    control.toggle_menu().await
}

/// Open the secondary window on the selected item's route.
#[tauri::command]
pub async fn menu_select(control: State<'_, ControlHandle>, id: String) -> AppResult<()> {
    control.select_menu_item(id).await
}

#[tauri::command]
pub async fn menu_close(control: State<'_, ControlHandle>, reason: MenuCloseReason) -> AppResult<()> {
    control.close_menu(reason).await
}
