//! Window lifecycle command module
//!
//! Creation, visibility and geometry of the widget and secondary windows.

use tauri::State;

use crate::core::control::ControlHandle;
use crate::shared::error::AppResult;
use crate::shared::types::{Bounds, ShellStatus, WindowKind, WindowStatus};

/// Create the widget window. Idempotent.
#[tauri::command]
pub async fn create_widget_window(control: State<'_, ControlHandle>) -> AppResult<WindowStatus> {
    control.create_widget_window().await
}

#[tauri::command]
pub async fn open_secondary(control: State<'_, ControlHandle>, route: String) -> AppResult<()> {
    control.open_secondary(route).await
}

#[tauri::command]
pub async fn navigate_secondary(control: State<'_, ControlHandle>, route: String) -> AppResult<()> {
    control.navigate_secondary(route).await
}

/// Hide (never destroy) the secondary window and collapse to the orb.
#[tauri::command]
pub async fn hide_secondary(control: State<'_, ControlHandle>) -> AppResult<()> {
    control.hide_secondary().await
}

/// Bounds are clamped to the screen; the applied bounds are returned.
#[tauri::command]
pub async fn set_bounds(control: State<'_, ControlHandle>, window: WindowKind, bounds: Bounds) -> AppResult<Bounds> {
    control.set_bounds(window, bounds).await
}

#[tauri::command]
pub async fn get_status(control: State<'_, ControlHandle>) -> AppResult<ShellStatus> {
    control.status().await
}
