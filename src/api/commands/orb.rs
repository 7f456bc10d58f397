//! Pointer input from the collapsed orb.

use tauri::State;

use crate::core::control::ControlHandle;
use crate::shared::error::AppResult;
use crate::shared::types::PointerSample;

/// Returns `true` when the press landed on the orb.
#[tauri::command]
pub async fn orb_pointer_down(control: State<'_, ControlHandle>, sample: PointerSample) -> AppResult<bool> {
    control.pointer_down(sample).await
}

#[tauri::command]
pub async fn orb_pointer_move(control: State<'_, ControlHandle>, sample: PointerSample) -> AppResult<()> {
    control.pointer_move(sample).await
}

#[tauri::command]
pub async fn orb_pointer_up(control: State<'_, ControlHandle>, sample: PointerSample) -> AppResult<()> {
    control.pointer_up(sample).await
}

#[tauri::command]
pub async fn orb_hover(control: State<'_, ControlHandle>, inside: bool) -> AppResult<()> {
    control.hover(inside).await
}
