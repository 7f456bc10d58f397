use tauri::State;

use crate::core::control::ControlHandle;
use crate::shared::error::AppResult;
use crate::shared::types::{ComponentId, RoutingMode, RoutingOutcome, WindowKind};

/// Submit a routing intent. Without `version` the next one is allocated on arrival.
#[tauri::command]
pub async fn request_routing(
    control: State<'_, ControlHandle>,
    window: WindowKind,
    mode: RoutingMode,
    source: ComponentId,
    version: Option<u64>,
) -> AppResult<RoutingOutcome> {
    control.request_routing(window, mode, source, version).await
}

/// Reserve a version at decision time, to be submitted later with `request_routing`.
#[tauri::command]
pub async fn reserve_routing_version(control: State<'_, ControlHandle>, window: WindowKind) -> AppResult<u64> {
    control.reserve_routing_version(window).await
}
