//! System integration command module

use crate::shared::error::AppResult;
use crate::shared::types::LogRequest;

/// Log a message from the frontend
#[tauri::command]
pub async fn log_message(request: LogRequest) -> AppResult<()> {
    match request.level.to_lowercase().as_str() {
        "error" => log::error!(target: "webview", "{}", request.message),
        "warn" | "warning" => log::warn!(target: "webview", "{}", request.message),
        "debug" => log::debug!(target: "webview", "{}", request.message),
        "trace" => log::trace!(target: "webview", "{}", request.message),
        _ => log::info!(target: "webview", "{}", request.message),
    }
    Ok(())
}
