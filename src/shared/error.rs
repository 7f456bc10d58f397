use serde::Serialize;
use thiserror::Error;

use super::types::WindowKind;

#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("I/O Error: {0}")]
    Io(String),

    /// The OS refused to create a window. Fatal for that window only.
    #[error("Failed to create {kind} window: {reason}")]
    WindowCreation { kind: WindowKind, reason: String },

    #[error("{0} window does not exist")]
    WindowMissing(WindowKind),

    #[error("Window Error: {0}")]
    Window(String),

    #[error("Hotkey Error: {0}")]
    Hotkey(String),

    #[error("Settings Error: {0}")]
    Settings(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Control loop is not running")]
    ControlUnavailable,

    #[error("Unknown Error: {0}")]
    Unknown(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Settings(format!("Serialization error: {}", err))
    }
}

impl From<tauri::Error> for AppError {
    fn from(err: tauri::Error) -> Self {
        AppError::Window(err.to_string())
    }
}

impl From<tauri_plugin_store::Error> for AppError {
    fn from(err: tauri_plugin_store::Error) -> Self {
        AppError::Io(format!("Store error: {}", err))
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Unknown(err)
    }
}

// Helper for Tauri Result
pub type AppResult<T> = Result<T, AppError>;
