//! Global shortcut registration for the emergency escape.

use std::sync::Arc;
use std::time::Duration;
use tauri::AppHandle;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

use crate::config::ESCAPE_HARD_EXIT_MS;
use crate::core::escape::{HotkeyBackend, Terminate};
use crate::shared::error::{AppError, AppResult};

pub struct GlobalShortcutBackend<'a> {
    app: &'a AppHandle,
}

impl<'a> GlobalShortcutBackend<'a> {
    pub fn new(app: &'a AppHandle) -> Self {
        Self { app }
    }
}

impl HotkeyBackend for GlobalShortcutBackend<'_> {
    fn register(&mut self, accelerator: &str, on_press: Terminate) -> AppResult<()> {
        let shortcut: Shortcut = accelerator
            .parse()
            .map_err(|e| AppError::Hotkey(format!("Invalid shortcut '{}': {}", accelerator, e)))?;

        // Stale registration from a crashed run would make on_shortcut fail
        if let Err(e) = self.app.global_shortcut().unregister(shortcut) {
            log::debug!("[Escape] Nothing to unregister for {}: {}", accelerator, e);
        }

        self.app
            .global_shortcut()
            .on_shortcut(shortcut, move |_app, _shortcut, event| {
                // Only trigger on KeyPress, ignore KeyRelease
                if event.state() == ShortcutState::Pressed {
                    on_press();
                }
            })
            .map_err(|e| AppError::Hotkey(e.to_string()))
    }
}

/// Ask the event loop to exit, with a hard process exit if that stalls.
pub fn escape_terminator(app: AppHandle) -> Terminate {
    Arc::new(move || {
        log::warn!("[Escape] Emergency escape pressed, terminating");
        std::thread::spawn(|| {
            std::thread::sleep(Duration::from_millis(ESCAPE_HARD_EXIT_MS));
            log::error!("[Escape] Graceful exit timed out, forcing process exit");
            std::process::exit(0);
        });
        app.exit(0);
    })
}
