use tauri::{AppHandle, Emitter};

use super::events::AppEvent;

/// Destination for events produced by the control loop.
pub trait EventSink: Send {
    fn publish(&self, event: AppEvent);
}

/// Emit an application event to all windows
pub fn emit_event(app: &AppHandle, event: AppEvent) {
    let name = event.name();
    let result = match &event {
        AppEvent::SecondaryVisibilityChanged(visibility) => app.emit(name, visibility),
        AppEvent::MenuStateChanged(menu) => app.emit(name, menu),
        AppEvent::ModeChanged(change) => app.emit(name, change),
        AppEvent::SettingsUpdated(settings) => app.emit(name, settings),
    };

    if let Err(e) = result {
        log::error!("Failed to emit {}: {}", name, e);
    }
}

impl EventSink for AppHandle {
    fn publish(&self, event: AppEvent) {
        emit_event(self, event);
    }
}
