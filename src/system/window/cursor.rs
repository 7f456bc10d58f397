//! Hover probe
//!
//! A webview that ignores cursor events never sees the pointer arrive over the
//! orb, so the OS cursor is sampled here and fed to the control loop.

use mouse_position::mouse_position::Mouse;
use std::time::Duration;
use tauri::AppHandle;
use tokio::time::MissedTickBehavior;

use crate::config::HOVER_PROBE_INTERVAL_MS;
use crate::core::control::ControlHandle;
use crate::shared::types::Point;

/// Cursor position in logical pixels, if the OS reports one.
pub fn cursor_position(scale_factor: f64) -> Option<Point> {
    match Mouse::get_mouse_position() {
        Mouse::Position { x, y } => Some(Point::new(x as f64 / scale_factor, y as f64 / scale_factor)),
        Mouse::Error => None,
    }
}

fn primary_scale_factor(app: &AppHandle) -> f64 {
    app.primary_monitor()
        .ok()
        .flatten()
        .map(|m| m.scale_factor())
        .unwrap_or(1.0)
}

/// Sample the cursor until the control loop stops. Only movements are forwarded.
pub fn spawn_hover_probe(app: AppHandle, control: ControlHandle) {
    tauri::async_runtime::spawn(async move {
        let scale_factor = primary_scale_factor(&app);
        let mut interval = tokio::time::interval(Duration::from_millis(HOVER_PROBE_INTERVAL_MS));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last = None;

        log::info!("[Probe] Hover probe started (scale {})", scale_factor);
        while !control.is_closed() {
            interval.tick().await;
            let Some(cursor) = cursor_position(scale_factor) else {
                continue;
            };
            if last == Some(cursor) {
                continue;
            }
            last = Some(cursor);
            control.cursor_moved(cursor);
        }
        log::info!("[Probe] Hover probe stopped");
    });
}
