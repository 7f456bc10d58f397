//! Tauri implementation of [`WindowBackend`].

use tauri::{
    AppHandle, Emitter, EventTarget, LogicalPosition, LogicalSize, Manager, WebviewUrl, WebviewWindow,
    WebviewWindowBuilder, WindowEvent,
};

use crate::core::control::ControlHandle;
use crate::core::coordinator::{WindowBackend, WindowSpec};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{Bounds, ScreenSize, WindowKind};

/// Sent to the secondary webview when it should switch route in place.
pub const NAVIGATE_EVENT: &str = "shell://navigate";

const FALLBACK_SCREEN: ScreenSize = ScreenSize {
    width: 1920.0,
    height: 1080.0,
};

pub struct TauriWindowBackend {
    app: AppHandle,
    control: ControlHandle,
}

impl TauriWindowBackend {
    pub fn new(app: AppHandle, control: ControlHandle) -> Self {
        Self { app, control }
    }

    fn window(&self, kind: WindowKind) -> AppResult<WebviewWindow> {
        self.app
            .get_webview_window(kind.label())
            .ok_or(AppError::WindowMissing(kind))
    }

    /// The widget lives for the whole process; only quitting removes it.
    fn guard_widget(&self, window: &WebviewWindow) {
        window.on_window_event(|event| {
            if let WindowEvent::CloseRequested { api, .. } = event {
                api.prevent_close();
                log::info!("[Window] Ignoring close request on the widget window");
            }
        });
    }

    /// Registered once at creation: closing hides, user geometry is reported back.
    fn watch_secondary(&self, window: &WebviewWindow) {
        let control = self.control.clone();
        let tracked = window.clone();
        window.on_window_event(move |event| match event {
            WindowEvent::CloseRequested { api, .. } => {
                api.prevent_close();
                let control = control.clone();
                tauri::async_runtime::spawn(async move {
                    if let Err(e) = control.hide_secondary().await {
                        log::error!("[Window] Failed to hide secondary on close: {}", e);
                    }
                });
            }
            WindowEvent::Moved(_) | WindowEvent::Resized(_) => {
                if let Some(bounds) = logical_bounds(&tracked) {
                    control.secondary_geometry_changed(bounds);
                }
            }
            _ => {}
        });
    }
}

fn logical_bounds(window: &WebviewWindow) -> Option<Bounds> {
    let scale = window.scale_factor().ok()?;
    let position = window.outer_position().ok()?.to_logical::<f64>(scale);
    let size = window.inner_size().ok()?.to_logical::<f64>(scale);
    Some(Bounds::new(position.x, position.y, size.width, size.height))
}

impl WindowBackend for TauriWindowBackend {
    fn screen_size(&self) -> ScreenSize {
        match self.app.primary_monitor() {
            Ok(Some(monitor)) => {
                let size = monitor.size().to_logical::<f64>(monitor.scale_factor());
                ScreenSize::new(size.width, size.height)
            }
            Ok(None) => {
                log::warn!("[Window] No primary monitor found, assuming {:?}", FALLBACK_SCREEN);
                FALLBACK_SCREEN
            }
            Err(e) => {
                log::warn!("[Window] Failed to query primary monitor: {}", e);
                FALLBACK_SCREEN
            }
        }
    }

    fn create(&mut self, spec: &WindowSpec) -> AppResult<()> {
        let url = WebviewUrl::App(spec.entry_url().into());
        // Start hidden so the window is fully configured before it appears
        let mut builder = WebviewWindowBuilder::new(&self.app, &spec.label, url)
            .title(&spec.config.title)
            .inner_size(spec.bounds.width, spec.bounds.height)
            .position(spec.bounds.x, spec.bounds.y)
            .resizable(spec.config.resizable)
            .always_on_top(spec.config.always_on_top)
            .focused(spec.kind == WindowKind::Secondary)
            .visible(false);

        if spec.config.transparent {
            builder = builder
                .transparent(true)
                .decorations(false)
                .shadow(false)
                .skip_taskbar(true);
        }

        let window = builder.build().map_err(|e| AppError::WindowCreation {
            kind: spec.kind,
            reason: e.to_string(),
        })?;

        match spec.kind {
            WindowKind::Widget => self.guard_widget(&window),
            WindowKind::Secondary => self.watch_secondary(&window),
        }
        log::debug!("[Window] Built '{}' ({})", spec.label, spec.entry_url());
        Ok(())
    }

    fn show(&mut self, kind: WindowKind) -> AppResult<()> {
        let window = self.window(kind)?;
        window.show()?;
        if kind == WindowKind::Secondary {
            window.set_focus()?;
        }
        Ok(())
    }

    fn hide(&mut self, kind: WindowKind) -> AppResult<()> {
        self.window(kind)?.hide()?;
        Ok(())
    }

    fn destroy(&mut self, kind: WindowKind) -> AppResult<()> {
        self.window(kind)?.destroy()?;
        Ok(())
    }

    fn set_bounds(&mut self, kind: WindowKind, bounds: Bounds) -> AppResult<()> {
        let window = self.window(kind)?;
        window.set_position(LogicalPosition::new(bounds.x, bounds.y))?;
        window.set_size(LogicalSize::new(bounds.width, bounds.height))?;
        Ok(())
    }

    fn set_always_on_top(&mut self, kind: WindowKind, on_top: bool) -> AppResult<()> {
        self.window(kind)?.set_always_on_top(on_top)?;
        Ok(())
    }

    fn navigate(&mut self, kind: WindowKind, route: &str) -> AppResult<()> {
        self.app
            .emit_to(EventTarget::webview_window(kind.label()), NAVIGATE_EVENT, route.to_string())?;
        Ok(())
    }

    fn set_pass_through(&mut self, kind: WindowKind, pass_through: bool) -> AppResult<()> {
        self.window(kind)?.set_ignore_cursor_events(pass_through)?;
        Ok(())
    }
}
