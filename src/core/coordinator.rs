//! Window coordinator
//!
//! Owns creation, visibility and geometry of the widget and secondary windows.
//! The OS side lives behind [`WindowBackend`] so the lifecycle rules (one widget
//! window, lazily created secondary that is hidden rather than destroyed) are
//! enforced in one place.

use crate::config::{get_window_config, WindowConfig};
use crate::core::geometry;
use crate::core::routing::RoutingSink;
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{Bounds, RoutingMode, ScreenSize, WindowKind, WindowStatus};

/// Everything a backend needs to build one window.
#[derive(Debug, Clone)]
pub struct WindowSpec {
    pub kind: WindowKind,
    pub label: String,
    pub config: WindowConfig,
    pub bounds: Bounds,
    pub route: Option<String>,
}

impl WindowSpec {
    /// Page to load, with the initial route for the secondary window.
    pub fn entry_url(&self) -> String {
        match &self.route {
            Some(route) => format!("{}&route={}", self.config.entry, urlencoding::encode(route)),
            None => self.config.entry.clone(),
        }
    }
}

/// OS window operations. Implemented over Tauri in `system::window`.
pub trait WindowBackend: Send {
    fn screen_size(&self) -> ScreenSize;
    fn create(&mut self, spec: &WindowSpec) -> AppResult<()>;
    fn show(&mut self, kind: WindowKind) -> AppResult<()>;
    fn hide(&mut self, kind: WindowKind) -> AppResult<()>;
    fn destroy(&mut self, kind: WindowKind) -> AppResult<()>;
    fn set_bounds(&mut self, kind: WindowKind, bounds: Bounds) -> AppResult<()>;
    fn set_always_on_top(&mut self, kind: WindowKind, on_top: bool) -> AppResult<()>;
    fn navigate(&mut self, kind: WindowKind, route: &str) -> AppResult<()>;
    fn set_pass_through(&mut self, kind: WindowKind, pass_through: bool) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowHandle {
    pub id: String,
    pub kind: WindowKind,
    pub bounds: Bounds,
    pub visible: bool,
    pub always_on_top: bool,
    pub transparent: bool,
    /// Mode last pushed to the OS
    pub applied_mode: Option<RoutingMode>,
    pub route: Option<String>,
}

impl WindowHandle {
    fn from_spec(spec: &WindowSpec) -> Self {
        Self {
            id: spec.label.clone(),
            kind: spec.kind,
            bounds: spec.bounds,
            visible: false,
            always_on_top: spec.config.always_on_top,
            transparent: spec.config.transparent,
            applied_mode: None,
            route: spec.route.clone(),
        }
    }
}

pub struct WindowCoordinator {
    backend: Box<dyn WindowBackend>,
    widget: Option<WindowHandle>,
    secondary: Option<WindowHandle>,
    /// Last user placement of the secondary window
    secondary_bounds: Option<Bounds>,
}

impl WindowCoordinator {
    pub fn new(backend: Box<dyn WindowBackend>, secondary_bounds: Option<Bounds>) -> Self {
        Self {
            backend,
            widget: None,
            secondary: None,
            secondary_bounds,
        }
    }

    pub fn screen(&self) -> ScreenSize {
        self.backend.screen_size()
    }

    pub fn handle(&self, kind: WindowKind) -> Option<&WindowHandle> {
        match kind {
            WindowKind::Widget => self.widget.as_ref(),
            WindowKind::Secondary => self.secondary.as_ref(),
        }
    }

    fn handle_mut(&mut self, kind: WindowKind) -> Option<&mut WindowHandle> {
        match kind {
            WindowKind::Widget => self.widget.as_mut(),
            WindowKind::Secondary => self.secondary.as_mut(),
        }
    }

    pub fn secondary_visible(&self) -> bool {
        self.secondary.as_ref().map(|w| w.visible).unwrap_or(false)
    }

    /// Create and show the widget window. Later calls return the existing handle.
    pub fn create_widget_window(&mut self, initial: Bounds) -> AppResult<&WindowHandle> {
        if self.widget.is_none() {
            let spec = WindowSpec {
                kind: WindowKind::Widget,
                label: WindowKind::Widget.label().to_string(),
                config: get_window_config(WindowKind::Widget),
                bounds: geometry::clamp_to_screen(initial, self.screen()),
                route: None,
            };
            self.backend.create(&spec).map_err(|e| creation_error(WindowKind::Widget, e))?;
            let mut handle = WindowHandle::from_spec(&spec);
            self.backend.show(WindowKind::Widget)?;
            handle.visible = true;
            log::info!("[Window] Widget window created at {:?}", handle.bounds);
            self.widget = Some(handle);
        }
        self.widget
            .as_ref()
            .ok_or(AppError::WindowMissing(WindowKind::Widget))
    }

    /// Show the existing widget window again and put it back on top.
    pub fn reveal_widget(&mut self) -> AppResult<()> {
        let widget = self
            .widget
            .as_mut()
            .ok_or(AppError::WindowMissing(WindowKind::Widget))?;
        self.backend.show(WindowKind::Widget)?;
        widget.visible = true;
        self.keep_widget_on_top();
        Ok(())
    }

    /// Create the secondary window if absent, navigate it to `route` and show it.
    ///
    /// Returns `true` when the window was created by this call.
    pub fn open_secondary(&mut self, route: &str) -> AppResult<bool> {
        let created = if self.secondary.is_none() {
            let config = get_window_config(WindowKind::Secondary);
            let bounds = match self.secondary_bounds {
                Some(last) => geometry::clamp_to_screen(last, self.screen()),
                None => geometry::centered(config.width, config.height, self.screen()),
            };
            let spec = WindowSpec {
                kind: WindowKind::Secondary,
                label: WindowKind::Secondary.label().to_string(),
                config,
                bounds,
                route: Some(route.to_string()),
            };
            self.backend
                .create(&spec)
                .map_err(|e| creation_error(WindowKind::Secondary, e))?;
            self.secondary = Some(WindowHandle::from_spec(&spec));
            log::info!("[Window] Secondary window created for {}", route);
            true
        } else {
            self.backend.navigate(WindowKind::Secondary, route)?;
            false
        };

        if let Some(secondary) = self.secondary.as_mut() {
            secondary.route = Some(route.to_string());
            if !secondary.visible {
                self.backend.show(WindowKind::Secondary)?;
                secondary.visible = true;
            }
        }
        self.keep_widget_on_top();
        Ok(created)
    }

    /// Default close: hide and keep the window for reuse.
    pub fn hide_secondary(&mut self) -> AppResult<bool> {
        match self.secondary.as_mut() {
            Some(secondary) if secondary.visible => {
                self.backend.hide(WindowKind::Secondary)?;
                secondary.visible = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Quit only.
    pub fn destroy_secondary(&mut self) -> AppResult<()> {
        if self.secondary.take().is_some() {
            self.backend.destroy(WindowKind::Secondary)?;
            log::info!("[Window] Secondary window destroyed");
        }
        Ok(())
    }

    /// Move/resize a window, clamped to the screen.
    ///
    /// A pure resize of the widget keeps its corner-biased anchoring.
    pub fn set_bounds(&mut self, kind: WindowKind, bounds: Bounds) -> AppResult<Bounds> {
        let screen = self.screen();
        let current = self
            .handle(kind)
            .map(|w| w.bounds)
            .ok_or(AppError::WindowMissing(kind))?;

        let target = if kind == WindowKind::Widget
            && bounds.origin() == current.origin()
            && !bounds.same_size(&current)
        {
            geometry::corner_biased_resize(current, bounds.width, bounds.height, screen)
        } else {
            geometry::clamp_to_screen(bounds, screen)
        };

        if target != current {
            self.backend.set_bounds(kind, target)?;
        }
        if let Some(window) = self.handle_mut(kind) {
            window.bounds = target;
        }
        if kind == WindowKind::Secondary {
            self.secondary_bounds = Some(target);
        }
        Ok(target)
    }

    /// Place a window at exactly `bounds` (clamped), without corner anchoring.
    /// Used for drags and for growing the widget around the menu.
    pub fn place(&mut self, kind: WindowKind, bounds: Bounds) -> AppResult<Bounds> {
        let target = geometry::clamp_to_screen(bounds, self.screen());
        let current = self
            .handle(kind)
            .map(|w| w.bounds)
            .ok_or(AppError::WindowMissing(kind))?;
        if target != current {
            self.backend.set_bounds(kind, target)?;
        }
        self.sync_bounds(kind, target);
        Ok(target)
    }

    /// Record geometry the OS already applied (user move/resize of the secondary).
    pub fn sync_bounds(&mut self, kind: WindowKind, bounds: Bounds) {
        if let Some(window) = self.handle_mut(kind) {
            window.bounds = bounds;
        }
        if kind == WindowKind::Secondary {
            self.secondary_bounds = Some(bounds);
        }
    }

    pub fn status(&self, kind: WindowKind, last_applied_version: u64) -> Option<WindowStatus> {
        self.handle(kind).map(|w| WindowStatus {
            id: w.id.clone(),
            kind: w.kind,
            bounds: w.bounds,
            visible: w.visible,
            always_on_top: w.always_on_top,
            transparent: w.transparent,
            effective_mode: w.applied_mode,
            last_applied_version,
            route: w.route.clone(),
        })
    }

    fn keep_widget_on_top(&mut self) {
        if self.widget.is_some() {
            if let Err(e) = self.backend.set_always_on_top(WindowKind::Widget, true) {
                log::warn!("[Window] Failed to keep widget on top: {}", e);
            }
        }
    }
}

impl RoutingSink for WindowCoordinator {
    fn has_window(&self, window: WindowKind) -> bool {
        self.handle(window).is_some()
    }

    fn apply_routing(&mut self, window: WindowKind, mode: RoutingMode) -> AppResult<()> {
        let handle = self
            .handle(window)
            .ok_or(AppError::WindowMissing(window))?;
        if handle.applied_mode == Some(mode) {
            return Ok(());
        }
        self.backend
            .set_pass_through(window, mode == RoutingMode::PassThrough)?;
        if let Some(handle) = self.handle_mut(window) {
            handle.applied_mode = Some(mode);
        }
        Ok(())
    }
}

fn creation_error(kind: WindowKind, err: AppError) -> AppError {
    match err {
        AppError::WindowCreation { .. } => err,
        other => AppError::WindowCreation {
            kind,
            reason: other.to_string(),
        },
    }
}
