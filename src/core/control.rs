//! Control loop
//!
//! A single task owns the window coordinator, the routing controller and the
//! UI owners. Commands, the hover probe and window events reach it through a
//! [`ControlHandle`], so every routing decision is made in one place, in
//! arrival order.

mod handle;

pub use handle::{channel, ControlHandle, ControlRequest};

use chrono::Utc;
use std::sync::Arc;

use crate::config::{get_window_config, WIDGET_MARGIN};
use crate::core::coordinator::{WindowBackend, WindowCoordinator};
use crate::core::geometry;
use crate::core::menu_provider::{MenuProvider, SettingsMenuProvider};
use crate::core::owners::{MenuOwner, OrbOwner, Release, ShellOwner, Transition};
use crate::core::persistence::WindowStateStore;
use crate::core::routing::{rule_for, InputRoutingController, Phase, RoutingIntent, RoutingSink};
use crate::shared::emit::EventSink;
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::{AppEvent, ModeChange, SecondaryVisibility};
use crate::shared::settings::AppSettings;
use crate::shared::types::{
    AuthStatus, Bounds, CollapsedSubstate, ComponentId, MenuCloseReason, Point, PointerSample, RoutingMode,
    RoutingOutcome, ShellStatus, UiMode, WindowKind, WindowStatus,
};

/// Collaborators injected into the loop.
pub struct ControlDeps {
    pub backend: Box<dyn WindowBackend>,
    pub events: Box<dyn EventSink>,
    pub store: Box<dyn WindowStateStore>,
    pub menus: Arc<dyn MenuProvider>,
    pub settings: AppSettings,
}

pub struct ControlLoop {
    coordinator: WindowCoordinator,
    routing: InputRoutingController,
    shell: ShellOwner,
    orb: OrbOwner,
    menu: MenuOwner,
    menus: Arc<dyn MenuProvider>,
    role: String,
    events: Box<dyn EventSink>,
    store: Box<dyn WindowStateStore>,
    restored_position: Option<Point>,
    /// Orb rectangle on screen. The widget window is larger while the menu is open.
    orb_bounds: Bounds,
    last_phase: Option<Phase>,
}

impl ControlLoop {
    pub fn new(deps: ControlDeps) -> Self {
        let persisted = deps.store.load();
        let shell = ShellOwner::new();
        let widget = get_window_config(WindowKind::Widget);
        Self {
            coordinator: WindowCoordinator::new(deps.backend, persisted.secondary_bounds),
            routing: InputRoutingController::new(Phase::new(shell.mode())),
            shell,
            orb: OrbOwner::new(deps.settings.interaction),
            menu: MenuOwner::new(),
            menus: deps.menus,
            role: deps.settings.menus.role.clone(),
            events: deps.events,
            store: deps.store,
            restored_position: persisted.widget_position,
            orb_bounds: Bounds::new(0.0, 0.0, widget.width, widget.height),
            last_phase: None,
        }
    }

    /// Current UI mode with the collapsed substate derived from the owners.
    pub fn phase(&self) -> Phase {
        match self.shell.mode() {
            UiMode::Collapsed => {
                let substate = if self.menu.is_open() {
                    CollapsedSubstate::MenuOpen
                } else if self.orb.is_dragging() {
                    CollapsedSubstate::Dragging
                } else if self.orb.pointer_over() {
                    CollapsedSubstate::Hovering
                } else {
                    CollapsedSubstate::Idle
                };
                Phase::collapsed(substate)
            }
            mode => Phase::new(mode),
        }
    }

    pub fn effective_mode(&self, window: WindowKind) -> Option<RoutingMode> {
        self.routing.effective_mode(window)
    }

    pub fn status(&self) -> ShellStatus {
        let phase = self.phase();
        ShellStatus {
            mode: phase.mode,
            substate: phase.substate(),
            role: self.role.clone(),
            menu: self.menu.state().clone(),
            widget: self.window_status(WindowKind::Widget),
            secondary: self.window_status(WindowKind::Secondary),
        }
    }

    fn window_status(&self, kind: WindowKind) -> Option<WindowStatus> {
        self.coordinator
            .status(kind, self.routing.state(kind).last_applied_version)
    }

    /// Re-assert the routing policy of the current phase on every window.
    ///
    /// An intent is issued when the authoritative owner changed or the
    /// effective mode differs from the policy; everything goes through the
    /// routing controller with a fresh version.
    fn reconcile(&mut self) -> AppResult<()> {
        let phase = self.phase();
        let previous = self.last_phase;
        self.routing.set_phase(phase);

        for kind in WindowKind::ALL {
            if !self.coordinator.has_window(kind) {
                continue;
            }
            let rule = rule_for(kind, phase);
            let desired = rule.forced;
            let owner_changed = previous
                .map(|p| rule_for(kind, p).primary() != rule.primary())
                .unwrap_or(true);
            if !owner_changed && self.routing.effective_mode(kind) == Some(desired) {
                continue;
            }

            match self
                .routing
                .request_routing(kind, desired, rule.primary(), &mut self.coordinator)
            {
                Ok(outcome) if !outcome.is_applied() => {
                    log::warn!("[Control] policy intent for {} window not applied: {:?}", kind, outcome);
                }
                Ok(_) => {}
                // The secondary never blocks the widget
                Err(e) if kind == WindowKind::Secondary => {
                    log::error!("[Control] Failed to route secondary window: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        if previous != Some(phase) {
            self.last_phase = Some(phase);
            self.events.publish(AppEvent::ModeChanged(ModeChange {
                mode: phase.mode,
                substate: phase.substate(),
            }));
        }
        Ok(())
    }

    pub fn create_widget_window(&mut self) -> AppResult<WindowStatus> {
        let config = get_window_config(WindowKind::Widget);
        let initial = match self.restored_position {
            Some(p) => Bounds::new(p.x, p.y, config.width, config.height),
            None => geometry::corner_default(config.width, config.height, self.coordinator.screen(), WIDGET_MARGIN),
        };
        let bounds = self.coordinator.create_widget_window(initial)?.bounds;
        if !self.menu.is_open() {
            self.orb_bounds = bounds;
        }
        self.reconcile()?;
        self.window_status(WindowKind::Widget)
            .ok_or(AppError::WindowMissing(WindowKind::Widget))
    }

    /// Second launch: bring the widget back, creating it if it never was.
    pub fn show_widget(&mut self) -> AppResult<WindowStatus> {
        if !self.coordinator.has_window(WindowKind::Widget) {
            return self.create_widget_window();
        }
        self.coordinator.reveal_widget()?;
        self.window_status(WindowKind::Widget)
            .ok_or(AppError::WindowMissing(WindowKind::Widget))
    }

    /// Expand: create or reuse the secondary window and show `route` in it.
    pub fn open_secondary(&mut self, route: &str) -> AppResult<()> {
        if route.trim().is_empty() {
            return Err(AppError::Validation("route must not be empty".to_string()));
        }
        self.shell.begin_expand()?;
        self.orb.cancel();
        self.dismiss_menu();
        self.reconcile()?;

        match self.coordinator.open_secondary(route) {
            Ok(_) => {
                self.shell.finish_expand();
                self.reconcile()?;
                self.publish_visibility();
                Ok(())
            }
            Err(e) => {
                log::error!("[Control] Failed to open secondary window for {}: {}", route, e);
                self.shell.abort_expand(self.coordinator.secondary_visible());
                self.reconcile()?;
                Err(e)
            }
        }
    }

    pub fn navigate_secondary(&mut self, route: &str) -> AppResult<()> {
        self.open_secondary(route)
    }

    /// Collapse: hide the secondary window and give the widget back to the orb.
    pub fn hide_secondary(&mut self) -> AppResult<()> {
        if !self.coordinator.secondary_visible() {
            return Ok(());
        }
        let collapsing = self.shell.begin_collapse();
        if collapsing {
            self.reconcile()?;
        }

        if let Err(e) = self.coordinator.hide_secondary() {
            log::error!("[Control] Failed to hide secondary window: {}", e);
            self.shell.abort_collapse();
            self.reconcile()?;
            return Err(e);
        }

        self.shell.finish_collapse();
        self.reconcile()?;
        self.persist_secondary();
        self.publish_visibility();
        Ok(())
    }

    /// Tear the secondary window down. Only used when quitting.
    pub fn destroy_secondary(&mut self) -> AppResult<()> {
        if self.coordinator.handle(WindowKind::Secondary).is_none() {
            return Ok(());
        }
        self.persist_secondary();
        if self.shell.begin_collapse() {
            self.shell.finish_collapse();
        }
        self.coordinator.destroy_secondary()?;
        self.routing.forget(WindowKind::Secondary);
        self.reconcile()?;
        self.publish_visibility();
        Ok(())
    }

    pub fn request_routing(
        &mut self,
        window: WindowKind,
        mode: RoutingMode,
        source: ComponentId,
        version: Option<u64>,
    ) -> AppResult<RoutingOutcome> {
        let intent = match version {
            Some(version) => RoutingIntent {
                source,
                desired_mode: mode,
                version,
                timestamp: Utc::now(),
            },
            None => self.routing.intent(window, source, mode)?,
        };
        self.routing.submit(window, intent, &mut self.coordinator)
    }

    pub fn reserve_routing_version(&mut self, window: WindowKind) -> AppResult<u64> {
        self.routing.reserve_version(window)
    }

    pub fn set_bounds(&mut self, window: WindowKind, bounds: Bounds) -> AppResult<Bounds> {
        match window {
            WindowKind::Widget => {
                if self.menu.is_open() {
                    return Err(AppError::Validation(
                        "widget bounds are managed by the open menu".to_string(),
                    ));
                }
                let applied = self.coordinator.set_bounds(WindowKind::Widget, bounds)?;
                self.orb_bounds = applied;
                self.persist_widget();
                Ok(applied)
            }
            WindowKind::Secondary => {
                let applied = self.coordinator.set_bounds(WindowKind::Secondary, bounds)?;
                if let Err(e) = self.store.save_secondary_bounds(applied) {
                    log::warn!("[Control] Failed to remember secondary bounds: {}", e);
                }
                Ok(applied)
            }
        }
    }

    /// The user moved or resized the secondary window.
    pub fn secondary_geometry_changed(&mut self, bounds: Bounds) {
        self.coordinator.sync_bounds(WindowKind::Secondary, bounds);
        if let Err(e) = self.store.save_secondary_bounds(bounds) {
            log::warn!("[Control] Failed to remember secondary bounds: {}", e);
        }
    }

    pub fn pointer_down(&mut self, sample: PointerSample) -> AppResult<bool> {
        if self.shell.mode() != UiMode::Collapsed {
            return Ok(false);
        }
        if !self.orb.press(sample, self.orb_bounds, self.menu.is_open()) {
            return Ok(false);
        }
        self.reconcile()?;
        Ok(true)
    }

    pub fn pointer_move(&mut self, sample: PointerSample) -> AppResult<()> {
        if self.shell.mode() != UiMode::Collapsed {
            return Ok(());
        }
        if let Some(target) = self.orb.drag_to(sample.position(), self.coordinator.screen()) {
            self.orb_bounds = self.coordinator.place(WindowKind::Widget, target)?;
        }
        Ok(())
    }

    pub async fn pointer_up(&mut self, sample: PointerSample) -> AppResult<Option<Release>> {
        let Some(release) = self.orb.release(sample) else {
            return Ok(None);
        };
        self.orb
            .set_hover(geometry::orb_hit(self.orb_bounds, sample.position()));

        match release {
            Release::Click if self.shell.mode() == UiMode::Collapsed => self.toggle_menu().await?,
            Release::DragEnd { moved: true } => {
                self.persist_widget();
                self.reconcile()?;
            }
            _ => self.reconcile()?,
        }
        Ok(Some(release))
    }

    /// Hover edge reported by the widget webview or the cursor probe.
    pub fn hover(&mut self, inside: bool) -> AppResult<()> {
        if self.orb.set_hover(inside) {
            self.reconcile()?;
        }
        Ok(())
    }

    /// Cursor position sampled while the widget window passes input through.
    pub fn cursor_moved(&mut self, cursor: Point) -> AppResult<()> {
        if !self.coordinator.has_window(WindowKind::Widget) {
            return Ok(());
        }
        self.hover(geometry::orb_hit(self.orb_bounds, cursor))
    }

    pub async fn toggle_menu(&mut self) -> AppResult<()> {
        if self.menu.is_open() {
            self.close_menu(MenuCloseReason::Toggle)
        } else {
            self.open_menu().await
        }
    }

    pub async fn open_menu(&mut self) -> AppResult<()> {
        if self.shell.mode() != UiMode::Collapsed || self.menu.is_open() || self.orb.is_dragging() {
            return self.reconcile();
        }

        let menus = Arc::clone(&self.menus);
        let items = match menus.menu_items(&self.role).await {
            Ok(items) => items,
            Err(e) => {
                log::warn!("[Menu] Failed to load items for role '{}': {}", self.role, e);
                Vec::new()
            }
        };

        let window = self.menu.open(items, self.orb_bounds, self.coordinator.screen());
        // Capture before the window grows under the pointer
        self.reconcile()?;
        if let Err(e) = self.coordinator.place(WindowKind::Widget, window) {
            log::error!("[Menu] Failed to grow widget window: {}", e);
            self.menu.close();
            self.reconcile()?;
            return Err(e);
        }
        self.publish_menu();
        Ok(())
    }

    pub fn close_menu(&mut self, reason: MenuCloseReason) -> AppResult<()> {
        if !self.menu.is_open() {
            return Ok(());
        }
        log::debug!("[Menu] closing ({:?})", reason);
        self.dismiss_menu();
        self.reconcile()
    }

    /// Open the secondary window on the item's route. The menu hands the
    /// widget straight to the shell, with no pass-through in between.
    pub fn select_menu_item(&mut self, id: &str) -> AppResult<()> {
        let item = self
            .menu
            .item(id)
            .cloned()
            .ok_or_else(|| AppError::Validation(format!("unknown menu item '{}'", id)))?;
        log::info!("[Menu] selected {} -> {}", item.id, item.route);
        self.open_secondary(&item.route)
    }

    pub fn set_auth_status(&mut self, status: AuthStatus) -> AppResult<()> {
        match self.shell.apply_auth(status) {
            Transition::Unchanged => Ok(()),
            Transition::Gated(mode) => {
                log::info!("[Control] gated in {:?}, hiding secondary content", mode);
                self.orb.cancel();
                self.dismiss_menu();
                if self.coordinator.secondary_visible() {
                    match self.coordinator.hide_secondary() {
                        Ok(_) => {
                            self.persist_secondary();
                            self.publish_visibility();
                        }
                        Err(e) => log::error!("[Control] Failed to hide secondary window: {}", e),
                    }
                }
                self.reconcile()
            }
            Transition::Released => self.reconcile(),
        }
    }

    /// Takes effect the next time the menu opens.
    pub fn set_role(&mut self, role: String) -> AppResult<()> {
        if role.trim().is_empty() {
            return Err(AppError::Validation("role must not be empty".to_string()));
        }
        log::info!("[Control] role set to {}", role);
        self.role = role;
        Ok(())
    }

    pub fn apply_settings(&mut self, settings: &AppSettings) -> AppResult<()> {
        settings.validate()?;
        self.orb.set_thresholds(settings.interaction);
        self.menus = Arc::new(SettingsMenuProvider::new(&settings.menus));
        self.role = settings.menus.role.clone();
        Ok(())
    }

    /// Destroy the secondary window and flush persisted state.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.destroy_secondary() {
            log::error!("[Control] Failed to destroy secondary window: {}", e);
        }
        if let Err(e) = self.store.flush() {
            log::error!("[Control] Failed to flush window state: {}", e);
        }
    }

    /// Close the menu and shrink the widget back to the orb, without routing.
    fn dismiss_menu(&mut self) {
        if !self.menu.close() {
            return;
        }
        if let Err(e) = self.coordinator.place(WindowKind::Widget, self.orb_bounds) {
            log::error!("[Menu] Failed to restore widget bounds: {}", e);
        }
        self.publish_menu();
    }

    fn persist_widget(&mut self) {
        let position = self.orb_bounds.origin();
        let result = self
            .store
            .save_widget_position(position)
            .and_then(|_| self.store.flush());
        if let Err(e) = result {
            log::warn!("[Control] Failed to remember widget position: {}", e);
        }
    }

    fn persist_secondary(&mut self) {
        let Some(bounds) = self.coordinator.handle(WindowKind::Secondary).map(|w| w.bounds) else {
            return;
        };
        let result = self
            .store
            .save_secondary_bounds(bounds)
            .and_then(|_| self.store.flush());
        if let Err(e) = result {
            log::warn!("[Control] Failed to remember secondary bounds: {}", e);
        }
    }

    fn publish_menu(&self) {
        self.events
            .publish(AppEvent::MenuStateChanged(self.menu.state().clone()));
    }

    fn publish_visibility(&self) {
        let route = self
            .coordinator
            .handle(WindowKind::Secondary)
            .and_then(|w| w.route.clone());
        self.events
            .publish(AppEvent::SecondaryVisibilityChanged(SecondaryVisibility {
                is_open: self.coordinator.secondary_visible(),
                route,
            }));
    }
}

#[cfg(test)]
impl ControlDeps {
    pub fn for_tests(backend: crate::core::testing::FakeBackend) -> Self {
        use crate::core::testing::{MemoryStore, RecordingEvents};
        let settings = AppSettings::default();
        Self {
            backend: Box::new(backend),
            events: Box::new(RecordingEvents::default()),
            store: Box::new(MemoryStore::default()),
            menus: Arc::new(SettingsMenuProvider::new(&settings.menus)),
            settings,
        }
    }
}
