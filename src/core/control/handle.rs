use std::ops::ControlFlow;
use tokio::sync::{mpsc, oneshot};

use super::ControlLoop;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;
use crate::shared::types::{
    AuthStatus, Bounds, ComponentId, MenuCloseReason, Point, PointerSample, RoutingMode, RoutingOutcome,
    ShellStatus, WindowKind, WindowStatus,
};

type Reply<T> = oneshot::Sender<AppResult<T>>;

pub enum ControlRequest {
    CreateWidget(Reply<WindowStatus>),
    ShowWidget(Reply<WindowStatus>),
    OpenSecondary {
        route: String,
        reply: Reply<()>,
    },
    NavigateSecondary {
        route: String,
        reply: Reply<()>,
    },
    HideSecondary(Reply<()>),
    DestroySecondary(Reply<()>),
    RequestRouting {
        window: WindowKind,
        mode: RoutingMode,
        source: ComponentId,
        version: Option<u64>,
        reply: Reply<RoutingOutcome>,
    },
    ReserveVersion {
        window: WindowKind,
        reply: Reply<u64>,
    },
    SetBounds {
        window: WindowKind,
        bounds: Bounds,
        reply: Reply<Bounds>,
    },
    Status(Reply<ShellStatus>),
    PointerDown {
        sample: PointerSample,
        reply: Reply<bool>,
    },
    PointerMove {
        sample: PointerSample,
        reply: Reply<()>,
    },
    PointerUp {
        sample: PointerSample,
        reply: Reply<()>,
    },
    Hover {
        inside: bool,
        reply: Reply<()>,
    },
    /// Sampled by the cursor probe; no reply
    CursorMoved(Point),
    ToggleMenu(Reply<()>),
    CloseMenu {
        reason: MenuCloseReason,
        reply: Reply<()>,
    },
    SelectMenuItem {
        id: String,
        reply: Reply<()>,
    },
    SetAuthStatus {
        status: AuthStatus,
        reply: Reply<()>,
    },
    SetRole {
        role: String,
        reply: Reply<()>,
    },
    ApplySettings {
        settings: Box<AppSettings>,
        reply: Reply<()>,
    },
    /// The user moved or resized the secondary window; no reply
    SecondaryGeometry(Bounds),
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable sender side of the control loop, kept in Tauri managed state.
#[derive(Clone)]
pub struct ControlHandle {
    tx: mpsc::UnboundedSender<ControlRequest>,
}

pub fn channel() -> (ControlHandle, mpsc::UnboundedReceiver<ControlRequest>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ControlHandle { tx }, rx)
}

impl ControlHandle {
    async fn call<T>(&self, make: impl FnOnce(Reply<T>) -> ControlRequest) -> AppResult<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .map_err(|_| AppError::ControlUnavailable)?;
        rx.await.map_err(|_| AppError::ControlUnavailable)?
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn notify(&self, request: ControlRequest) {
        if self.tx.send(request).is_err() {
            log::debug!("[Control] loop stopped, dropping notification");
        }
    }

    pub async fn create_widget_window(&self) -> AppResult<WindowStatus> {
        self.call(ControlRequest::CreateWidget).await
    }

    pub async fn show_widget(&self) -> AppResult<WindowStatus> {
        self.call(ControlRequest::ShowWidget).await
    }

    pub async fn open_secondary(&self, route: String) -> AppResult<()> {
        self.call(|reply| ControlRequest::OpenSecondary { route, reply }).await
    }

    pub async fn navigate_secondary(&self, route: String) -> AppResult<()> {
        self.call(|reply| ControlRequest::NavigateSecondary { route, reply })
            .await
    }

    pub async fn hide_secondary(&self) -> AppResult<()> {
        self.call(ControlRequest::HideSecondary).await
    }

    pub async fn destroy_secondary(&self) -> AppResult<()> {
        self.call(ControlRequest::DestroySecondary).await
    }

    pub async fn request_routing(
        &self,
        window: WindowKind,
        mode: RoutingMode,
        source: ComponentId,
        version: Option<u64>,
    ) -> AppResult<RoutingOutcome> {
        self.call(|reply| ControlRequest::RequestRouting {
            window,
            mode,
            source,
            version,
            reply,
        })
        .await
    }

    pub async fn reserve_routing_version(&self, window: WindowKind) -> AppResult<u64> {
        self.call(|reply| ControlRequest::ReserveVersion { window, reply })
            .await
    }

    pub async fn set_bounds(&self, window: WindowKind, bounds: Bounds) -> AppResult<Bounds> {
        self.call(|reply| ControlRequest::SetBounds { window, bounds, reply })
            .await
    }

    pub async fn status(&self) -> AppResult<ShellStatus> {
        self.call(ControlRequest::Status).await
    }

    pub async fn pointer_down(&self, sample: PointerSample) -> AppResult<bool> {
        self.call(|reply| ControlRequest::PointerDown { sample, reply })
            .await
    }

    pub async fn pointer_move(&self, sample: PointerSample) -> AppResult<()> {
        self.call(|reply| ControlRequest::PointerMove { sample, reply })
            .await
    }

    pub async fn pointer_up(&self, sample: PointerSample) -> AppResult<()> {
        self.call(|reply| ControlRequest::PointerUp { sample, reply })
            .await
    }

    pub async fn hover(&self, inside: bool) -> AppResult<()> {
        self.call(|reply| ControlRequest::Hover { inside, reply }).await
    }

    pub fn cursor_moved(&self, cursor: Point) {
        self.notify(ControlRequest::CursorMoved(cursor));
    }

    pub async fn toggle_menu(&self) -> AppResult<()> {
        self.call(ControlRequest::ToggleMenu).await
    }

    pub async fn close_menu(&self, reason: MenuCloseReason) -> AppResult<()> {
        self.call(|reply| ControlRequest::CloseMenu { reason, reply }).await
    }

    pub async fn select_menu_item(&self, id: String) -> AppResult<()> {
        self.call(|reply| ControlRequest::SelectMenuItem { id, reply }).await
    }

    pub async fn set_auth_status(&self, status: AuthStatus) -> AppResult<()> {
        self.call(|reply| ControlRequest::SetAuthStatus { status, reply })
            .await
    }

    pub async fn set_role(&self, role: String) -> AppResult<()> {
        self.call(|reply| ControlRequest::SetRole { role, reply }).await
    }

    pub async fn apply_settings(&self, settings: AppSettings) -> AppResult<()> {
        self.call(|reply| ControlRequest::ApplySettings {
            settings: Box::new(settings),
            reply,
        })
        .await
    }

    pub fn secondary_geometry_changed(&self, bounds: Bounds) {
        self.notify(ControlRequest::SecondaryGeometry(bounds));
    }

    /// Stop the loop after destroying the secondary and flushing state.
    pub async fn shutdown(&self) {
        let (done, rx) = oneshot::channel();
        if self.tx.send(ControlRequest::Shutdown(done)).is_ok() {
            let _ = rx.await;
        }
    }
}

impl ControlLoop {
    /// Process requests until shutdown or until every handle is dropped.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<ControlRequest>) {
        log::info!("[Control] loop started");
        while let Some(request) = rx.recv().await {
            if self.dispatch(request).await.is_break() {
                break;
            }
        }
        log::info!("[Control] loop stopped");
    }

    async fn dispatch(&mut self, request: ControlRequest) -> ControlFlow<()> {
        match request {
            ControlRequest::CreateWidget(reply) => {
                let _ = reply.send(self.create_widget_window());
            }
            ControlRequest::ShowWidget(reply) => {
                let _ = reply.send(self.show_widget());
            }
            ControlRequest::OpenSecondary { route, reply } => {
                let _ = reply.send(self.open_secondary(&route));
            }
            ControlRequest::NavigateSecondary { route, reply } => {
                let _ = reply.send(self.navigate_secondary(&route));
            }
            ControlRequest::HideSecondary(reply) => {
                let _ = reply.send(self.hide_secondary());
            }
            ControlRequest::DestroySecondary(reply) => {
                let _ = reply.send(self.destroy_secondary());
            }
            ControlRequest::RequestRouting {
                window,
                mode,
                source,
                version,
                reply,
            } => {
                let _ = reply.send(self.request_routing(window, mode, source, version));
            }
            ControlRequest::ReserveVersion { window, reply } => {
                let _ = reply.send(self.reserve_routing_version(window));
            }
            ControlRequest::SetBounds { window, bounds, reply } => {
                let _ = reply.send(self.set_bounds(window, bounds));
            }
            ControlRequest::Status(reply) => {
                let _ = reply.send(Ok(self.status()));
            }
            ControlRequest::PointerDown { sample, reply } => {
                let _ = reply.send(self.pointer_down(sample));
            }
            ControlRequest::PointerMove { sample, reply } => {
                let _ = reply.send(self.pointer_move(sample));
            }
            ControlRequest::PointerUp { sample, reply } => {
                let result = self.pointer_up(sample).await.map(|_| ());
                let _ = reply.send(result);
            }
            ControlRequest::Hover { inside, reply } => {
                let _ = reply.send(self.hover(inside));
            }
            ControlRequest::CursorMoved(cursor) => {
                if let Err(e) = self.cursor_moved(cursor) {
                    log::warn!("[Control] hover update failed: {}", e);
                }
            }
            ControlRequest::ToggleMenu(reply) => {
                let result = self.toggle_menu().await;
                let _ = reply.send(result);
            }
            ControlRequest::CloseMenu { reason, reply } => {
                let _ = reply.send(self.close_menu(reason));
            }
            ControlRequest::SelectMenuItem { id, reply } => {
                let _ = reply.send(self.select_menu_item(&id));
            }
            ControlRequest::SetAuthStatus { status, reply } => {
                let _ = reply.send(self.set_auth_status(status));
            }
            ControlRequest::SetRole { role, reply } => {
                let _ = reply.send(self.set_role(role));
            }
            ControlRequest::ApplySettings { settings, reply } => {
                let _ = reply.send(self.apply_settings(&settings));
            }
            ControlRequest::SecondaryGeometry(bounds) => {
                self.secondary_geometry_changed(bounds);
            }
            ControlRequest::Shutdown(done) => {
                self.shutdown();
                let _ = done.send(());
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}
