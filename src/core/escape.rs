//! Emergency escape: global key combinations that terminate the app.
//!
//! Handlers run on the hotkey thread and never touch the control loop, so the
//! escape works whatever the windows' routing state is.

use std::sync::Arc;

use crate::shared::error::AppResult;

pub type Terminate = Arc<dyn Fn() + Send + Sync>;

pub trait HotkeyBackend {
    fn register(&mut self, accelerator: &str, on_press: Terminate) -> AppResult<()>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EscapeReport {
    pub registered: Vec<String>,
    pub failed: Vec<String>,
}

pub struct EscapeRegistrar {
    bindings: Vec<String>,
}

impl EscapeRegistrar {
    pub fn new(bindings: &[&str]) -> Self {
        Self {
            bindings: bindings.iter().map(|b| b.to_string()).collect(),
        }
    }

    /// Register every binding. A binding the OS refuses is logged and skipped.
    pub fn register_all(&self, backend: &mut dyn HotkeyBackend, terminate: Terminate) -> EscapeReport {
        let mut report = EscapeReport::default();
        for binding in &self.bindings {
            match backend.register(binding, terminate.clone()) {
                Ok(()) => {
                    log::info!("[Escape] Registered {}", binding);
                    report.registered.push(binding.clone());
                }
                Err(e) => {
                    log::error!("[Escape] Failed to register {}: {}", binding, e);
                    report.failed.push(binding.clone());
                }
            }
        }
        if report.registered.is_empty() {
            log::error!("[Escape] No emergency escape binding is active");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ESCAPE_HOTKEYS;
    use crate::core::control::{ControlDeps, ControlLoop};
    use crate::core::testing::{FakeBackend, FakeHotkeys};
    use crate::shared::types::{AuthStatus, RoutingMode, WindowKind};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn flag() -> (Arc<AtomicBool>, Terminate) {
        let fired = Arc::new(AtomicBool::new(false));
        let handle = fired.clone();
        (fired, Arc::new(move || handle.store(true, Ordering::SeqCst)))
    }

    #[test]
    fn escape_fires_while_everything_passes_through() {
        let backend = FakeBackend::new();
        let mut control = ControlLoop::new(ControlDeps::for_tests(backend.clone()));
        control.create_widget_window().unwrap();
        control
            .set_auth_status(AuthStatus {
                auth_loading: false,
                authenticated: true,
            })
            .unwrap();
        assert_eq!(control.effective_mode(WindowKind::Widget), Some(RoutingMode::PassThrough));
        assert!(control.effective_mode(WindowKind::Secondary).is_none());

        let (fired, terminate) = flag();
        let mut hotkeys = FakeHotkeys::default();
        EscapeRegistrar::new(ESCAPE_HOTKEYS).register_all(&mut hotkeys, terminate);

        assert!(hotkeys.press(ESCAPE_HOTKEYS[0]));
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn one_refused_binding_does_not_block_the_other() {
        let (fired, terminate) = flag();
        let mut hotkeys = FakeHotkeys {
            rejected: vec![ESCAPE_HOTKEYS[0].to_string()],
            ..Default::default()
        };

        let report = EscapeRegistrar::new(ESCAPE_HOTKEYS).register_all(&mut hotkeys, terminate);

        assert_eq!(report.failed, vec![ESCAPE_HOTKEYS[0].to_string()]);
        assert_eq!(report.registered, vec![ESCAPE_HOTKEYS[1].to_string()]);
        assert!(!hotkeys.press(ESCAPE_HOTKEYS[0]));
        assert!(hotkeys.press(ESCAPE_HOTKEYS[1]));
        assert!(fired.load(Ordering::SeqCst));
    }
}
