//! In-memory collaborators for unit tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::core::coordinator::{WindowBackend, WindowSpec};
use crate::core::escape::{HotkeyBackend, Terminate};
use crate::core::menu_provider::MenuProvider;
use crate::core::persistence::{PersistedWindowState, WindowStateStore};
use crate::shared::emit::EventSink;
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::AppEvent;
use crate::shared::types::{Bounds, MenuItem, Point, ScreenSize, WindowKind};

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Create(WindowKind),
    Show(WindowKind),
    Hide(WindowKind),
    Destroy(WindowKind),
    SetBounds(WindowKind, Bounds),
    AlwaysOnTop(WindowKind, bool),
    Navigate(WindowKind, String),
    PassThrough(WindowKind, bool),
}

#[derive(Default)]
struct BackendInner {
    calls: Vec<BackendCall>,
    failing: HashSet<WindowKind>,
}

/// Records every window operation; clones share the same log.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<BackendInner>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_creation(&self, kind: WindowKind) {
        self.inner.lock().unwrap().failing.insert(kind);
    }

    pub fn allow_creation(&self, kind: WindowKind) {
        self.inner.lock().unwrap().failing.remove(&kind);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&BackendCall) -> bool) -> usize {
        self.inner.lock().unwrap().calls.iter().filter(|c| pred(c)).count()
    }

    /// Pass-through flags pushed to the OS for `kind`, in order.
    pub fn pass_through_history(&self, kind: WindowKind) -> Vec<bool> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::PassThrough(k, flag) if *k == kind => Some(*flag),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    fn record(&self, call: BackendCall) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

impl WindowBackend for FakeBackend {
    fn screen_size(&self) -> ScreenSize {
        ScreenSize::new(1920.0, 1080.0)
    }

    fn create(&mut self, spec: &WindowSpec) -> AppResult<()> {
        if self.inner.lock().unwrap().failing.contains(&spec.kind) {
            return Err(AppError::Window("refused by OS".to_string()));
        }
        self.record(BackendCall::Create(spec.kind));
        Ok(())
    }

    fn show(&mut self, kind: WindowKind) -> AppResult<()> {
        self.record(BackendCall::Show(kind));
        Ok(())
    }

    fn hide(&mut self, kind: WindowKind) -> AppResult<()> {
        self.record(BackendCall::Hide(kind));
        Ok(())
    }

    fn destroy(&mut self, kind: WindowKind) -> AppResult<()> {
        self.record(BackendCall::Destroy(kind));
        Ok(())
    }

    fn set_bounds(&mut self, kind: WindowKind, bounds: Bounds) -> AppResult<()> {
        self.record(BackendCall::SetBounds(kind, bounds));
        Ok(())
    }

    fn set_always_on_top(&mut self, kind: WindowKind, on_top: bool) -> AppResult<()> {
        self.record(BackendCall::AlwaysOnTop(kind, on_top));
        Ok(())
    }

    fn navigate(&mut self, kind: WindowKind, route: &str) -> AppResult<()> {
        self.record(BackendCall::Navigate(kind, route.to_string()));
        Ok(())
    }

    fn set_pass_through(&mut self, kind: WindowKind, pass_through: bool) -> AppResult<()> {
        self.record(BackendCall::PassThrough(kind, pass_through));
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingEvents {
    events: Arc<Mutex<Vec<AppEvent>>>,
}

impl RecordingEvents {
    pub fn events(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingEvents {
    fn publish(&self, event: AppEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<PersistedWindowState>>,
    flushes: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn with_state(state: PersistedWindowState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            flushes: Arc::default(),
        }
    }

    pub fn snapshot(&self) -> PersistedWindowState {
        *self.state.lock().unwrap()
    }

    pub fn flush_count(&self) -> usize {
        *self.flushes.lock().unwrap()
    }
}

impl WindowStateStore for MemoryStore {
    fn load(&self) -> PersistedWindowState {
        self.snapshot()
    }

    fn save_widget_position(&mut self, position: Point) -> AppResult<()> {
        self.state.lock().unwrap().widget_position = Some(position);
        Ok(())
    }

    fn save_secondary_bounds(&mut self, bounds: Bounds) -> AppResult<()> {
        self.state.lock().unwrap().secondary_bounds = Some(bounds);
        Ok(())
    }

    fn flush(&mut self) -> AppResult<()> {
        *self.flushes.lock().unwrap() += 1;
        Ok(())
    }
}

/// Menu provider that always fails, as an unreachable remote would.
pub struct FailingMenuProvider;

#[async_trait]
impl MenuProvider for FailingMenuProvider {
    async fn menu_items(&self, _role: &str) -> AppResult<Vec<MenuItem>> {
        Err(AppError::Unknown("menu service unavailable".to_string()))
    }
}

/// Hotkey backend keeping handlers so tests can fire them.
#[derive(Default)]
pub struct FakeHotkeys {
    pub handlers: Vec<(String, Terminate)>,
    pub rejected: Vec<String>,
}

impl FakeHotkeys {
    pub fn press(&self, accelerator: &str) -> bool {
        match self.handlers.iter().find(|(a, _)| a == accelerator) {
            Some((_, handler)) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl HotkeyBackend for FakeHotkeys {
    fn register(&mut self, accelerator: &str, on_press: Terminate) -> AppResult<()> {
        if self.rejected.iter().any(|a| a == accelerator) {
            return Err(AppError::Hotkey(format!("{} is taken", accelerator)));
        }
        self.handlers.push((accelerator.to_string(), on_press));
        Ok(())
    }
}
