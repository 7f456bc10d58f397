//! Window placement persisted through tauri-plugin-store.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tauri::{AppHandle, Wry};
use tauri_plugin_store::{Store, StoreExt};

use crate::core::persistence::{
    PersistedWindowState, WindowStateStore, SECONDARY_BOUNDS_KEY, WIDGET_POSITION_KEY,
};
use crate::shared::error::AppResult;
use crate::shared::types::{Bounds, Point};

pub const WINDOW_STATE_FILE: &str = "window-state.json";

pub struct PluginWindowStore {
    store: Arc<Store<Wry>>,
}

impl PluginWindowStore {
    pub fn open(app: &AppHandle) -> AppResult<Self> {
        let store = app.store(WINDOW_STATE_FILE)?;
        Ok(Self { store })
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.store.get(key)?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("[Store] Ignoring malformed '{}': {}", key, e);
                None
            }
        }
    }
}

impl WindowStateStore for PluginWindowStore {
    fn load(&self) -> PersistedWindowState {
        PersistedWindowState {
            widget_position: self.read(WIDGET_POSITION_KEY),
            secondary_bounds: self.read(SECONDARY_BOUNDS_KEY),
        }
    }

    fn save_widget_position(&mut self, position: Point) -> AppResult<()> {
        self.store.set(WIDGET_POSITION_KEY, serde_json::to_value(position)?);
        Ok(())
    }

    fn save_secondary_bounds(&mut self, bounds: Bounds) -> AppResult<()> {
        self.store.set(SECONDARY_BOUNDS_KEY, serde_json::to_value(bounds)?);
        Ok(())
    }

    fn flush(&mut self) -> AppResult<()> {
        self.store.save()?;
        Ok(())
    }
}
