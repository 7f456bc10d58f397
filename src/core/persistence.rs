//! Last-known window placement, persisted as a few key/value pairs.

use serde::{Deserialize, Serialize};

use crate::shared::error::AppResult;
use crate::shared::types::{Bounds, Point};

pub const WIDGET_POSITION_KEY: &str = "widget_position";
pub const SECONDARY_BOUNDS_KEY: &str = "secondary_bounds";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedWindowState {
    pub widget_position: Option<Point>,
    pub secondary_bounds: Option<Bounds>,
}

pub trait WindowStateStore: Send {
    fn load(&self) -> PersistedWindowState;
    fn save_widget_position(&mut self, position: Point) -> AppResult<()>;
    fn save_secondary_bounds(&mut self, bounds: Bounds) -> AppResult<()>;
    /// Write pending values to disk.
    fn flush(&mut self) -> AppResult<()>;
}
