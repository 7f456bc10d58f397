pub mod hotkeys;
pub mod store;
pub mod tray;
pub mod window;
