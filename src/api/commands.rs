//! Tauri command surface. Every command forwards to the control loop.

pub mod menu;
pub mod orb;
pub mod routing;
pub mod session;
pub mod settings;
pub mod system;
pub mod window;
