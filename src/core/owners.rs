//! State owned by each UI component. Routing authority per phase lives in
//! [`crate::core::routing::ownership`]; these types only track local state.

pub mod menu;
pub mod orb;
pub mod shell;

pub use menu::MenuOwner;
pub use orb::{OrbOwner, Release};
pub use shell::{ShellOwner, Transition};
