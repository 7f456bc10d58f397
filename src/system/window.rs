pub mod backend;
pub mod cursor;
