pub mod types;
pub mod settings;
pub mod error;
pub mod events;
pub mod emit;

#[cfg(test)]
mod types_test;
