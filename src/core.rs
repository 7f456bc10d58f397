pub mod control;
pub mod coordinator;
pub mod escape;
pub mod geometry;
pub mod menu_provider;
pub mod owners;
pub mod persistence;
pub mod routing;

#[cfg(test)]
pub mod testing;
