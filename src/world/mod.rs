//! World module - the test arena the boomerang is thrown around in.

mod arena;
mod plugin;

pub use arena::{ArenaGeometry, ArenaLayout};
pub use plugin::{setup_arena, WorldPlugin};
