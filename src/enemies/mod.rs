//! Enemies module - things the weapon can hurt.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::EnemyPlugin;
