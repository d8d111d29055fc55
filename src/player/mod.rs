//! Player module - the wielder: movement, camera and the weapon anchor.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::spawn_player;
pub use plugin::PlayerPlugin;
