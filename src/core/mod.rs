//! Core game module - states, events, and shared math helpers.

mod events;
pub mod layers;
mod plugin;
mod states;
mod tween;

pub use events::*;
pub use plugin::CorePlugin;
pub use states::*;
pub use tween::*;
