//! UI module - crosshair and mana bar.

mod hud;
mod plugin;

pub use hud::{indicator_for, Crosshair, HudRoot, ManaBar};
pub use plugin::UiPlugin;
