//! Masks module - wearable abilities and the mana they share with the weapon.

mod components;
mod plugin;

pub use components::*;
pub use plugin::MaskPlugin;
