//! Boomerang Mask - a first-person throw-and-catch boomerang combat loop in Bevy.
//!
//! The weapon is a small state machine (held, flying, returning, grounded)
//! driven by explicit ticks, so the same code runs under the ECS and under
//! plain unit tests.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, collision layers
//! - **Player**: First-person movement, camera, the weapon anchor
//! - **Weapon**: The boomerang state machine, flight, return and feedback
//! - **Masks**: Wearable abilities and the mana pool
//! - **Enemies**: Health, knockback and death
//! - **World**: The arena
//! - **UI**: Crosshair and mana bar

pub mod core;
pub mod enemies;
pub mod masks;
pub mod player;
pub mod ui;
pub mod weapon;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct BoomerangMaskPlugin;

impl Plugin for BoomerangMaskPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Weapon and mask systems
            .add_plugins(weapon::WeaponPlugin)
            .add_plugins(masks::MaskPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
