//! Enemy plugin - registers enemy reaction systems.

use bevy::prelude::*;

use super::systems;
use crate::core::GameState;

/// Enemy plugin - handles knockback, death and despawn.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                systems::apply_hit_knockback,
                systems::move_knockback,
                systems::handle_enemy_death,
                systems::despawn_dead_enemies,
            )
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
    }
}
