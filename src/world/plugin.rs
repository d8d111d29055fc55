//! World plugin - arena setup.

use bevy::prelude::*;

use super::arena::{spawn_arena_geometry, spawn_enemy, ArenaLayout};
use crate::core::GameState;
use crate::player::{spawn_player, PlayerConfig};
use crate::weapon::{spawn_boomerang, WeaponConfig};

/// World plugin - builds the arena once the game leaves `Loading`.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        // OnEnter(InGame) would fire again after every unpause.
        app.init_resource::<ArenaLayout>()
            .add_systems(OnExit(GameState::Loading), setup_arena);
    }
}

/// Spawn geometry, enemies, the player and the boomerang.
pub fn setup_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    layout: Res<ArenaLayout>,
    player_config: Res<PlayerConfig>,
    weapon_config: Res<WeaponConfig>,
) {
    info!(
        "Building arena: {} enemies, floor {:?}",
        layout.enemy_positions.len(),
        layout.floor_half_extent * 2.0
    );

    spawn_arena_geometry(&mut commands, &mut meshes, &mut materials, &layout);

    let enemy_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.2, 0.2),
        perceptual_roughness: 0.7,
        ..default()
    });
    for &position in &layout.enemy_positions {
        if !layout.over_floor(position) {
            warn!("Skipping enemy at {:?}: not above the floor", position);
            continue;
        }
        spawn_enemy(&mut commands, &mut meshes, enemy_material.clone(), position, layout.enemy_health);
    }

    if !layout.over_floor(layout.weapon_start) {
        warn!("Boomerang starts off the floor at {:?}", layout.weapon_start);
    }

    let (player, anchor) = spawn_player(&mut commands, layout.player_start, &player_config, &weapon_config);
    spawn_boomerang(
        &mut commands,
        &mut meshes,
        &mut materials,
        &weapon_config,
        layout.weapon_start,
        player,
        anchor,
    );
}
