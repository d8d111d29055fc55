//! Weapon plugin - the boomerang, its tunables and its feedback.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::WeaponLink;
use super::config::WeaponConfig;
use super::feedback::load_weapon_sounds;
use super::machine::Boomerang;
use super::systems;
use crate::core::layers;

/// Weapon plugin - handles the boomerang's whole throw/return loop.
pub struct WeaponPlugin;

impl Plugin for WeaponPlugin {
    fn build(&self, app: &mut App) {
        // Tunables must exist before any OnEnter/OnExit schedule spawns the weapon.
        app.insert_resource(WeaponConfig::load())
            .add_systems(Startup, load_weapon_sounds);

        systems::setup_weapon_systems(app);
    }
}

/// Spawn the boomerang lying in the world, bound to its future wielder.
pub fn spawn_boomerang(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    config: &WeaponConfig,
    position: Vec3,
    wielder: Entity,
    anchor: Entity,
) -> Entity {
    let blade = meshes.add(Cuboid::new(0.5, 0.04, 0.12));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.38, 0.2),
        perceptual_roughness: 0.8,
        ..default()
    });

    commands
        .spawn((
            Name::new("Boomerang"),
            Boomerang::grounded_at(position, config),
            WeaponLink {
                wielder,
                anchor,
                attached: false,
            },
            Transform::from_translation(position),
            Visibility::default(),
            Collider::ball(config.weapon_radius),
            layers::weapon_groups(true),
        ))
        .with_children(|parent| {
            // Two blades at an angle make the silhouette.
            for angle in [0.6_f32, -0.6] {
                parent.spawn((
                    Mesh3d(blade.clone()),
                    MeshMaterial3d(material.clone()),
                    Transform::from_xyz(0.0, 0.0, angle * 0.15)
                        .with_rotation(Quat::from_rotation_y(angle)),
                ));
            }
        })
        .id()
}

