//! Arena layout and geometry spawning.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::core::layers;
use crate::enemies::{Enemy, Health, Knockback};

/// Marker for entities that belong to the arena.
#[derive(Component)]
pub struct ArenaGeometry;

/// Where everything goes.
///
/// The floor stops at `floor_half_extent.y` on the +Z side; past that edge
/// is open void, so a long throw in that direction falls out of the world.
#[derive(Resource, Debug, Clone)]
pub struct ArenaLayout {
    /// Half size of the floor slab on X and Z
    pub floor_half_extent: Vec2,
    pub floor_thickness: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,
    pub player_start: Vec3,
    pub weapon_start: Vec3,
    pub enemy_positions: Vec<Vec3>,
    pub enemy_health: i32,
    /// Cover blocks: (center, half extents)
    pub pillars: Vec<(Vec3, Vec3)>,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            floor_half_extent: Vec2::new(16.0, 16.0),
            floor_thickness: 1.0,
            wall_height: 4.0,
            wall_thickness: 0.5,
            player_start: Vec3::new(0.0, 1.0, 8.0),
            weapon_start: Vec3::new(0.0, 0.3, 5.5),
            enemy_positions: vec![
                Vec3::new(-5.0, 0.9, -6.0),
                Vec3::new(0.0, 0.9, -10.0),
                Vec3::new(6.0, 0.9, -4.0),
            ],
            enemy_health: 30,
            pillars: vec![
                (Vec3::new(-8.0, 1.5, 0.0), Vec3::new(0.75, 1.5, 0.75)),
                (Vec3::new(8.0, 1.5, -8.0), Vec3::new(0.75, 1.5, 0.75)),
            ],
        }
    }
}

impl ArenaLayout {
    /// Wall segments as (center, half extents): north, west and east only.
    pub fn walls(&self) -> [(Vec3, Vec3); 3] {
        let half = self.floor_half_extent;
        let t = self.wall_thickness * 0.5;
        let h = self.wall_height * 0.5;
        [
            (Vec3::new(0.0, h, -half.y - t), Vec3::new(half.x + 2.0 * t, h, t)),
            (Vec3::new(-half.x - t, h, 0.0), Vec3::new(t, h, half.y)),
            (Vec3::new(half.x + t, h, 0.0), Vec3::new(t, h, half.y)),
        ]
    }

    /// True when `position` is above the floor slab.
    pub fn over_floor(&self, position: Vec3) -> bool {
        position.x.abs() <= self.floor_half_extent.x && position.z.abs() <= self.floor_half_extent.y
    }
}

/// Spawn a static box of level geometry.
pub fn spawn_block(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    center: Vec3,
    half_extents: Vec3,
) -> Entity {
    commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::from_size(half_extents * 2.0))),
            MeshMaterial3d(material),
            Transform::from_translation(center),
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
            layers::world_groups(),
            ArenaGeometry,
        ))
        .id()
}

/// Floor, walls and pillars.
pub fn spawn_arena_geometry(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    layout: &ArenaLayout,
) {
    let floor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.28, 0.27, 0.26),
        perceptual_roughness: 0.9,
        ..default()
    });
    let wall_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.32, 0.30, 0.28),
        perceptual_roughness: 0.8,
        ..default()
    });

    // Top surface at y = 0
    let half = layout.floor_half_extent;
    spawn_block(
        commands,
        meshes,
        floor_material,
        Vec3::new(0.0, -layout.floor_thickness * 0.5, 0.0),
        Vec3::new(half.x, layout.floor_thickness * 0.5, half.y),
    );

    for (center, half_extents) in layout.walls() {
        spawn_block(commands, meshes, wall_material.clone(), center, half_extents);
    }
    for &(center, half_extents) in &layout.pillars {
        spawn_block(commands, meshes, wall_material.clone(), center, half_extents);
    }

    commands.spawn((
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(6.0, 12.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
        ArenaGeometry,
    ));
}

/// Spawn a target dummy.
pub fn spawn_enemy(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    position: Vec3,
    health: i32,
) -> Entity {
    commands
        .spawn((
            Name::new("Enemy"),
            Enemy,
            Health::new(health),
            Knockback::default(),
            Mesh3d(meshes.add(Capsule3d::new(0.4, 1.0))),
            MeshMaterial3d(material),
            Transform::from_translation(position),
            Collider::capsule_y(0.5, 0.4),
            layers::enemy_groups(),
            ArenaGeometry,
        ))
        .id()
}
