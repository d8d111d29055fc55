//! First-person player movement and camera control.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::core::{layers, GameState, PlayState};
use crate::masks::{Mana, MaskContext, MaskSlot, Mask};
use crate::weapon::{WeaponAnchor, WeaponConfig};

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app
        .init_resource::<PlayerConfig>()
        .add_systems(OnEnter(GameState::InGame), grab_cursor)
        .add_systems(OnExit(GameState::InGame), release_cursor)
        .add_systems(
            Update,
            (mouse_look, player_movement)
                .run_if(in_state(GameState::InGame))
                .run_if(in_state(PlayState::Exploring)),
        );
}

fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Yaw rotates the player body, pitch rotates only the camera child.
pub fn mouse_look(
    mut mouse_motion: EventReader<MouseMotion>,
    config: Res<PlayerConfig>,
    mut player_query: Query<&mut Transform, With<Player>>,
    mut camera_query: Query<(&mut Transform, &mut PlayerCamera), Without<Player>>,
) {
    let delta: Vec2 = mouse_motion.read().map(|event| event.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    let Ok(mut player_transform) = player_query.get_single_mut() else {
        return;
    };
    let Ok((mut camera_transform, mut camera)) = camera_query.get_single_mut() else {
        return;
    };

    let sensitivity = config.mouse_sensitivity * 0.001;
    let y_invert = if config.invert_y { -1.0 } else { 1.0 };

    player_transform.rotate_y(-delta.x * sensitivity);

    camera.pitch = (camera.pitch - delta.y * sensitivity * y_invert).clamp(-1.4, 1.4);
    camera_transform.rotation = Quat::from_rotation_x(camera.pitch);
}

/// WASD movement and jumping through rapier's character controller.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut player_query: Query<(
        &Transform,
        &mut MovementState,
        &mut KinematicCharacterController,
        Option<&KinematicCharacterControllerOutput>,
    ), With<Player>>,
) {
    let Ok((transform, mut movement_state, mut controller, output)) = player_query.get_single_mut() else {
        return;
    };

    movement_state.is_grounded = output.map_or(true, |output| output.grounded);

    if movement_state.is_grounded {
        if movement_state.vertical_velocity < 0.0 {
            movement_state.vertical_velocity = 0.0;
        }
        if keyboard.just_pressed(KeyCode::Space) {
            movement_state.vertical_velocity = config.jump_force;
        }
    } else {
        movement_state.vertical_velocity -= config.gravity * time.delta_secs();
    }

    let mut direction = Vec3::ZERO;
    for (key, step) in [
        (KeyCode::KeyW, Vec3::NEG_Z),
        (KeyCode::KeyS, Vec3::Z),
        (KeyCode::KeyA, Vec3::NEG_X),
        (KeyCode::KeyD, Vec3::X),
    ] {
        if keyboard.pressed(key) {
            direction += step;
        }
    }

    let yaw = transform.rotation.to_euler(EulerRot::YXZ).0;
    let movement = Quat::from_rotation_y(yaw) * direction.normalize_or_zero();

    let speed = if keyboard.pressed(KeyCode::ShiftLeft) {
        config.move_speed * config.sprint_multiplier
    } else {
        config.move_speed
    };

    let horizontal = movement * speed * time.delta_secs();
    let vertical = Vec3::Y * movement_state.vertical_velocity * time.delta_secs();
    controller.translation = Some(horizontal + vertical);
}

/// Spawn the player with its camera and the weapon's carried anchor.
///
/// Returns `(player, anchor)`.
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec3,
    config: &PlayerConfig,
    weapon_config: &WeaponConfig,
) -> (Entity, Entity) {
    let player = commands
        .spawn((
            Player,
            MovementState::default(),
            Mana::default(),
            MaskContext::default(),
            MaskSlot::with_masks([Mask::Fury, Mask::Feather, Mask::Hourglass]),
            Transform::from_translation(position),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.3),
            layers::player_groups(),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                filter_groups: Some(layers::player_groups()),
                autostep: Some(CharacterAutostep {
                    max_height: CharacterLength::Absolute(0.4),
                    min_width: CharacterLength::Absolute(0.3),
                    include_dynamic_bodies: false,
                }),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
        ))
        .id();

    let mut anchor = Entity::PLACEHOLDER;
    commands.entity(player).with_children(|parent| {
        parent
            .spawn((
                Camera3d::default(),
                PlayerCamera::default(),
                Transform::from_xyz(0.0, config.eye_height, 0.0),
            ))
            .with_children(|camera| {
                anchor = camera
                    .spawn((
                        WeaponAnchor,
                        Transform::from_translation(weapon_config.hold_offset()),
                        Visibility::default(),
                    ))
                    .id();
            });
    });

    (player, anchor)
}
