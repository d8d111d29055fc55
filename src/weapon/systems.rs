//! Weapon systems - bridge the boomerang state machine to input, rapier and
//! the rest of the ECS world.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::aim::{aim_direction, AimState, AimView};
use super::components::*;
use super::config::WeaponConfig;
use super::feedback::{self, ScreenShake, WeaponCue};
use super::machine::Boomerang;
use super::physics::{knockback_from, FlightBody, FlightSpace, SurfaceHit};
use crate::core::{layers, DamageEvent, DeathEvent, GameState, PlayState};
use crate::enemies::{Dead, Enemy, Health};
use crate::masks::{Mana, MaskContext, WielderResources};
use crate::player::{Player, PlayerCamera};

/// System set ordering for the weapon.
///
/// Contacts run before the polled logic so an enemy hit wins over a landing
/// detected in the same frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum WeaponSet {
    Input,
    Physics,
    Contact,
    Logic,
    Sync,
    Feedback,
}

/// Configure weapon systems.
pub fn setup_weapon_systems(app: &mut App) {
    app
        .init_resource::<AimState>()
        .init_resource::<ScreenShake>()
        .add_event::<WeaponCue>()

        .configure_sets(
            Update,
            (
                WeaponSet::Input,
                WeaponSet::Physics,
                WeaponSet::Contact,
                WeaponSet::Logic,
                WeaponSet::Sync,
                WeaponSet::Feedback,
            )
                .chain()
                .run_if(in_state(GameState::InGame))
                .run_if(in_state(PlayState::Exploring)),
        )

        .add_systems(Update, (update_aim, weapon_input).chain().in_set(WeaponSet::Input))
        .add_systems(Update, drive_flight.in_set(WeaponSet::Physics))
        .add_systems(Update, weapon_contacts.in_set(WeaponSet::Contact))
        .add_systems(Update, update_weapons.in_set(WeaponSet::Logic))
        .add_systems(Update, sync_weapon_entities.in_set(WeaponSet::Sync))
        .add_systems(
            Update,
            (
                feedback::emit_weapon_cues,
                feedback::play_weapon_cues,
                feedback::shake_on_hit,
                feedback::update_screen_shake,
            )
                .chain()
                .in_set(WeaponSet::Feedback),
        );
}

/// Rapier-backed flight geometry that never sees the wielder.
struct RapierFlightSpace<'a> {
    context: &'a RapierContext,
    filter: QueryFilter<'a>,
}

impl FlightSpace for RapierFlightSpace<'_> {
    fn sweep(&self, origin: Vec3, motion: Vec3, radius: f32) -> Option<SurfaceHit> {
        let distance = motion.length();
        let direction = motion.try_normalize()?;
        let (_, hit) =
            self.context
                .cast_ray_and_get_normal(origin, direction, distance + radius, true, self.filter)?;
        Some(SurfaceHit {
            fraction: ((hit.time_of_impact - radius) / distance).clamp(0.0, 1.0),
            // Starting inside geometry yields no normal; push straight back.
            normal: hit.normal.try_normalize().unwrap_or(-direction),
        })
    }
}

/// The wielder as the weapon sees it this frame.
fn wielder_view(transform: &Transform, config: &WeaponConfig) -> Wielder {
    Wielder::new(transform.translation, config.hold_height)
}

/// Cast the view ray and track how long the throw button is held.
fn update_aim(
    mouse: Res<ButtonInput<MouseButton>>,
    real_time: Res<Time<Real>>,
    config: Res<WeaponConfig>,
    mut aim: ResMut<AimState>,
    rapier_context: Query<&RapierContext>,
    camera_query: Query<&GlobalTransform, With<PlayerCamera>>,
    player_query: Query<Entity, With<Player>>,
    weapon_query: Query<Entity, With<Boomerang>>,
    enemy_query: Query<(), (With<Enemy>, Without<Dead>)>,
) {
    aim.aiming = mouse.pressed(MouseButton::Right);
    if aim.aiming {
        aim.held_for += real_time.delta_secs();
    }

    let Ok(camera) = camera_query.get_single() else {
        aim.view = None;
        aim.surface = None;
        aim.on_target = false;
        return;
    };

    let view = AimView {
        origin: camera.translation(),
        forward: camera.forward().as_vec3(),
    };
    aim.view = Some(view);

    let Ok(context) = rapier_context.get_single() else {
        aim.surface = None;
        aim.on_target = false;
        return;
    };

    let mut filter = QueryFilter::default().exclude_sensors();
    if let Ok(player) = player_query.get_single() {
        filter = filter.exclude_collider(player);
    }
    for weapon in weapon_query.iter() {
        filter = filter.exclude_collider(weapon);
    }

    match context.cast_ray(view.origin, view.forward, config.aim_max_distance, true, filter) {
        Some((entity, distance)) => {
            aim.surface = Some(view.origin + view.forward * distance);
            aim.on_target = enemy_query.get(entity).is_ok();
        }
        None => {
            aim.surface = None;
            aim.on_target = false;
        }
    }
}

/// Throw on aim release, swing on left click, pick up with E, recall with R.
fn weapon_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<WeaponConfig>,
    mut aim: ResMut<AimState>,
    mut player_query: Query<(&Transform, &mut Mana, &MaskContext), With<Player>>,
    mut weapon_query: Query<&mut Boomerang>,
) {
    let Ok((player_transform, mut mana, masks)) = player_query.get_single_mut() else {
        return;
    };
    let wielder = wielder_view(player_transform, &config);
    let mut resources = WielderResources {
        mana: &mut mana,
        masks,
        config: &config,
    };

    let released = mouse.just_released(MouseButton::Right);
    let held_for = aim.held_for;
    if released {
        aim.held_for = 0.0;
    }

    for mut weapon in weapon_query.iter_mut() {
        if released && weapon.is_held() {
            let direction =
                aim_direction(aim.view, weapon.pose().position, aim.surface, held_for, &config);
            if weapon.throw(direction, &mut resources, &config) {
                info!("Boomerang thrown");
            }
        }

        if mouse.just_pressed(MouseButton::Left) && !aim.aiming {
            weapon.melee(&mut resources, &config);
        }

        if keyboard.just_pressed(KeyCode::KeyE) && weapon.pickup(&wielder, &config) {
            info!("Boomerang picked up ({} throws)", weapon.completed_throws());
        }

        if keyboard.just_pressed(KeyCode::KeyR) && weapon.recall(&wielder, &config) {
            info!("Boomerang recalled");
        }
    }
}

/// Integrate free flight against world geometry only.
fn drive_flight(
    real_time: Res<Time<Real>>,
    config: Res<WeaponConfig>,
    rapier_context: Query<&RapierContext>,
    mut weapon_query: Query<(Entity, &mut Boomerang, &WeaponLink)>,
) {
    let Ok(context) = rapier_context.get_single() else {
        return;
    };
    let body = FlightBody::from_config(&config);
    let dt = real_time.delta_secs();

    for (entity, mut weapon, link) in weapon_query.iter_mut() {
        if !weapon.needs_flight_physics() {
            continue;
        }
        let space = RapierFlightSpace {
            context,
            filter: QueryFilter::default()
                .exclude_sensors()
                .groups(CollisionGroups::new(layers::WEAPON, layers::WORLD))
                .exclude_collider(entity)
                .exclude_collider(link.wielder),
        };
        body.step(weapon.pose_mut(), dt, &space);
    }
}

/// Offer every overlapped enemy to an armed weapon.
fn weapon_contacts(
    config: Res<WeaponConfig>,
    rapier_context: Query<&RapierContext>,
    mut weapon_query: Query<(Entity, &mut Boomerang, &WeaponLink)>,
    mut player_query: Query<(&Transform, &mut Mana, &MaskContext), With<Player>>,
    mut enemy_query: Query<&mut Health, (With<Enemy>, Without<Dead>)>,
    mut damage_events: EventWriter<DamageEvent>,
    mut death_events: EventWriter<DeathEvent>,
) {
    let Ok(context) = rapier_context.get_single() else {
        return;
    };
    let Ok((player_transform, mut mana, masks)) = player_query.get_single_mut() else {
        return;
    };
    let wielder = wielder_view(player_transform, &config);
    let resources = WielderResources {
        mana: &mut mana,
        masks,
        config: &config,
    };

    for (entity, mut weapon, link) in weapon_query.iter_mut() {
        if !weapon.is_armed() {
            continue;
        }

        let (center, radius) = if weapon.is_held() {
            let forward = player_transform.forward().as_vec3();
            (weapon.pose().position + forward * config.melee_reach * 0.5, config.melee_reach)
        } else {
            (weapon.pose().position, config.hit_radius)
        };

        let mut overlapped = Vec::new();
        context.intersections_with_shape(
            center,
            Quat::IDENTITY,
            &Collider::ball(radius),
            QueryFilter::default()
                .groups(CollisionGroups::new(layers::WEAPON, layers::ENEMY))
                .exclude_collider(entity),
            |hit_entity| {
                overlapped.push(hit_entity);
                true
            },
        );

        for target in overlapped {
            let Ok(mut health) = enemy_query.get_mut(target) else {
                continue;
            };
            let Some(strike) = weapon.strike(&mut *health, &resources, &wielder, &config) else {
                continue;
            };

            let push = if strike.thrown {
                strike.direction
            } else {
                player_transform.forward().as_vec3()
            };
            damage_events.send(DamageEvent {
                target,
                source: link.wielder,
                amount: strike.amount,
                knockback: knockback_from(push, config.knockback_force),
            });
            if strike.killed {
                death_events.send(DeathEvent {
                    entity: target,
                    killed_by: Some(link.wielder),
                });
            }
        }
    }
}

/// Advance every weapon on unscaled time so slow-motion masks leave its
/// timers alone.
fn update_weapons(
    real_time: Res<Time<Real>>,
    config: Res<WeaponConfig>,
    player_query: Query<&Transform, With<Player>>,
    anchor_query: Query<&GlobalTransform, With<WeaponAnchor>>,
    mut weapon_query: Query<(&mut Boomerang, &WeaponLink)>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    let wielder = wielder_view(player_transform, &config);

    for (mut weapon, link) in weapon_query.iter_mut() {
        match anchor_query.get(link.anchor) {
            Ok(anchor) => weapon.follow_anchor(anchor.translation(), anchor.rotation()),
            Err(_) if weapon.is_held() => warn!("Weapon anchor {:?} missing", link.anchor),
            Err(_) => {}
        }
        weapon.update(real_time.delta_secs(), &wielder, &config);
    }
}

/// Re-parent, move and re-collide weapon entities to match their state.
fn sync_weapon_entities(
    mut commands: Commands,
    mut weapon_query: Query<(
        Entity,
        &Boomerang,
        &mut WeaponLink,
        &mut Transform,
        &mut CollisionGroups,
        Has<Sensor>,
    )>,
) {
    for (entity, weapon, mut link, mut transform, mut groups, is_sensor) in weapon_query.iter_mut() {
        match weapon.collider_mode() {
            ColliderMode::Carried => {
                if !link.attached {
                    commands.entity(entity).set_parent(link.anchor);
                    link.attached = true;
                }
                *transform = Transform::IDENTITY;
                if !is_sensor {
                    commands.entity(entity).insert(Sensor);
                }
            }
            ColliderMode::Solid => {
                if link.attached {
                    commands.entity(entity).remove_parent();
                    link.attached = false;
                }
                transform.translation = weapon.pose().position;
                transform.rotation = weapon.pose().rotation;
                if is_sensor {
                    commands.entity(entity).remove::<Sensor>();
                }
            }
        }

        let desired = layers::weapon_groups(weapon.ignores_wielder());
        if *groups != desired {
            *groups = desired;
        }
    }
}
