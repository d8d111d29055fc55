//! Enemy reactions to weapon hits: knockback, death and cleanup.

use bevy::prelude::*;

use super::components::*;
use crate::core::{DamageEvent, DeathEvent};

/// Turn hit knockback into enemy push.
pub fn apply_hit_knockback(
    mut damage_events: EventReader<DamageEvent>,
    mut query: Query<&mut Knockback, (With<Enemy>, Without<Dead>)>,
) {
    for event in damage_events.read() {
        if let Ok(mut knockback) = query.get_mut(event.target) {
            knockback.push(event.knockback);
        }
    }
}

/// Slide enemies along their knockback.
pub fn move_knockback(time: Res<Time>, mut query: Query<(&mut Transform, &mut Knockback), With<Enemy>>) {
    for (mut transform, mut knockback) in query.iter_mut() {
        if knockback.velocity != Vec3::ZERO {
            transform.translation += knockback.advance(time.delta_secs());
        }
    }
}

/// Mark killed enemies so they stop taking part in combat.
pub fn handle_enemy_death(
    mut commands: Commands,
    mut death_events: EventReader<DeathEvent>,
    query: Query<Entity, (With<Enemy>, Without<Dead>)>,
) {
    for event in death_events.read() {
        if query.get(event.entity).is_ok() {
            info!("Enemy {:?} defeated", event.entity);
            commands
                .entity(event.entity)
                .insert((Dead, DeathTimer::default()));
        }
    }
}

/// Topple dead enemies over and despawn them once their timer runs out.
pub fn despawn_dead_enemies(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut DeathTimer), With<Dead>>,
) {
    for (entity, mut transform, mut timer) in query.iter_mut() {
        timer.0.tick(time.delta());
        let fall = (timer.0.fraction() * 4.0).min(1.0);
        transform.rotation = Quat::from_rotation_x(-fall * std::f32::consts::FRAC_PI_2);
        if timer.0.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
