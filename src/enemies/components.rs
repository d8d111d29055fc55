//! Enemy-related components.

use bevy::prelude::*;

use crate::weapon::Damageable;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Integer hit points.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub maximum: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn percentage(&self) -> f32 {
        self.current.max(0) as f32 / self.maximum as f32
    }
}

impl Damageable for Health {
    fn current_health(&self) -> i32 {
        self.current
    }

    fn take_damage(&mut self, amount: i32) {
        self.current = (self.current - amount.max(0)).max(0);
    }
}

/// Sliding push applied by hits; decays to rest.
#[derive(Component, Debug, Default)]
pub struct Knockback {
    pub velocity: Vec3,
}

impl Knockback {
    /// Per-second decay factor applied to knockback velocity.
    pub const DECAY: f32 = 8.0;

    pub fn push(&mut self, impulse: Vec3) {
        self.velocity += impulse;
    }

    /// Displacement for this frame.
    pub fn advance(&mut self, delta: f32) -> Vec3 {
        let step = self.velocity * delta;
        self.velocity *= (1.0 - Self::DECAY * delta).max(0.0);
        if self.velocity.length_squared() < 1e-4 {
            self.velocity = Vec3::ZERO;
        }
        step
    }
}

/// Marker for enemies that have died (prevents multiple death events).
#[derive(Component)]
pub struct Dead;

/// Timer for the death pose before despawn.
#[derive(Component)]
pub struct DeathTimer(pub Timer);

impl Default for DeathTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(1.5, TimerMode::Once))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_floors_at_zero() {
        let mut health = Health::new(10);
        health.take_damage(25);
        assert_eq!(health.current_health(), 0);
        assert!(health.is_dead());
    }

    #[test]
    fn knockback_decays_to_rest() {
        let mut knockback = Knockback::default();
        knockback.push(Vec3::X * 4.0);
        let mut travelled = Vec3::ZERO;
        for _ in 0..120 {
            travelled += knockback.advance(1.0 / 60.0);
        }
        assert_eq!(knockback.velocity, Vec3::ZERO);
        assert!(travelled.x > 0.3);
    }
}
