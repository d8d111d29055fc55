//! Global events used for cross-system communication.
//!
//! The weapon never touches enemy health through ECS queries directly; hits
//! are resolved against the `Damageable` seam and then broadcast here so that
//! knockback, death handling and feedback stay decoupled.

use bevy::prelude::*;

/// Sent after damage has been applied to an entity.
///
/// Listeners use it for knockback and hit feedback. The health change itself
/// already happened when the event is read.
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage
    pub source: Entity,
    /// Integer damage actually applied
    pub amount: i32,
    /// Knockback direction and force
    pub knockback: Vec3,
}

/// Sent when an entity dies (health reaches 0).
#[derive(Event, Debug, Clone)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}
