//! Weapon-facing data types and the seams to the weapon's collaborators.

use bevy::prelude::*;

/// Which of the four weapon states is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeaponState {
    /// Attached to the wielder's carried anchor
    Held,
    /// Released and travelling under flight physics
    Flying,
    /// Following the return arc back to the wielder
    Returning,
    /// Lying in the world waiting for pickup
    #[default]
    Grounded,
}

/// What ended the last throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThrowOutcome {
    #[default]
    None,
    HitEnemy,
    HitWall,
    FellInVoid,
    AutoReturned,
}

/// Why a return arc started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnCause {
    EnemyHit,
    /// Landed beyond the return distance and the wait elapsed
    Distance,
    /// Grounded weapon drifted beyond the safety distance
    Stray,
    Void,
    /// Wielder called the weapon back
    Recall,
}

impl ReturnCause {
    /// Outcome recorded when nothing earlier in the throw claimed one.
    pub fn outcome(self) -> ThrowOutcome {
        match self {
            ReturnCause::EnemyHit => ThrowOutcome::HitEnemy,
            ReturnCause::Void => ThrowOutcome::FellInVoid,
            ReturnCause::Distance | ReturnCause::Stray | ReturnCause::Recall => {
                ThrowOutcome::AutoReturned
            }
        }
    }
}

/// Which melee swing animation plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwingVariant {
    Left,
    Right,
}

/// How the weapon's collider participates in the physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderMode {
    /// Overlap-only while carried
    Carried,
    /// Solid world object
    Solid,
}

/// World-space pose of the weapon while it is not carried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    /// Axis times radians per second
    pub angular_velocity: Vec3,
}

impl WeaponPose {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Zero all motion.
    pub fn freeze(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }
}

impl Default for WeaponPose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Where the wielder is this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wielder {
    /// Body origin, used for distance checks
    pub position: Vec3,
    /// Point the return arc homes in on
    pub hold_point: Vec3,
}

impl Wielder {
    pub fn new(position: Vec3, hold_height: f32) -> Self {
        Self {
            position,
            hold_point: position + Vec3::Y * hold_height,
        }
    }
}

/// Abilities and resources the wielder lends to the weapon.
pub trait WielderContext {
    /// Live damage multiplier, at least 1.0.
    fn damage_multiplier(&self) -> f32;
    /// Spend the throw cost if affordable.
    fn try_spend_throw_cost(&mut self) -> bool;
    /// Spend the melee cost if affordable.
    fn try_spend_melee_cost(&mut self) -> bool;
}

/// Anything the weapon can hurt.
pub trait Damageable {
    fn current_health(&self) -> i32;
    fn take_damage(&mut self, amount: i32);
}

/// Outcome of a single successful hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub amount: i32,
    pub thrown: bool,
    pub killed: bool,
    /// Direction the weapon was travelling, zero for melee
    pub direction: Vec3,
}

/// Something observable that happened to the weapon.
///
/// Returned by every weapon operation so the ECS layer can turn them into
/// logs, audio cues and events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponSignal {
    Thrown { velocity: Vec3 },
    Swing(SwingVariant),
    Struck(Strike),
    Landed { distance: f32 },
    ReturnStarted(ReturnCause),
    Caught { completed: u32 },
    PickedUp { completed: u32 },
}

/// Marker for the entity the weapon attaches to while held.
#[derive(Component)]
pub struct WeaponAnchor;

/// Links a weapon entity to its wielder and carried anchor.
#[derive(Component)]
pub struct WeaponLink {
    pub wielder: Entity,
    pub anchor: Entity,
    /// Whether the entity is currently parented to the anchor
    pub attached: bool,
}
