//! Flight physics driver for a thrown weapon.
//!
//! The weapon is not a rapier dynamic body. Its flight is integrated here and
//! swept against world geometry through [`FlightSpace`], which lets the scene
//! query skip the wielder entirely while the weapon is airborne.

use bevy::prelude::*;

use super::components::WeaponPose;
use super::config::WeaponConfig;

/// A contact found by a flight sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Fraction of the swept motion travelled before contact, in `[0, 1]`
    pub fraction: f32,
    /// Unit surface normal facing the weapon
    pub normal: Vec3,
}

/// World geometry the flying weapon can collide with.
pub trait FlightSpace {
    /// Sweep a sphere of `radius` from `origin` along `motion`.
    fn sweep(&self, origin: Vec3, motion: Vec3, radius: f32) -> Option<SurfaceHit>;
}

/// No geometry at all.
impl FlightSpace for () {
    fn sweep(&self, _origin: Vec3, _motion: Vec3, _radius: f32) -> Option<SurfaceHit> {
        None
    }
}

/// Normals with a Y component above this count as floor.
const FLOOR_NORMAL_Y: f32 = 0.7;

/// Speed below which a floor contact stops the weapon outright.
const SETTLE_SPEED: f32 = 0.6;

/// Lift off a contact surface so the next sweep starts clear of it.
const SKIN: f32 = 0.01;

/// Integrates gravity, damping, spin and contact response for a flying weapon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightBody {
    pub gravity: f32,
    pub linear_damping: f32,
    pub restitution: f32,
    pub friction: f32,
    pub radius: f32,
}

impl FlightBody {
    pub fn from_config(config: &WeaponConfig) -> Self {
        Self {
            gravity: config.gravity,
            linear_damping: config.linear_damping,
            restitution: config.restitution,
            friction: config.friction,
            radius: config.weapon_radius,
        }
    }

    /// Advance `pose` by `dt`, returning the contact if one was made.
    pub fn step(&self, pose: &mut WeaponPose, dt: f32, space: &impl FlightSpace) -> Option<SurfaceHit> {
        if dt <= 0.0 {
            return None;
        }

        // Resting on a floor: hold still instead of sinking and re-bouncing.
        if pose.speed() < SETTLE_SPEED {
            if let Some(hit) = space.sweep(pose.position, Vec3::NEG_Y * SKIN * 2.0, self.radius) {
                if hit.normal.y > FLOOR_NORMAL_Y {
                    pose.freeze();
                    return Some(hit);
                }
            }
        }

        pose.velocity.y -= self.gravity * dt;
        pose.velocity /= 1.0 + self.linear_damping * dt;
        pose.rotation = (Quat::from_scaled_axis(pose.angular_velocity * dt) * pose.rotation).normalize();

        let motion = pose.velocity * dt;
        let Some(hit) = space.sweep(pose.position, motion, self.radius) else {
            pose.position += motion;
            return None;
        };

        pose.position += motion * hit.fraction + hit.normal * SKIN;

        let normal_speed = pose.velocity.dot(hit.normal);
        if normal_speed < 0.0 {
            let normal_part = hit.normal * normal_speed;
            let tangent_part = pose.velocity - normal_part;
            pose.velocity = tangent_part * (1.0 - self.friction) - normal_part * self.restitution;
            pose.angular_velocity *= 1.0 - self.friction;
        }

        if hit.normal.y > FLOOR_NORMAL_Y && pose.velocity.length() < SETTLE_SPEED {
            pose.freeze();
        }

        Some(hit)
    }
}

/// Horizontal knockback for a weapon travelling along `direction`.
pub fn knockback_from(direction: Vec3, force: f32) -> Vec3 {
    Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero() * force
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Infinite floor at y = 0.
    struct Floor;

    impl FlightSpace for Floor {
        fn sweep(&self, origin: Vec3, motion: Vec3, radius: f32) -> Option<SurfaceHit> {
            let bottom = origin.y - radius;
            let end = bottom + motion.y;
            if motion.y >= 0.0 || end > 0.0 {
                return None;
            }
            Some(SurfaceHit {
                fraction: (bottom / -motion.y).clamp(0.0, 1.0),
                normal: Vec3::Y,
            })
        }
    }

    fn body() -> FlightBody {
        FlightBody {
            gravity: 10.0,
            linear_damping: 0.0,
            restitution: 0.3,
            friction: 0.5,
            radius: 0.2,
        }
    }

    #[test]
    fn gravity_bends_free_flight() {
        let mut pose = WeaponPose::at(Vec3::new(0.0, 10.0, 0.0));
        pose.velocity = Vec3::new(5.0, 0.0, 0.0);
        assert!(body().step(&mut pose, 0.1, &()).is_none());
        assert!((pose.velocity.y + 1.0).abs() < 1e-5);
        assert!(pose.position.x > 0.4);
        assert!(pose.position.y < 10.0);
    }

    #[test]
    fn floor_contact_reflects_and_slows() {
        let mut pose = WeaponPose::at(Vec3::new(0.0, 0.25, 0.0));
        pose.velocity = Vec3::new(4.0, -10.0, 0.0);
        let hit = body().step(&mut pose, 0.1, &Floor);
        assert!(hit.is_some());
        assert!(pose.velocity.y > 0.0);
        assert!(pose.velocity.x < 4.0);
        assert!(pose.position.y >= 0.2);
    }

    #[test]
    fn thrown_weapon_comes_to_rest_on_floor() {
        let mut pose = WeaponPose::at(Vec3::new(0.0, 1.5, 0.0));
        pose.velocity = Vec3::new(8.0, 2.0, 0.0);
        pose.angular_velocity = Vec3::Y * 15.0;
        let body = body();
        for _ in 0..600 {
            body.step(&mut pose, 1.0 / 60.0, &Floor);
        }
        assert_eq!(pose.velocity, Vec3::ZERO);
        assert!(pose.position.y >= 0.19);
    }

    #[test]
    fn spin_rotates_the_weapon() {
        let mut pose = WeaponPose::at(Vec3::new(0.0, 50.0, 0.0));
        pose.angular_velocity = Vec3::Y * std::f32::consts::PI;
        body().step(&mut pose, 0.5, &());
        let (axis, angle) = pose.rotation.to_axis_angle();
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
        assert!(axis.y > 0.99);
    }

    #[test]
    fn knockback_ignores_vertical_travel() {
        let push = knockback_from(Vec3::new(3.0, -4.0, 0.0), 2.0);
        assert_eq!(push, Vec3::new(2.0, 0.0, 0.0));
    }
}
