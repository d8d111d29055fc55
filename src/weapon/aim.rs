//! Throw aiming from the centre of the view.

use bevy::prelude::*;

use super::config::WeaponConfig;

/// The view ray through the centre of the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimView {
    pub origin: Vec3,
    pub forward: Vec3,
}

/// What the view ray sees this frame and how long the throw has been held.
#[derive(Resource, Debug, Default)]
pub struct AimState {
    pub view: Option<AimView>,
    /// Where the view ray struck world geometry
    pub surface: Option<Vec3>,
    /// The view ray is resting on a living enemy
    pub on_target: bool,
    pub aiming: bool,
    /// Unscaled seconds the throw button has been held
    pub held_for: f32,
}

/// Crosshair feedback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorState {
    #[default]
    Idle,
    Aiming,
    OnTarget,
    /// The weapon is away or the throw cannot be afforded
    Unavailable,
}

/// Direction to release the weapon in.
///
/// `surface` is where the view ray struck world geometry, if anywhere.
/// Gravity compensation only engages once the throw button has been held for
/// the settle time. Without a view the wielder's forward default is used.
pub fn aim_direction(
    view: Option<AimView>,
    hand: Vec3,
    surface: Option<Vec3>,
    aim_held_for: f32,
    config: &WeaponConfig,
) -> Vec3 {
    let Some(view) = view else {
        return Vec3::NEG_Z;
    };

    let fallback = || {
        (view.forward.normalize_or(Vec3::NEG_Z) + Vec3::Y * config.aim_fallback_lift)
            .normalize_or(Vec3::NEG_Z)
    };

    let Some(point) = surface else {
        return fallback();
    };

    let mut direction = point - hand;
    if aim_held_for >= config.aim_settle_time {
        let flight_time = direction.length() / config.throw_speed;
        direction.y += flight_time * flight_time * config.gravity * 0.5;
    }
    direction.try_normalize().unwrap_or_else(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> AimView {
        AimView {
            origin: Vec3::new(0.0, 1.6, 0.0),
            forward: Vec3::NEG_Z,
        }
    }

    fn config() -> WeaponConfig {
        WeaponConfig {
            throw_speed: 10.0,
            gravity: 10.0,
            aim_settle_time: 0.15,
            aim_fallback_lift: 0.1,
            ..Default::default()
        }
    }

    #[test]
    fn missing_view_falls_back_to_forward() {
        let dir = aim_direction(None, Vec3::ZERO, Some(Vec3::X), 1.0, &config());
        assert_eq!(dir, Vec3::NEG_Z);
    }

    #[test]
    fn open_air_lifts_view_forward() {
        let dir = aim_direction(Some(view()), Vec3::ZERO, None, 1.0, &config());
        assert!(dir.y > 0.0);
        assert!(dir.z < -0.9);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn quick_release_aims_straight_at_surface() {
        let hand = Vec3::new(0.0, 1.0, 0.0);
        let point = Vec3::new(0.0, 1.0, -20.0);
        let dir = aim_direction(Some(view()), hand, Some(point), 0.0, &config());
        assert!((dir - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn settled_aim_compensates_for_drop() {
        let hand = Vec3::new(0.0, 1.0, 0.0);
        let point = Vec3::new(0.0, 1.0, -20.0);
        let dir = aim_direction(Some(view()), hand, Some(point), 0.5, &config());
        // (20 / 10)^2 * 10 * 0.5 = 20 units of lift over 20 units of reach.
        assert!((dir.y - dir.z.abs()).abs() < 1e-5);
    }
}
