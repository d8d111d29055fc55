//! Boomerang tunables loaded from an external RON file.
//!
//! Values are read once at startup and never change at runtime. Any field
//! missing from the file keeps its default.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::Ease;

/// Default location of the boomerang tunables.
pub const WEAPON_CONFIG_PATH: &str = "assets/data/weapon/boomerang.ron";

/// Errors that can occur when loading weapon tunables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    Read { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error: {details}")]
    Parse { details: String },

    /// A value is outside the range the weapon can work with.
    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// All boomerang tunables.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    // Damage
    pub base_damage: f32,
    /// Damage multiplier applied to thrown hits
    pub throw_damage_multiplier: f32,
    pub knockback_force: f32,

    // Throw
    pub throw_speed: f32,
    /// Added to the aim direction's Y before scaling by throw speed
    pub throw_upward_bias: f32,
    /// Spin around the weapon's up axis, radians per second
    pub spin_speed: f32,
    /// Delay after a catch before the next throw is accepted
    pub throw_cooldown: f32,
    /// Enemy overlaps are ignored this long after release
    pub collision_grace: f32,

    // Flight monitor
    pub flight_sample_interval: f32,
    pub rest_speed_threshold: f32,
    pub rest_duration: f32,
    pub max_flight_time: f32,

    // Landing and safety valves
    /// Landing farther than this from the wielder schedules an auto-return
    pub return_distance: f32,
    pub auto_return_delay: f32,
    /// World height below which the weapon counts as lost in the void
    pub void_depth: f32,
    /// A grounded weapon farther than this is force-returned
    pub grounded_max_distance: f32,
    pub pickup_radius: f32,

    // Return arc
    pub return_speed: f32,
    pub return_min_duration: f32,
    pub return_max_duration: f32,
    pub arc_height: f32,
    pub catch_radius: f32,
    pub return_ease: Ease,

    // Carried pose
    /// Weapon anchor offset relative to the view camera
    pub hold_offset: (f32, f32, f32),
    /// Return target height above the wielder's origin
    pub hold_height: f32,

    // Flight physics
    pub gravity: f32,
    pub linear_damping: f32,
    pub restitution: f32,
    pub friction: f32,
    pub weapon_radius: f32,
    /// Radius of the overlap test against enemies while thrown
    pub hit_radius: f32,

    // Aiming
    pub aim_max_distance: f32,
    /// Gravity compensation engages once the throw button is held this long
    pub aim_settle_time: f32,
    pub aim_fallback_lift: f32,

    // Costs paid from the wielder's mana
    pub throw_cost: f32,
    pub melee_cost: f32,

    // Melee
    pub combo_window: f32,
    /// Radius of the swing's overlap sphere in front of the wielder
    pub melee_reach: f32,
    pub swing_windup: f32,
    pub swing_active: f32,
    pub swing_recovery: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            base_damage: 10.0,
            throw_damage_multiplier: 2.0,
            knockback_force: 4.0,

            throw_speed: 22.0,
            throw_upward_bias: 0.08,
            spin_speed: 18.0,
            throw_cooldown: 0.25,
            collision_grace: 0.08,

            flight_sample_interval: 0.05,
            rest_speed_threshold: 0.4,
            rest_duration: 0.3,
            max_flight_time: 8.0,

            return_distance: 14.0,
            auto_return_delay: 1.0,
            void_depth: -25.0,
            grounded_max_distance: 80.0,
            pickup_radius: 2.5,

            return_speed: 24.0,
            return_min_duration: 0.3,
            return_max_duration: 1.4,
            arc_height: 1.6,
            catch_radius: 0.6,
            return_ease: Ease::SineInOut,

            hold_offset: (0.35, -0.25, -0.6),
            hold_height: 0.4,

            gravity: 9.81,
            linear_damping: 0.35,
            restitution: 0.25,
            friction: 0.55,
            weapon_radius: 0.25,
            hit_radius: 0.45,

            aim_max_distance: 120.0,
            aim_settle_time: 0.15,
            aim_fallback_lift: 0.06,

            throw_cost: 12.0,
            melee_cost: 4.0,

            combo_window: 0.7,
            melee_reach: 1.2,
            swing_windup: 0.08,
            swing_active: 0.14,
            swing_recovery: 0.18,
        }
    }
}

impl WeaponConfig {
    /// Parse and validate tunables from RON text.
    pub fn from_ron(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(contents).map_err(|e| ConfigError::Parse {
            details: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a tunables file.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        Self::from_ron(&contents)
    }

    /// Load tunables, falling back to defaults on any failure.
    pub fn load() -> Self {
        match Self::try_load(WEAPON_CONFIG_PATH) {
            Ok(config) => {
                info!("Loaded weapon config from {}", WEAPON_CONFIG_PATH);
                config
            }
            Err(e @ ConfigError::Read { .. }) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
            Err(e) => {
                error!("Bad weapon config {}: {}. Using defaults.", WEAPON_CONFIG_PATH, e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("throw_speed", self.throw_speed),
            ("return_speed", self.return_speed),
            ("flight_sample_interval", self.flight_sample_interval),
            ("max_flight_time", self.max_flight_time),
            ("return_min_duration", self.return_min_duration),
            ("catch_radius", self.catch_radius),
            ("weapon_radius", self.weapon_radius),
            ("hit_radius", self.hit_radius),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }

        let non_negative = [
            ("base_damage", self.base_damage),
            ("throw_damage_multiplier", self.throw_damage_multiplier),
            ("throw_cooldown", self.throw_cooldown),
            ("collision_grace", self.collision_grace),
            ("rest_duration", self.rest_duration),
            ("auto_return_delay", self.auto_return_delay),
            ("pickup_radius", self.pickup_radius),
            ("throw_cost", self.throw_cost),
            ("melee_cost", self.melee_cost),
            ("combo_window", self.combo_window),
            ("swing_windup", self.swing_windup),
            ("swing_active", self.swing_active),
            ("swing_recovery", self.swing_recovery),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must not be negative, got {value}"),
                });
            }
        }

        if self.return_max_duration < self.return_min_duration {
            return Err(ConfigError::Invalid {
                field: "return_max_duration",
                reason: format!(
                    "{} is below return_min_duration {}",
                    self.return_max_duration, self.return_min_duration
                ),
            });
        }

        if !(0.0..=1.0).contains(&self.restitution) || !(0.0..=1.0).contains(&self.friction) {
            return Err(ConfigError::Invalid {
                field: "restitution/friction",
                reason: "must lie in [0, 1]".to_string(),
            });
        }

        Ok(())
    }

    pub fn hold_offset(&self) -> Vec3 {
        Vec3::new(self.hold_offset.0, self.hold_offset.1, self.hold_offset.2)
    }

    /// Damage a thrown hit deals before the wielder's multiplier.
    pub fn throw_damage(&self) -> f32 {
        self.base_damage * self.throw_damage_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = WeaponConfig::from_ron("(throw_speed: 30.0, return_ease: QuadIn)").unwrap();
        assert_eq!(config.throw_speed, 30.0);
        assert_eq!(config.return_ease, Ease::QuadIn);
        assert_eq!(config.base_damage, WeaponConfig::default().base_damage);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = WeaponConfig::from_ron("(throw_speed: fast)").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn inverted_duration_band_is_rejected() {
        let err = WeaponConfig::from_ron("(return_min_duration: 2.0, return_max_duration: 1.0)")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "return_max_duration", .. }));
    }

    #[test]
    fn zero_throw_speed_is_rejected() {
        let err = WeaponConfig::from_ron("(throw_speed: 0.0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "throw_speed", .. }));
    }

    #[test]
    fn negative_timings_are_rejected() {
        let err = WeaponConfig::from_ron("(auto_return_delay: -1.0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "auto_return_delay", .. }));

        let err = WeaponConfig::from_ron("(swing_active: -0.1)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "swing_active", .. }));

        assert!(WeaponConfig::from_ron("(swing_windup: 0.0, rest_duration: 0.0)").is_ok());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = WeaponConfig::try_load("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn shipped_file_loads() {
        let config = WeaponConfig::try_load(WEAPON_CONFIG_PATH).unwrap();
        assert_eq!(config.return_distance, WeaponConfig::default().return_distance);
    }

    #[test]
    fn defaults_are_valid() {
        assert!(WeaponConfig::default().validate().is_ok());
    }
}
