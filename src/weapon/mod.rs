//! Weapon module - the throwable, returnable boomerang.
//!
//! The state machine and its helpers (`machine`, `flight`, `recall`,
//! `damage`, `physics`, `aim`, `melee`) are plain Rust driven by explicit
//! ticks. `systems` and `feedback` connect them to Bevy and rapier.

mod aim;
mod components;
mod config;
mod damage;
mod feedback;
mod flight;
mod machine;
mod melee;
mod physics;
mod plugin;
mod recall;
mod systems;

pub use aim::{aim_direction, AimState, AimView, IndicatorState};
pub use components::*;
pub use config::{ConfigError, WeaponConfig, WEAPON_CONFIG_PATH};
pub use damage::DamageTrigger;
pub use feedback::{ScreenShake, WeaponCue};
pub use flight::{FlightMonitor, FlightVerdict};
pub use machine::Boomerang;
pub use melee::{MeleeCombo, SwingMarker, SwingTimeline};
pub use physics::{knockback_from, FlightBody, FlightSpace, SurfaceHit};
pub use plugin::{spawn_boomerang, WeaponPlugin};
pub use recall::{ReturnController, ReturnStep};
pub use systems::WeaponSet;
