//! Weapon feedback - logs, audio cues and camera shake driven by the
//! signals the state machine produces.

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl, AudioSource};
use rand::Rng;

use super::components::{ReturnCause, WeaponSignal};
use super::machine::Boomerang;
use crate::player::{PlayerCamera, PlayerConfig};

/// Audible moments in the weapon's life.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponCue {
    Throw,
    Swing,
    Hit,
    Land,
    Return,
    Catch,
}

/// Loaded cue sounds.
#[derive(Resource)]
pub struct WeaponSounds {
    pub throw: Handle<AudioSource>,
    pub swing: Handle<AudioSource>,
    pub hit: Handle<AudioSource>,
    pub land: Handle<AudioSource>,
    pub whoosh: Handle<AudioSource>,
    pub catch: Handle<AudioSource>,
}

impl WeaponSounds {
    fn get(&self, cue: WeaponCue) -> Handle<AudioSource> {
        match cue {
            WeaponCue::Throw => self.throw.clone(),
            WeaponCue::Swing => self.swing.clone(),
            WeaponCue::Hit => self.hit.clone(),
            WeaponCue::Land => self.land.clone(),
            WeaponCue::Return => self.whoosh.clone(),
            WeaponCue::Catch => self.catch.clone(),
        }
    }
}

pub fn load_weapon_sounds(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(WeaponSounds {
        throw: asset_server.load("audio/weapon/throw.ogg"),
        swing: asset_server.load("audio/weapon/swing.ogg"),
        hit: asset_server.load("audio/weapon/hit.ogg"),
        land: asset_server.load("audio/weapon/land.ogg"),
        whoosh: asset_server.load("audio/weapon/return.ogg"),
        catch: asset_server.load("audio/weapon/catch.ogg"),
    });
}

/// Drain weapon signals into log lines and cue events.
pub fn emit_weapon_cues(
    mut weapon_query: Query<&mut Boomerang>,
    mut cues: EventWriter<WeaponCue>,
) {
    for mut weapon in weapon_query.iter_mut() {
        let outcome = weapon.last_outcome();
        let signals: Vec<_> = weapon.drain_signals().collect();
        for signal in signals {
            let cue = match signal {
                WeaponSignal::Thrown { .. } => WeaponCue::Throw,
                WeaponSignal::Swing(variant) => {
                    debug!("Swing {:?}", variant);
                    WeaponCue::Swing
                }
                WeaponSignal::Struck(strike) => {
                    debug!("Weapon hit for {} (thrown: {})", strike.amount, strike.thrown);
                    WeaponCue::Hit
                }
                WeaponSignal::Landed { distance } => {
                    debug!("Boomerang landed {:.1}m from the wielder", distance);
                    WeaponCue::Land
                }
                WeaponSignal::ReturnStarted(cause) => {
                    if cause != ReturnCause::EnemyHit {
                        info!("Boomerang returning ({:?})", cause);
                    }
                    WeaponCue::Return
                }
                WeaponSignal::Caught { completed } | WeaponSignal::PickedUp { completed } => {
                    info!("Throw {} complete: {:?}", completed, outcome);
                    WeaponCue::Catch
                }
            };
            cues.send(cue);
        }
    }
}

/// Fire each cue once with a little pitch variation.
pub fn play_weapon_cues(
    mut cues: EventReader<WeaponCue>,
    audio: Res<Audio>,
    sounds: Option<Res<WeaponSounds>>,
) {
    let Some(sounds) = sounds else {
        cues.clear();
        return;
    };
    let mut rng = rand::thread_rng();
    for cue in cues.read() {
        audio
            .play(sounds.get(*cue))
            .with_playback_rate(rng.gen_range(0.93..1.07));
    }
}

/// Screen shake effect resource.
#[derive(Resource, Default)]
pub struct ScreenShake {
    pub intensity: f32,
    pub duration: f32,
    pub timer: f32,
}

impl ScreenShake {
    pub fn shake(&mut self, intensity: f32, duration: f32) {
        // Only override if new shake is stronger
        if intensity > self.intensity || self.timer <= 0.0 {
            self.intensity = intensity;
            self.duration = duration;
            self.timer = duration;
        }
    }

    /// Camera offset for this frame.
    pub fn update(&mut self, delta: f32, rng: &mut impl Rng) -> Vec3 {
        if self.timer <= 0.0 {
            return Vec3::ZERO;
        }

        self.timer = (self.timer - delta).max(0.0);
        let current = self.intensity * self.timer / self.duration;
        Vec3::new(
            rng.gen_range(-1.0..=1.0) * current,
            rng.gen_range(-1.0..=1.0) * current,
            0.0,
        )
    }
}

pub fn shake_on_hit(mut cues: EventReader<WeaponCue>, mut shake: ResMut<ScreenShake>) {
    if cues.read().any(|cue| *cue == WeaponCue::Hit) {
        shake.shake(0.06, 0.15);
    }
}

/// Offset the camera around its eye position.
pub fn update_screen_shake(
    real_time: Res<Time<Real>>,
    config: Res<PlayerConfig>,
    mut shake: ResMut<ScreenShake>,
    mut camera_query: Query<&mut Transform, With<PlayerCamera>>,
) {
    let offset = shake.update(real_time.delta_secs(), &mut rand::thread_rng());
    if let Ok(mut transform) = camera_query.get_single_mut() {
        transform.translation = Vec3::Y * config.eye_height + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn stronger_shake_overrides_weaker() {
        let mut shake = ScreenShake::default();
        shake.shake(0.1, 0.2);
        shake.shake(0.05, 1.0);
        assert_eq!(shake.intensity, 0.1);
        shake.shake(0.3, 0.1);
        assert_eq!(shake.intensity, 0.3);
    }

    #[test]
    fn shake_fades_out() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut shake = ScreenShake::default();
        shake.shake(0.5, 0.2);
        let first = shake.update(0.05, &mut rng);
        assert!(first.length() <= 0.5 * 2f32.sqrt());
        for _ in 0..10 {
            shake.update(0.05, &mut rng);
        }
        assert_eq!(shake.update(0.05, &mut rng), Vec3::ZERO);
    }
}
