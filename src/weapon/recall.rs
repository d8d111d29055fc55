//! Return controller - flies the weapon back along a rising arc.
//!
//! The arc is re-evaluated against the wielder's live hold point every tick,
//! so a moving wielder is tracked all the way in.

use bevy::prelude::*;
use std::f32::consts::PI;

use super::config::WeaponConfig;
use crate::core::Ease;

/// Result of advancing the return by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStep {
    pub position: Vec3,
    /// Unit direction of travel this tick, if the weapon moved
    pub heading: Option<Vec3>,
    pub progress: f32,
    /// Distance left to the hold point after this step
    pub remaining: f32,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnController {
    start: Vec3,
    last: Vec3,
    elapsed: f32,
    duration: f32,
    arc_height: f32,
    catch_radius: f32,
    ease: Ease,
}

impl ReturnController {
    /// Plan a return from `start` toward a wielder currently at `target`.
    pub fn begin(start: Vec3, target: Vec3, config: &WeaponConfig) -> Self {
        let duration = (start.distance(target) / config.return_speed)
            .clamp(config.return_min_duration, config.return_max_duration);
        Self {
            start,
            last: start,
            elapsed: 0.0,
            duration,
            arc_height: config.arc_height,
            catch_radius: config.catch_radius,
            ease: config.return_ease,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).min(1.0)
    }

    /// Advance by `dt` toward the live hold point `target`.
    pub fn advance(&mut self, dt: f32, target: Vec3) -> ReturnStep {
        self.elapsed += dt;
        let progress = self.progress();
        let eased = self.ease.sample(progress);

        let position =
            self.start.lerp(target, eased) + Vec3::Y * (eased * PI).sin() * self.arc_height;

        let heading = (position - self.last).try_normalize();
        self.last = position;

        let remaining = position.distance(target);
        ReturnStep {
            position,
            heading,
            progress,
            remaining,
            complete: progress >= 1.0 || remaining <= self.catch_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WeaponConfig {
        WeaponConfig {
            return_speed: 10.0,
            return_min_duration: 0.3,
            return_max_duration: 1.5,
            arc_height: 2.0,
            catch_radius: 0.5,
            return_ease: Ease::Linear,
            ..Default::default()
        }
    }

    #[test]
    fn duration_is_clamped_to_band() {
        let config = config();
        let near = ReturnController::begin(Vec3::ZERO, Vec3::X, &config);
        assert_eq!(near.duration(), 0.3);
        let far = ReturnController::begin(Vec3::ZERO, Vec3::X * 100.0, &config);
        assert_eq!(far.duration(), 1.5);
        let mid = ReturnController::begin(Vec3::ZERO, Vec3::X * 10.0, &config);
        assert!((mid.duration() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn arc_peaks_midway_above_the_straight_line() {
        let config = config();
        let target = Vec3::new(10.0, 0.0, 0.0);
        let mut controller = ReturnController::begin(Vec3::ZERO, target, &config);
        let step = controller.advance(0.5, target);
        assert!((step.progress - 0.5).abs() < 1e-5);
        assert!((step.position.y - 2.0).abs() < 1e-4);
        assert!((step.position.x - 5.0).abs() < 1e-4);
        assert!(!step.complete);
    }

    #[test]
    fn full_progress_completes_even_when_far() {
        let config = WeaponConfig {
            catch_radius: 0.01,
            ..config()
        };
        let start = Vec3::new(10.0, 0.0, 0.0);
        let mut controller = ReturnController::begin(start, Vec3::ZERO, &config);
        // The wielder runs away; progress still finishes the return.
        let step = controller.advance(controller.duration(), Vec3::new(-30.0, 0.0, 0.0));
        assert_eq!(step.progress, 1.0);
        assert!(step.complete);
    }

    #[test]
    fn closing_wielder_shortcuts_the_arc() {
        let config = config();
        let mut controller = ReturnController::begin(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, &config);
        let step = controller.advance(0.01, Vec3::new(10.2, 0.0, 0.0));
        assert!(step.progress < 1.0);
        assert!(step.complete);
    }

    #[test]
    fn heading_follows_travel() {
        let config = config();
        let target = Vec3::new(0.0, 0.0, -10.0);
        let mut controller = ReturnController::begin(Vec3::ZERO, target, &config);
        let step = controller.advance(0.1, target);
        let heading = step.heading.unwrap();
        assert!(heading.z < 0.0);
        assert!(heading.y > 0.0);
    }
}
