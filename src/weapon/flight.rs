//! Flight monitor - decides when a thrown weapon has come to rest.
//!
//! Speed is sampled on a fixed cadence rather than every frame, so the
//! verdict does not depend on frame rate. The monitor is owned by the flying
//! phase; leaving that phase drops it, which is all cancellation needs.

use super::config::WeaponConfig;

/// What the monitor concluded this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightVerdict {
    Airborne,
    /// Speed stayed under the rest threshold for the full rest duration
    Landed,
    /// Maximum flight time ran out first
    TimedOut,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightMonitor {
    elapsed: f32,
    sample_clock: f32,
    still_samples: u32,
}

/// Slack for accumulated float error when comparing sampled durations.
const SAMPLE_EPSILON: f32 = 1e-4;

impl FlightMonitor {
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Continuous low-speed time accumulated so far.
    pub fn still_for(&self, config: &WeaponConfig) -> f32 {
        self.still_samples as f32 * config.flight_sample_interval
    }

    /// Advance by `dt` with the weapon currently moving at `speed`.
    pub fn advance(&mut self, dt: f32, speed: f32, config: &WeaponConfig) -> FlightVerdict {
        self.elapsed += dt;
        self.sample_clock += dt;

        let interval = config.flight_sample_interval;
        while self.sample_clock >= interval {
            self.sample_clock -= interval;
            if speed < config.rest_speed_threshold {
                self.still_samples += 1;
            } else {
                self.still_samples = 0;
            }
            if self.still_for(config) + SAMPLE_EPSILON >= config.rest_duration {
                return FlightVerdict::Landed;
            }
        }

        if self.elapsed >= config.max_flight_time {
            FlightVerdict::TimedOut
        } else {
            FlightVerdict::Airborne
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WeaponConfig {
        WeaponConfig {
            flight_sample_interval: 0.05,
            rest_speed_threshold: 0.5,
            rest_duration: 0.3,
            max_flight_time: 8.0,
            ..Default::default()
        }
    }

    #[test]
    fn fast_weapon_stays_airborne() {
        let config = config();
        let mut monitor = FlightMonitor::default();
        for _ in 0..60 {
            assert_eq!(monitor.advance(1.0 / 60.0, 10.0, &config), FlightVerdict::Airborne);
        }
    }

    #[test]
    fn sustained_low_speed_lands() {
        let config = config();
        let mut monitor = FlightMonitor::default();
        let mut ticks = 0;
        while monitor.advance(0.05, 0.1, &config) == FlightVerdict::Airborne {
            ticks += 1;
            assert!(ticks < 20);
        }
        // Six samples of 0.05 s reach the 0.3 s rest duration.
        assert!((monitor.still_for(&config) - 0.3).abs() < 1e-4);
        assert_eq!(ticks, 5);
    }

    #[test]
    fn a_fast_sample_resets_the_still_timer() {
        let config = config();
        let mut monitor = FlightMonitor::default();
        for _ in 0..4 {
            monitor.advance(0.05, 0.1, &config);
        }
        monitor.advance(0.05, 3.0, &config);
        assert_eq!(monitor.still_for(&config), 0.0);
    }

    #[test]
    fn hard_ceiling_forces_a_verdict() {
        let config = WeaponConfig {
            max_flight_time: 1.0,
            ..config()
        };
        let mut monitor = FlightMonitor::default();
        let mut verdict = FlightVerdict::Airborne;
        for _ in 0..25 {
            verdict = monitor.advance(0.05, 5.0, &config);
            if verdict != FlightVerdict::Airborne {
                break;
            }
        }
        assert_eq!(verdict, FlightVerdict::TimedOut);
    }

    #[test]
    fn large_frame_takes_several_samples() {
        let config = config();
        let mut monitor = FlightMonitor::default();
        assert_eq!(monitor.advance(0.35, 0.0, &config), FlightVerdict::Landed);
    }
}
