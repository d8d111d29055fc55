//! Easing curves shared by anything that animates over normalized progress.

use serde::Deserialize;
use std::f32::consts::PI;

/// Easing curve applied to a normalized progress value.
///
/// Every curve maps 0 to 0 and 1 to 1; inputs outside `[0, 1]` are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Ease {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    #[default]
    SineInOut,
    CubicOut,
}

impl Ease {
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadIn => t * t,
            Ease::QuadOut => t * (2.0 - t),
            Ease::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) * 0.5
                }
            }
            Ease::SineInOut => -((PI * t).cos() - 1.0) * 0.5,
            Ease::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 6] = [
        Ease::Linear,
        Ease::QuadIn,
        Ease::QuadOut,
        Ease::QuadInOut,
        Ease::SineInOut,
        Ease::CubicOut,
    ];

    #[test]
    fn curves_pin_endpoints() {
        for ease in ALL {
            assert!(ease.sample(0.0).abs() < 1e-6, "{ease:?} at 0");
            assert!((ease.sample(1.0) - 1.0).abs() < 1e-6, "{ease:?} at 1");
        }
    }

    #[test]
    fn curves_clamp_out_of_range_input() {
        for ease in ALL {
            assert_eq!(ease.sample(-3.0), ease.sample(0.0));
            assert_eq!(ease.sample(7.5), ease.sample(1.0));
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for ease in ALL {
            let mut last = 0.0;
            for i in 1..=20 {
                let value = ease.sample(i as f32 / 20.0);
                assert!(value >= last - 1e-6, "{ease:?} dipped at step {i}");
                last = value;
            }
        }
    }
}
