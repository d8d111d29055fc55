//! Melee swings while the weapon is held.

use super::components::SwingVariant;
use super::config::WeaponConfig;

/// Alternates swing variants, resetting after a pause longer than the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeCombo {
    count: u32,
    since_last: f32,
}

impl Default for MeleeCombo {
    fn default() -> Self {
        Self {
            count: 0,
            since_last: f32::INFINITY,
        }
    }
}

impl MeleeCombo {
    pub fn tick(&mut self, dt: f32) {
        self.since_last += dt;
    }

    /// Pick the variant for a swing starting now.
    pub fn next(&mut self, window: f32) -> SwingVariant {
        if self.since_last > window {
            self.count = 0;
        }
        let variant = if self.count % 2 == 0 {
            SwingVariant::Left
        } else {
            SwingVariant::Right
        };
        self.count += 1;
        self.since_last = 0.0;
        variant
    }
}

/// Marker crossed by a swing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingMarker {
    /// The damaging part of the swing begins
    Open,
    /// The damaging part of the swing ends
    Close,
    /// The swing is over
    Finished,
}

/// Windup, active and recovery phases of one swing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingTimeline {
    pub variant: SwingVariant,
    elapsed: f32,
    /// Markers already emitted, in timeline order
    crossed: usize,
    windup: f32,
    active: f32,
    recovery: f32,
}

impl SwingTimeline {
    pub fn new(variant: SwingVariant, config: &WeaponConfig) -> Self {
        Self {
            variant,
            elapsed: 0.0,
            crossed: 0,
            windup: config.swing_windup,
            active: config.swing_active,
            recovery: config.swing_recovery,
        }
    }

    /// Advance by `dt`, returning every marker crossed in order.
    ///
    /// A marker at zero is crossed by the first advance.
    pub fn advance(&mut self, dt: f32) -> Vec<SwingMarker> {
        self.elapsed += dt;

        let open_at = self.windup;
        let close_at = open_at + self.active;
        let end_at = close_at + self.recovery;
        let timeline = [
            (open_at, SwingMarker::Open),
            (close_at, SwingMarker::Close),
            (end_at, SwingMarker::Finished),
        ];

        let mut markers = Vec::new();
        while let Some(&(at, marker)) = timeline.get(self.crossed) {
            if self.elapsed < at {
                break;
            }
            markers.push(marker);
            self.crossed += 1;
        }
        markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swings_alternate_within_the_window() {
        let mut combo = MeleeCombo::default();
        assert_eq!(combo.next(0.5), SwingVariant::Left);
        combo.tick(0.3);
        assert_eq!(combo.next(0.5), SwingVariant::Right);
        combo.tick(0.3);
        assert_eq!(combo.next(0.5), SwingVariant::Left);
    }

    #[test]
    fn pause_resets_the_combo() {
        let mut combo = MeleeCombo::default();
        combo.next(0.5);
        combo.tick(0.8);
        assert_eq!(combo.next(0.5), SwingVariant::Left);
    }

    #[test]
    fn timeline_crosses_markers_in_order() {
        let config = WeaponConfig {
            swing_windup: 0.1,
            swing_active: 0.1,
            swing_recovery: 0.1,
            ..Default::default()
        };
        let mut swing = SwingTimeline::new(SwingVariant::Left, &config);
        assert!(swing.advance(0.05).is_empty());
        assert_eq!(swing.advance(0.1), vec![SwingMarker::Open]);
        assert_eq!(
            swing.advance(1.0),
            vec![SwingMarker::Close, SwingMarker::Finished]
        );
        assert!(swing.advance(1.0).is_empty());
    }

    #[test]
    fn zero_windup_opens_on_the_first_tick() {
        let config = WeaponConfig {
            swing_windup: 0.0,
            swing_active: 0.1,
            swing_recovery: 0.1,
            ..Default::default()
        };
        let mut swing = SwingTimeline::new(SwingVariant::Right, &config);
        assert_eq!(swing.advance(0.0), vec![SwingMarker::Open]);
        assert!(swing.advance(0.0).is_empty());
        assert_eq!(swing.advance(0.2), vec![SwingMarker::Close, SwingMarker::Finished]);
    }
}
