//! Damage trigger - at most one hit per arming period.

use super::components::Damageable;

/// Arms for a swing or a throw and lands a single hit before disarming.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageTrigger {
    armed: bool,
    amount: f32,
}

impl DamageTrigger {
    /// Arm with the damage this period deals before the wielder multiplier.
    pub fn arm(&mut self, amount: f32) {
        self.armed = true;
        self.amount = amount;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Disarm and restore the carried damage value.
    pub fn reset(&mut self, base: f32) {
        self.armed = false;
        self.amount = base;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Damage `target` once if armed. Dead targets never qualify.
    ///
    /// Returns the integer damage applied.
    pub fn try_hit(&mut self, target: &mut impl Damageable, multiplier: f32) -> Option<i32> {
        if !self.armed || target.current_health() <= 0 {
            return None;
        }
        let amount = (self.amount * multiplier).round() as i32;
        target.take_damage(amount);
        self.armed = false;
        Some(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy(i32);

    impl Damageable for Dummy {
        fn current_health(&self) -> i32 {
            self.0
        }

        fn take_damage(&mut self, amount: i32) {
            self.0 -= amount;
        }
    }

    #[test]
    fn disarmed_trigger_deals_nothing() {
        let mut trigger = DamageTrigger::default();
        let mut target = Dummy(50);
        assert_eq!(trigger.try_hit(&mut target, 1.0), None);
        assert_eq!(target.0, 50);
    }

    #[test]
    fn one_hit_per_arming_under_repeated_overlap() {
        let mut trigger = DamageTrigger::default();
        trigger.arm(10.0);
        let mut target = Dummy(50);
        for _ in 0..5 {
            trigger.try_hit(&mut target, 1.0);
        }
        assert_eq!(target.0, 40);
        assert!(!trigger.is_armed());
    }

    #[test]
    fn multiplier_is_applied_then_rounded() {
        let mut trigger = DamageTrigger::default();
        trigger.arm(7.0);
        let mut target = Dummy(100);
        assert_eq!(trigger.try_hit(&mut target, 1.5), Some(11));
        assert_eq!(target.0, 89);
    }

    #[test]
    fn dead_targets_do_not_consume_the_hit() {
        let mut trigger = DamageTrigger::default();
        trigger.arm(5.0);
        let mut corpse = Dummy(0);
        assert_eq!(trigger.try_hit(&mut corpse, 1.0), None);
        assert!(trigger.is_armed());
    }
}
