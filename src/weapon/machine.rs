//! The boomerang state machine.
//!
//! `Boomerang` is plain data driven by explicit ticks: the ECS layer feeds it
//! input, contacts and the wielder's position, and reads back its pose, state
//! and the signals it produced. Every long-running behaviour (flight
//! monitoring, the landed wait, the return arc, a melee swing) lives inside
//! the phase that owns it, so replacing the phase cancels it.

use bevy::prelude::*;

use super::components::*;
use super::config::WeaponConfig;
use super::damage::DamageTrigger;
use super::flight::{FlightMonitor, FlightVerdict};
use super::melee::{MeleeCombo, SwingMarker, SwingTimeline};
use super::recall::ReturnController;

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Held {
        swing: Option<SwingTimeline>,
    },
    Flying {
        monitor: FlightMonitor,
        since_throw: f32,
        /// Set once the weapon has come to rest too far away
        landed_wait: Option<f32>,
    },
    Returning(ReturnController),
    Grounded,
}

/// What `update` decided after looking at the current phase.
enum Step {
    Stay,
    Conclude,
    Return(ReturnCause),
    Collect,
}

/// A throwable, returnable melee weapon.
#[derive(Component, Debug, Clone)]
pub struct Boomerang {
    phase: Phase,
    pose: WeaponPose,
    trigger: DamageTrigger,
    combo: MeleeCombo,
    outcome: ThrowOutcome,
    /// Between a throw and the catch or pickup that ends it
    in_cycle: bool,
    completed_throws: u32,
    cooldown: f32,
    distance_remaining: f32,
    signals: Vec<WeaponSignal>,
}

impl Boomerang {
    /// A weapon lying in the world, waiting for its first pickup.
    pub fn grounded_at(position: Vec3, config: &WeaponConfig) -> Self {
        let mut trigger = DamageTrigger::default();
        trigger.reset(config.base_damage);
        Self {
            phase: Phase::Grounded,
            pose: WeaponPose::at(position),
            trigger,
            combo: MeleeCombo::default(),
            outcome: ThrowOutcome::None,
            in_cycle: false,
            completed_throws: 0,
            cooldown: 0.0,
            distance_remaining: 0.0,
            signals: Vec::new(),
        }
    }

    /// A weapon already in the wielder's hand at `position`.
    pub fn held_at(position: Vec3, config: &WeaponConfig) -> Self {
        Self {
            phase: Phase::Held { swing: None },
            ..Self::grounded_at(position, config)
        }
    }

    pub fn state(&self) -> WeaponState {
        match self.phase {
            Phase::Held { .. } => WeaponState::Held,
            Phase::Flying { .. } => WeaponState::Flying,
            Phase::Returning(_) => WeaponState::Returning,
            Phase::Grounded => WeaponState::Grounded,
        }
    }

    pub fn is_held(&self) -> bool {
        self.state() == WeaponState::Held
    }

    pub fn is_flying(&self) -> bool {
        self.state() == WeaponState::Flying
    }

    pub fn is_returning(&self) -> bool {
        self.state() == WeaponState::Returning
    }

    pub fn is_grounded(&self) -> bool {
        self.state() == WeaponState::Grounded
    }

    /// Lying still: grounded, or landed too far away and waiting to return.
    pub fn is_resting(&self) -> bool {
        matches!(
            self.phase,
            Phase::Grounded
                | Phase::Flying {
                    landed_wait: Some(_),
                    ..
                }
        )
    }

    pub fn last_outcome(&self) -> ThrowOutcome {
        self.outcome
    }

    /// Completed Held-to-Held cycles. Never decreases.
    pub fn completed_throws(&self) -> u32 {
        self.completed_throws
    }

    pub fn pose(&self) -> &WeaponPose {
        &self.pose
    }

    /// Mutable pose for the flight physics driver.
    pub fn pose_mut(&mut self) -> &mut WeaponPose {
        &mut self.pose
    }

    pub fn is_armed(&self) -> bool {
        self.trigger.is_armed()
    }

    /// Damage the next hit deals before the wielder's multiplier.
    pub fn damage(&self) -> f32 {
        self.trigger.amount()
    }

    /// Distance left to the wielder while returning.
    pub fn distance_remaining(&self) -> f32 {
        self.distance_remaining
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Whether physics contact with the wielder's body is suppressed.
    pub fn ignores_wielder(&self) -> bool {
        !self.is_held()
    }

    pub fn collider_mode(&self) -> ColliderMode {
        if self.is_held() {
            ColliderMode::Carried
        } else {
            ColliderMode::Solid
        }
    }

    /// Needs the flight physics driver this tick.
    pub fn needs_flight_physics(&self) -> bool {
        matches!(
            self.phase,
            Phase::Flying {
                landed_wait: None,
                ..
            }
        )
    }

    pub fn swing(&self) -> Option<SwingVariant> {
        match &self.phase {
            Phase::Held { swing } => swing.map(|s| s.variant),
            _ => None,
        }
    }

    /// Ready to be thrown, ignoring the cost.
    pub fn can_throw(&self) -> bool {
        matches!(self.phase, Phase::Held { swing: None }) && self.cooldown <= 0.0
    }

    /// Signals produced since the last drain, oldest first.
    pub fn drain_signals(&mut self) -> std::vec::Drain<'_, WeaponSignal> {
        self.signals.drain(..)
    }

    /// Track the carried anchor's world pose while held.
    pub fn follow_anchor(&mut self, position: Vec3, rotation: Quat) {
        if self.is_held() {
            self.pose.position = position;
            self.pose.rotation = rotation;
        }
    }

    /// Release the weapon along `direction`.
    ///
    /// Returns false without side effects when the weapon is not ready or the
    /// wielder cannot pay for the throw.
    pub fn throw(
        &mut self,
        direction: Vec3,
        wielder: &mut impl WielderContext,
        config: &WeaponConfig,
    ) -> bool {
        if !self.can_throw() || !wielder.try_spend_throw_cost() {
            return false;
        }

        let direction = direction.normalize_or(Vec3::NEG_Z);
        self.pose.velocity =
            (direction + Vec3::Y * config.throw_upward_bias).normalize_or(direction) * config.throw_speed;
        self.pose.angular_velocity = Vec3::Y * config.spin_speed;
        self.trigger.arm(config.throw_damage());
        self.outcome = ThrowOutcome::None;
        self.in_cycle = true;
        self.phase = Phase::Flying {
            monitor: FlightMonitor::default(),
            since_throw: 0.0,
            landed_wait: None,
        };
        self.signals.push(WeaponSignal::Thrown {
            velocity: self.pose.velocity,
        });
        true
    }

    /// Start a melee swing. Only possible while held and not already swinging.
    pub fn melee(&mut self, wielder: &mut impl WielderContext, config: &WeaponConfig) -> bool {
        if !matches!(self.phase, Phase::Held { swing: None }) || !wielder.try_spend_melee_cost() {
            return false;
        }

        let variant = self.combo.next(config.combo_window);
        self.phase = Phase::Held {
            swing: Some(SwingTimeline::new(variant, config)),
        };
        self.signals.push(WeaponSignal::Swing(variant));
        true
    }

    /// Swing marker: the damaging part of a swing begins.
    pub fn open_swing_window(&mut self, config: &WeaponConfig) {
        if self.is_held() {
            self.trigger.arm(config.base_damage);
        }
    }

    /// Swing marker: the damaging part of a swing ends.
    pub fn close_swing_window(&mut self) {
        if self.is_held() {
            self.trigger.disarm();
        }
    }

    /// Offer an overlapping target to the weapon.
    ///
    /// A thrown hit starts the return immediately.
    pub fn strike(
        &mut self,
        target: &mut impl Damageable,
        context: &impl WielderContext,
        wielder: &Wielder,
        config: &WeaponConfig,
    ) -> Option<Strike> {
        let thrown = match &self.phase {
            Phase::Held { .. } => false,
            Phase::Flying {
                since_throw,
                landed_wait,
                ..
            } => {
                if *since_throw < config.collision_grace || landed_wait.is_some() {
                    return None;
                }
                true
            }
            Phase::Returning(_) => true,
            Phase::Grounded => return None,
        };

        let amount = self.trigger.try_hit(target, context.damage_multiplier())?;
        let strike = Strike {
            amount,
            thrown,
            killed: target.current_health() <= 0,
            direction: if thrown {
                self.pose.velocity.normalize_or_zero()
            } else {
                Vec3::ZERO
            },
        };
        self.signals.push(WeaponSignal::Struck(strike));

        if thrown {
            self.settle_outcome(ThrowOutcome::HitEnemy);
            if self.is_flying() {
                self.begin_return(ReturnCause::EnemyHit, wielder, config);
            }
        }
        Some(strike)
    }

    /// Manual pickup of a resting weapon within reach.
    pub fn pickup(&mut self, wielder: &Wielder, config: &WeaponConfig) -> bool {
        if !self.is_resting() || self.pose.position.distance(wielder.position) > config.pickup_radius {
            return false;
        }
        self.settle_outcome(ThrowOutcome::HitWall);
        self.collect(false, config);
        true
    }

    /// Call a resting weapon back regardless of distance.
    pub fn recall(&mut self, wielder: &Wielder, config: &WeaponConfig) -> bool {
        if !self.is_resting() {
            return false;
        }
        self.begin_return(ReturnCause::Recall, wielder, config);
        true
    }

    /// Advance every timer and polled transition by `dt` unscaled seconds.
    pub fn update(&mut self, dt: f32, wielder: &Wielder, config: &WeaponConfig) {
        self.cooldown = (self.cooldown - dt).max(0.0);
        self.combo.tick(dt);

        let speed = self.pose.speed();
        let position = self.pose.position;

        let step = match &mut self.phase {
            Phase::Held { swing } => {
                let markers = swing.as_mut().map(|s| s.advance(dt)).unwrap_or_default();
                for marker in markers {
                    match marker {
                        SwingMarker::Open => self.trigger.arm(config.base_damage),
                        SwingMarker::Close => self.trigger.disarm(),
                        SwingMarker::Finished => {
                            self.trigger.disarm();
                            *swing = None;
                        }
                    }
                }
                Step::Stay
            }
            Phase::Flying {
                monitor,
                since_throw,
                landed_wait,
            } => {
                *since_throw += dt;
                if position.y < config.void_depth {
                    Step::Return(ReturnCause::Void)
                } else if let Some(wait) = landed_wait {
                    *wait -= dt;
                    if *wait <= 0.0 {
                        Step::Return(ReturnCause::Distance)
                    } else {
                        Step::Stay
                    }
                } else {
                    match monitor.advance(dt, speed, config) {
                        FlightVerdict::Airborne => Step::Stay,
                        FlightVerdict::Landed | FlightVerdict::TimedOut => Step::Conclude,
                    }
                }
            }
            Phase::Returning(controller) => {
                let step = controller.advance(dt, wielder.hold_point);
                if dt > 0.0 {
                    self.pose.velocity = (step.position - position) / dt;
                }
                self.pose.position = step.position;
                if let Some(heading) = step.heading {
                    self.pose.rotation = Transform::IDENTITY.looking_to(heading, Vec3::Y).rotation;
                }
                self.distance_remaining = step.remaining;
                if step.complete {
                    Step::Collect
                } else {
                    Step::Stay
                }
            }
            Phase::Grounded => {
                if position.y < config.void_depth {
                    Step::Return(ReturnCause::Void)
                } else if position.distance(wielder.position) > config.grounded_max_distance {
                    Step::Return(ReturnCause::Stray)
                } else {
                    Step::Stay
                }
            }
        };

        match step {
            Step::Stay => {}
            Step::Conclude => self.conclude_flight(wielder, config),
            Step::Return(cause) => self.begin_return(cause, wielder, config),
            Step::Collect => self.collect(true, config),
        }
    }

    /// The flight monitor gave up on the weapon moving: land it.
    fn conclude_flight(&mut self, wielder: &Wielder, config: &WeaponConfig) {
        self.pose.freeze();
        self.trigger.disarm();

        let distance = self.pose.position.distance(wielder.position);
        self.signals.push(WeaponSignal::Landed { distance });

        if distance > config.return_distance {
            debug!("Boomerang landed {:.1}m away, waiting to return", distance);
            if let Phase::Flying { landed_wait, .. } = &mut self.phase {
                *landed_wait = Some(config.auto_return_delay);
            }
        } else {
            self.phase = Phase::Grounded;
            self.settle_outcome(ThrowOutcome::HitWall);
        }
    }

    /// Replace whatever is running with a fresh return arc.
    fn begin_return(&mut self, cause: ReturnCause, wielder: &Wielder, config: &WeaponConfig) {
        self.settle_outcome(cause.outcome());
        if cause != ReturnCause::EnemyHit {
            self.trigger.disarm();
        }
        self.pose.angular_velocity = Vec3::Y * config.spin_speed;
        self.phase = Phase::Returning(ReturnController::begin(
            self.pose.position,
            wielder.hold_point,
            config,
        ));
        self.distance_remaining = self.pose.position.distance(wielder.hold_point);
        self.signals.push(WeaponSignal::ReturnStarted(cause));
    }

    /// Back in hand, by catch or by pickup.
    fn collect(&mut self, caught: bool, config: &WeaponConfig) {
        if self.is_held() {
            return;
        }

        self.phase = Phase::Held { swing: None };
        self.pose.freeze();
        self.trigger.reset(config.base_damage);
        self.distance_remaining = 0.0;
        self.in_cycle = false;
        self.cooldown = config.throw_cooldown;
        self.completed_throws += 1;

        let completed = self.completed_throws;
        self.signals.push(if caught {
            WeaponSignal::Caught { completed }
        } else {
            WeaponSignal::PickedUp { completed }
        });
    }

    /// Record the throw's outcome; the first outcome of a cycle sticks.
    /// Outside a throw cycle there is nothing to record.
    fn settle_outcome(&mut self, outcome: ThrowOutcome) {
        if self.in_cycle && self.outcome == ThrowOutcome::None {
            self.outcome = outcome;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pool {
        mana: f32,
        multiplier: f32,
    }

    impl WielderContext for Pool {
        fn damage_multiplier(&self) -> f32 {
            self.multiplier
        }

        fn try_spend_throw_cost(&mut self) -> bool {
            if self.mana >= 10.0 {
                self.mana -= 10.0;
                true
            } else {
                false
            }
        }

        fn try_spend_melee_cost(&mut self) -> bool {
            if self.mana >= 1.0 {
                self.mana -= 1.0;
                true
            } else {
                false
            }
        }
    }

    struct Target(i32);

    impl Damageable for Target {
        fn current_health(&self) -> i32 {
            self.0
        }

        fn take_damage(&mut self, amount: i32) {
            self.0 -= amount;
        }
    }

    fn pool() -> Pool {
        Pool {
            mana: 100.0,
            multiplier: 1.0,
        }
    }

    fn wielder() -> Wielder {
        Wielder::new(Vec3::ZERO, 0.4)
    }

    #[test]
    fn starts_grounded_and_unarmed() {
        let config = WeaponConfig::default();
        let weapon = Boomerang::grounded_at(Vec3::new(0.0, 0.2, -2.0), &config);
        assert!(weapon.is_grounded());
        assert!(!weapon.is_armed());
        assert_eq!(weapon.last_outcome(), ThrowOutcome::None);
        assert_eq!(weapon.completed_throws(), 0);
    }

    #[test]
    fn throw_arms_amplified_damage_and_spins() {
        let config = WeaponConfig::default();
        let mut weapon = Boomerang::held_at(Vec3::Y, &config);
        assert!(weapon.throw(Vec3::NEG_Z, &mut pool(), &config));
        assert!(weapon.is_flying());
        assert!(weapon.is_armed());
        assert_eq!(weapon.damage(), config.base_damage * config.throw_damage_multiplier);
        assert!(weapon.pose().angular_velocity.length() > 0.0);
        assert!((weapon.pose().speed() - config.throw_speed).abs() < 1e-3);
        assert!(weapon.pose().velocity.y > 0.0);
        assert!(weapon.ignores_wielder());
        assert_eq!(weapon.collider_mode(), ColliderMode::Solid);
    }

    #[test]
    fn cooldown_blocks_an_immediate_rethrow() {
        let config = WeaponConfig::default();
        let mut weapon = Boomerang::grounded_at(Vec3::new(0.0, 0.0, -1.0), &config);
        assert!(weapon.pickup(&wielder(), &config));
        assert!(!weapon.throw(Vec3::NEG_Z, &mut pool(), &config));
        weapon.update(config.throw_cooldown + 0.01, &wielder(), &config);
        assert!(weapon.throw(Vec3::NEG_Z, &mut pool(), &config));
    }

    #[test]
    fn grace_period_ignores_early_overlaps() {
        let config = WeaponConfig::default();
        let mut weapon = Boomerang::held_at(Vec3::Y, &config);
        weapon.throw(Vec3::NEG_Z, &mut pool(), &config);
        let mut target = Target(100);
        assert!(weapon.strike(&mut target, &pool(), &wielder(), &config).is_none());
        assert_eq!(target.0, 100);

        weapon.update(config.collision_grace + 0.01, &wielder(), &config);
        assert!(weapon.strike(&mut target, &pool(), &wielder(), &config).is_some());
        assert!(weapon.is_returning());
    }

    #[test]
    fn melee_swing_arms_only_during_active_window() {
        let config = WeaponConfig::default();
        let mut weapon = Boomerang::held_at(Vec3::Y, &config);
        let mut pool = pool();
        assert!(weapon.melee(&mut pool, &config));
        assert_eq!(weapon.swing(), Some(SwingVariant::Left));
        assert!(!weapon.is_armed());

        weapon.update(config.swing_windup + 0.01, &wielder(), &config);
        assert!(weapon.is_armed());
        assert_eq!(weapon.damage(), config.base_damage);

        let mut target = Target(100);
        let strike = weapon.strike(&mut target, &pool, &wielder(), &config).unwrap();
        assert!(!strike.thrown);
        assert_eq!(target.0, 90);
        assert!(weapon.strike(&mut target, &pool, &wielder(), &config).is_none());

        weapon.update(1.0, &wielder(), &config);
        assert_eq!(weapon.swing(), None);
        assert!(!weapon.is_armed());
        assert!(weapon.is_held());
    }

    #[test]
    fn cannot_throw_mid_swing() {
        let config = WeaponConfig::default();
        let mut weapon = Boomerang::held_at(Vec3::Y, &config);
        let mut pool = pool();
        weapon.melee(&mut pool, &config);
        assert!(!weapon.throw(Vec3::NEG_Z, &mut pool, &config));
        assert!(weapon.is_held());
    }

    #[test]
    fn external_swing_markers_arm_and_disarm() {
        let config = WeaponConfig::default();
        let mut weapon = Boomerang::held_at(Vec3::Y, &config);
        weapon.open_swing_window(&config);
        assert!(weapon.is_armed());
        weapon.close_swing_window();
        assert!(!weapon.is_armed());
    }

    #[test]
    fn grounded_weapon_cannot_hurt() {
        let config = WeaponConfig::default();
        let mut weapon = Boomerang::grounded_at(Vec3::ZERO, &config);
        weapon.open_swing_window(&config);
        let mut target = Target(10);
        assert!(weapon.strike(&mut target, &pool(), &wielder(), &config).is_none());
        assert_eq!(target.0, 10);
    }

    #[test]
    fn pickup_out_of_reach_is_refused() {
        let config = WeaponConfig::default();
        let mut weapon = Boomerang::grounded_at(Vec3::new(0.0, 0.0, -10.0), &config);
        assert!(!weapon.pickup(&wielder(), &config));
        assert!(weapon.is_grounded());
    }

    #[test]
    fn recall_brings_a_resting_weapon_home() {
        let config = WeaponConfig::default();
        let mut weapon = Boomerang::grounded_at(Vec3::new(0.0, 0.0, -10.0), &config);
        assert!(weapon.recall(&wielder(), &config));
        assert!(weapon.is_returning());
        assert!(weapon.distance_remaining() > 9.0);
        assert!(!weapon.recall(&wielder(), &config));
        for _ in 0..200 {
            weapon.update(1.0 / 60.0, &wielder(), &config);
        }
        assert!(weapon.is_held());
        assert_eq!(weapon.completed_throws(), 1);
    }

    #[test]
    fn drifting_grounded_weapon_is_force_returned() {
        let config = WeaponConfig::default();
        let mut weapon = Boomerang::grounded_at(Vec3::ZERO, &config);
        let far = Wielder::new(Vec3::new(config.grounded_max_distance + 1.0, 0.0, 0.0), 0.4);
        weapon.update(0.016, &far, &config);
        assert!(weapon.is_returning());
        let signals: Vec<_> = weapon.drain_signals().collect();
        assert_eq!(signals, vec![WeaponSignal::ReturnStarted(ReturnCause::Stray)]);
    }

    #[test]
    fn held_weapon_tracks_its_anchor() {
        let config = WeaponConfig::default();
        let mut weapon = Boomerang::held_at(Vec3::ZERO, &config);
        weapon.follow_anchor(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
        assert_eq!(weapon.pose().position, Vec3::new(1.0, 2.0, 3.0));

        let mut grounded = Boomerang::grounded_at(Vec3::ZERO, &config);
        grounded.follow_anchor(Vec3::ONE, Quat::IDENTITY);
        assert_eq!(grounded.pose().position, Vec3::ZERO);
    }

    #[test]
    fn handling_before_the_first_throw_records_no_outcome() {
        let config = WeaponConfig::default();

        let mut picked = Boomerang::grounded_at(Vec3::new(0.0, 0.0, -1.0), &config);
        assert!(picked.pickup(&wielder(), &config));
        assert_eq!(picked.last_outcome(), ThrowOutcome::None);

        let mut recalled = Boomerang::grounded_at(Vec3::new(0.0, 0.0, -10.0), &config);
        assert!(recalled.recall(&wielder(), &config));
        assert_eq!(recalled.last_outcome(), ThrowOutcome::None);
        for _ in 0..200 {
            recalled.update(1.0 / 60.0, &wielder(), &config);
        }
        assert!(recalled.is_held());
        assert_eq!(recalled.last_outcome(), ThrowOutcome::None);

        let mut lost = Boomerang::grounded_at(Vec3::new(0.0, config.void_depth - 1.0, 0.0), &config);
        lost.update(1.0 / 60.0, &wielder(), &config);
        assert!(lost.is_returning());
        assert_eq!(lost.last_outcome(), ThrowOutcome::None);

        // The next real throw still records normally.
        recalled.update(config.throw_cooldown + 0.01, &wielder(), &config);
        assert!(recalled.throw(Vec3::NEG_Z, &mut pool(), &config));
        recalled.update(config.collision_grace + 0.01, &wielder(), &config);
        let mut target = Target(100);
        assert!(recalled.strike(&mut target, &pool(), &wielder(), &config).is_some());
        assert_eq!(recalled.last_outcome(), ThrowOutcome::HitEnemy);
    }

    #[test]
    fn void_return_cannot_hurt_on_the_way_home() {
        let config = WeaponConfig::default();
        let mut weapon = Boomerang::held_at(Vec3::Y, &config);
        assert!(weapon.throw(Vec3::NEG_Z, &mut pool(), &config));
        weapon.pose_mut().position = Vec3::new(0.0, config.void_depth - 1.0, -5.0);
        weapon.update(1.0 / 60.0, &wielder(), &config);
        assert!(weapon.is_returning());
        assert!(!weapon.is_armed());
        assert_eq!(weapon.last_outcome(), ThrowOutcome::FellInVoid);

        let mut target = Target(100);
        weapon.update(1.0 / 60.0, &wielder(), &config);
        assert!(weapon.strike(&mut target, &pool(), &wielder(), &config).is_none());
        assert_eq!(target.0, 100);
        assert_eq!(weapon.last_outcome(), ThrowOutcome::FellInVoid);
    }
}
