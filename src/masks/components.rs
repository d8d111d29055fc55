//! Mask abilities and the mana pool they draw on.

use bevy::prelude::*;

use crate::weapon::{WeaponConfig, WielderContext};

/// Shared record every mask writes into.
///
/// Masks never talk to each other or to the weapon; they adjust these fields
/// and the systems that care read them.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct MaskContext {
    /// Scales all weapon damage, never below 1.0
    pub damage_multiplier: f32,
    /// Scales the mana cost of throws and swings
    pub cost_scale: f32,
    /// Relative speed of virtual (game) time
    pub time_scale: f32,
}

impl Default for MaskContext {
    fn default() -> Self {
        Self {
            damage_multiplier: 1.0,
            cost_scale: 1.0,
            time_scale: 1.0,
        }
    }
}

impl MaskContext {
    /// Mana a throw costs with the worn mask.
    pub fn throw_cost(&self, config: &WeaponConfig) -> f32 {
        config.throw_cost * self.cost_scale
    }

    pub fn melee_cost(&self, config: &WeaponConfig) -> f32 {
        config.melee_cost * self.cost_scale
    }
}

/// A wearable ability.
pub trait Ability {
    fn apply(&self, context: &mut MaskContext);
    fn revert(&self, context: &mut MaskContext);
}

/// The masks the player can collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mask {
    /// Hits harder
    Fury,
    /// Throws and swings cost less mana
    Feather,
    /// Slows the world, not the weapon's timers
    Hourglass,
}

impl Mask {
    const FURY_DAMAGE: f32 = 1.5;
    const FEATHER_COST: f32 = 0.5;
    const HOURGLASS_TIME: f32 = 0.5;

    pub fn name(self) -> &'static str {
        match self {
            Mask::Fury => "Mask of Fury",
            Mask::Feather => "Feather Mask",
            Mask::Hourglass => "Hourglass Mask",
        }
    }
}

impl Ability for Mask {
    fn apply(&self, context: &mut MaskContext) {
        match self {
            Mask::Fury => context.damage_multiplier *= Self::FURY_DAMAGE,
            Mask::Feather => context.cost_scale *= Self::FEATHER_COST,
            Mask::Hourglass => context.time_scale *= Self::HOURGLASS_TIME,
        }
    }

    fn revert(&self, context: &mut MaskContext) {
        match self {
            Mask::Fury => {
                context.damage_multiplier = (context.damage_multiplier / Self::FURY_DAMAGE).max(1.0)
            }
            Mask::Feather => context.cost_scale /= Self::FEATHER_COST,
            Mask::Hourglass => context.time_scale /= Self::HOURGLASS_TIME,
        }
    }
}

/// Collected masks and the one currently worn.
#[derive(Component, Debug, Clone, Default)]
pub struct MaskSlot {
    pub owned: Vec<Mask>,
    pub worn: Option<Mask>,
}

impl MaskSlot {
    pub fn with_masks(owned: impl IntoIterator<Item = Mask>) -> Self {
        Self {
            owned: owned.into_iter().collect(),
            worn: None,
        }
    }

    /// Wear `mask`, taking off the current one first.
    ///
    /// Wearing the mask already worn takes it off. Unowned masks are ignored.
    pub fn toggle(&mut self, mask: Mask, context: &mut MaskContext) -> bool {
        if !self.owned.contains(&mask) {
            return false;
        }
        let previous = self.worn.take();
        if let Some(previous) = previous {
            previous.revert(context);
        }
        if previous != Some(mask) {
            mask.apply(context);
            self.worn = Some(mask);
        }
        true
    }
}

/// Mana pool paid into by throws and swings.
#[derive(Component, Debug, Clone)]
pub struct Mana {
    pub current: f32,
    pub maximum: f32,
    pub regen_rate: f32,
    /// Delay before mana starts regenerating after use
    pub regen_delay: f32,
    pub regen_timer: f32,
}

impl Default for Mana {
    fn default() -> Self {
        Self {
            current: 60.0,
            maximum: 60.0,
            regen_rate: 12.0,
            regen_delay: 0.6,
            regen_timer: 0.0,
        }
    }
}

impl Mana {
    pub fn covers(&self, amount: f32) -> bool {
        self.current >= amount
    }

    /// Spend `amount` if the pool covers it.
    pub fn try_spend(&mut self, amount: f32) -> bool {
        if self.covers(amount) {
            self.current -= amount;
            self.regen_timer = self.regen_delay;
            true
        } else {
            false
        }
    }

    pub fn regenerate(&mut self, delta: f32) {
        if self.regen_timer > 0.0 {
            self.regen_timer -= delta;
        } else {
            self.current = (self.current + self.regen_rate * delta).min(self.maximum);
        }
    }

    pub fn percentage(&self) -> f32 {
        self.current / self.maximum
    }
}

/// The weapon's view of its wielder for one operation.
pub struct WielderResources<'a> {
    pub mana: &'a mut Mana,
    pub masks: &'a MaskContext,
    pub config: &'a WeaponConfig,
}

impl WielderContext for WielderResources<'_> {
    fn damage_multiplier(&self) -> f32 {
        self.masks.damage_multiplier.max(1.0)
    }

    fn try_spend_throw_cost(&mut self) -> bool {
        self.mana.try_spend(self.masks.throw_cost(self.config))
    }

    fn try_spend_melee_cost(&mut self) -> bool {
        self.mana.try_spend(self.masks.melee_cost(self.config))
    }
}
