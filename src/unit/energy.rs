//! Energy pool for ability-using units
//!
//! Owned exclusively by its unit; the unit's own cloak module borrows it
//! at call time, nothing else ever touches it.

use serde::{Deserialize, Serialize};

/// Bounded energy reserve with passive per-tick regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyPool {
    current: i32,
    max: i32,
    passive_regen: i32,
}

impl EnergyPool {
    /// `current` is clamped into `[0, max]` at construction; the bound
    /// can never be observed violated afterwards.
    pub fn new(current: i32, max: i32, passive_regen: i32) -> Self {
        let max = max.max(0);
        Self {
            current: current.clamp(0, max),
            max,
            passive_regen: passive_regen.max(0),
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Atomically consume `amount` of energy.
    ///
    /// Check-then-act: if the pool cannot cover the full amount nothing
    /// is deducted and `false` is returned. Non-positive amounts always
    /// succeed without effect.
    pub fn consume(&mut self, amount: i32) -> bool {
        if amount <= 0 {
            return true;
        }
        if self.current < amount {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Add `amount` capped at max. Returns the delta actually applied.
    pub fn regen(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }

    /// Apply one tick of passive regeneration. Returns the delta applied
    /// (0 when already full).
    pub fn regen_passive(&mut self) -> i32 {
        self.regen(self.passive_regen)
    }
}
