//! Passive health regeneration

use serde::{Deserialize, Serialize};

/// Per-tick self-heal for organic units.
///
/// The owner passes its own state in at call time; the module holds no
/// reference back to it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegenerationModule {
    heal_per_tick: i32,
}

impl RegenerationModule {
    pub fn new(heal_per_tick: i32) -> Self {
        Self {
            heal_per_tick: heal_per_tick.max(0),
        }
    }

    pub fn heal_per_tick(&self) -> i32 {
        self.heal_per_tick
    }

    /// Heal the owner by up to `heal_per_tick`, capped at `max_health`.
    ///
    /// No-op unless the owner can currently act (dead or locked-down
    /// units do not regenerate). Returns the amount actually healed,
    /// which may be 0.
    pub fn tick(&self, owner_can_act: bool, health: &mut i32, max_health: i32) -> i32 {
        if !owner_can_act {
            return 0;
        }
        let before = *health;
        *health = (*health + self.heal_per_tick).min(max_health);
        *health - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heals_up_to_cap() {
        let regen = RegenerationModule::new(5);
        let mut health = 33;
        assert_eq!(regen.tick(true, &mut health, 35), 2);
        assert_eq!(health, 35);
        assert_eq!(regen.tick(true, &mut health, 35), 0);
    }

    #[test]
    fn no_heal_when_owner_cannot_act() {
        let regen = RegenerationModule::new(5);
        let mut health = 10;
        assert_eq!(regen.tick(false, &mut health, 35), 0);
        assert_eq!(health, 10);
    }

    #[test]
    fn negative_rate_clamped_to_zero() {
        let regen = RegenerationModule::new(-4);
        let mut health = 10;
        assert_eq!(regen.tick(true, &mut health, 35), 0);
        assert_eq!(health, 10);
    }
}
