//! Game configuration with documented knobs
//!
//! All scheduler-level tuning lives here and is validated once, at
//! construction. Per-kind unit stats live with the unit kinds in
//! `unit::factory`.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SkirmishError};

/// Configuration for a battle run
///
/// A fixed `seed` plus a fixed configuration fully determines the run:
/// acting order, target selection, and every ability roll draw from one
/// RNG seeded from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Hard turn cap; the battle is scored `TurnLimit` once reached.
    pub max_turns: u32,

    /// RNG seed. `None` means the runner picks one from entropy and
    /// records it so the run can still be replayed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Chance that a unit with a ready lockdown ability spends its
    /// action casting it at an eligible enemy.
    pub p_lockdown: f64,

    /// Chance that an uncloaked unit with enough energy spends its
    /// action cloaking.
    pub p_cloak: f64,

    /// Chance that a cloaked unit voluntarily drops its cloak.
    pub p_uncloak: f64,
}

impl GameConfig {
    pub fn new(
        max_turns: u32,
        seed: Option<u64>,
        p_lockdown: f64,
        p_cloak: f64,
        p_uncloak: f64,
    ) -> Result<Self> {
        let config = Self {
            max_turns,
            seed,
            p_lockdown,
            p_cloak,
            p_uncloak,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_turns == 0 {
            return Err(SkirmishError::InvalidConfig(
                "max_turns must be at least 1".to_string(),
            ));
        }
        for (name, p) in [
            ("p_lockdown", self.p_lockdown),
            ("p_cloak", self.p_cloak),
            ("p_uncloak", self.p_uncloak),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SkirmishError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_turns: 100,
            seed: None,
            p_lockdown: 0.2,
            p_cloak: 0.2,
            p_uncloak: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_turns_rejected() {
        let result = GameConfig::new(0, None, 0.2, 0.2, 0.1);
        assert!(matches!(result, Err(SkirmishError::InvalidConfig(_))));
    }

    #[test]
    fn out_of_range_probability_rejected() {
        assert!(GameConfig::new(10, None, 1.5, 0.2, 0.1).is_err());
        assert!(GameConfig::new(10, None, 0.2, -0.1, 0.1).is_err());
        // Boundary values are legal
        assert!(GameConfig::new(10, None, 0.0, 1.0, 0.0).is_ok());
    }
}
