//! Scenario files
//!
//! A scenario is a TOML description of who fights whom under which
//! rules. Loaded once during setup; everything is validated before the
//! first turn runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::GameConfig;
use crate::core::error::{Result, SkirmishError};
use crate::unit::factory::{UnitKind, UnitSpec};

/// Scheduler rules section; fields default to the stock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub max_turns: u32,
    pub p_lockdown: f64,
    pub p_cloak: f64,
    pub p_uncloak: f64,
}

impl Default for Rules {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            max_turns: config.max_turns,
            p_lockdown: config.p_lockdown,
            p_cloak: config.p_cloak,
            p_uncloak: config.p_uncloak,
        }
    }
}

/// One team: a display name and the units it fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSetup {
    pub name: String,
    pub units: Vec<UnitSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub rules: Rules,
    pub teams: Vec<TeamSetup>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let scenario: Scenario = toml::from_str(&text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.teams.is_empty() {
            return Err(SkirmishError::InvalidScenario(
                "a scenario needs at least one team".to_string(),
            ));
        }
        for team in &self.teams {
            if team.units.is_empty() {
                return Err(SkirmishError::InvalidScenario(format!(
                    "team '{}' has no units",
                    team.name
                )));
            }
        }
        Ok(())
    }

    /// Translate the rules section into a validated game configuration.
    pub fn config(&self) -> Result<GameConfig> {
        GameConfig::new(
            self.rules.max_turns,
            self.seed,
            self.rules.p_lockdown,
            self.rules.p_cloak,
            self.rules.p_uncloak,
        )
    }

    /// Built-in demo matchup used when no scenario file is given.
    pub fn default_skirmish() -> Self {
        Self {
            seed: None,
            rules: Rules::default(),
            teams: vec![
                TeamSetup {
                    name: "crimson".to_string(),
                    units: vec![
                        UnitSpec::new(UnitKind::Trooper, "Ajax"),
                        UnitSpec::elite_trooper("Sarge"),
                        UnitSpec::new(UnitKind::Phantom, "Whisper"),
                    ],
                },
                TeamSetup {
                    name: "cobalt".to_string(),
                    units: vec![
                        UnitSpec::new(UnitKind::Ravager, "Fang"),
                        UnitSpec::new(UnitKind::Ravager, "Claw"),
                        UnitSpec::new(UnitKind::Wraith, "Mirage"),
                    ],
                },
            ],
        }
    }
}
