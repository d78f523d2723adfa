//! Unit construction collaborator
//!
//! Used during setup only, never inside the turn loop. A kind is a
//! bundle of base stats plus the capability modules the unit carries;
//! requesting an unknown kind is the one construction failure the
//! simulation surfaces.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::SkirmishError;
use crate::core::types::{TeamId, UnitId};
use crate::unit::cloak::CloakModule;
use crate::unit::energy::EnergyPool;
use crate::unit::regen::RegenerationModule;
use crate::unit::strategy::standard;
use crate::unit::{LockdownAbility, Unit};

/// The stock unit roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    /// Mechanical ground rifleman; the baseline of every army.
    Trooper,
    /// Organic ground melee unit; regenerates, immune to lockdown.
    Ravager,
    /// Mechanical infiltrator; energy pool, cloak, and lockdown caster.
    Phantom,
    /// Mechanical aerial raider with a cloak of its own.
    Wraith,
}

/// Base stats and capability load-out of a kind.
#[derive(Debug, Clone, Copy)]
pub struct Blueprint {
    pub health: i32,
    pub power: i32,
    pub mechanical: bool,
    pub aerial: bool,
    pub weapon: &'static str,
    pub energy: Option<(i32, i32, i32)>, // (start, max, passive regen)
    pub cloak: Option<(i32, i32, u32)>,  // (activation cost, drain, duration)
    pub regen: Option<i32>,
    pub lockdown: Option<(i32, u32)>, // (cost, duration)
}

impl UnitKind {
    pub fn blueprint(&self) -> Blueprint {
        match self {
            UnitKind::Trooper => Blueprint {
                health: 40,
                power: 6,
                mechanical: true,
                aerial: false,
                weapon: "gauss rifle",
                energy: None,
                cloak: None,
                regen: None,
                lockdown: None,
            },
            UnitKind::Ravager => Blueprint {
                health: 35,
                power: 5,
                mechanical: false,
                aerial: false,
                weapon: "claws",
                energy: None,
                cloak: None,
                regen: Some(2),
                lockdown: None,
            },
            UnitKind::Phantom => Blueprint {
                health: 45,
                power: 10,
                mechanical: true,
                aerial: false,
                weapon: "longrifle",
                energy: Some((75, 200, 25)),
                cloak: Some((25, 10, 3)),
                regen: None,
                lockdown: Some((100, 3)),
            },
            UnitKind::Wraith => Blueprint {
                health: 120,
                power: 14,
                mechanical: true,
                aerial: true,
                weapon: "twin lasers",
                energy: Some((60, 200, 20)),
                cloak: Some((25, 12, 3)),
                regen: None,
                lockdown: None,
            },
        }
    }
}

impl FromStr for UnitKind {
    type Err = SkirmishError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trooper" => Ok(UnitKind::Trooper),
            "ravager" => Ok(UnitKind::Ravager),
            "phantom" => Ok(UnitKind::Phantom),
            "wraith" => Ok(UnitKind::Wraith),
            other => Err(SkirmishError::UnknownUnitKind(other.to_string())),
        }
    }
}

/// A unit order: kind, name, and optional stat overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub kind: UnitKind,
    pub name: String,
    #[serde(default)]
    pub health: Option<i32>,
    #[serde(default)]
    pub power: Option<i32>,
}

impl UnitSpec {
    pub fn new(kind: UnitKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            health: None,
            power: None,
        }
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_power(mut self, power: i32) -> Self {
        self.power = Some(power);
        self
    }

    /// Veteran trooper preset: +10 health, +10 power over the baseline.
    pub fn elite_trooper(name: impl Into<String>) -> Self {
        let base = UnitKind::Trooper.blueprint();
        Self::new(UnitKind::Trooper, name)
            .with_health(base.health + 10)
            .with_power(base.power + 10)
    }

    /// Assemble the unit: base blueprint, stat overrides, capability
    /// modules as data.
    pub fn build(&self, id: UnitId, team: TeamId) -> Unit {
        let bp = self.kind.blueprint();
        let mut unit = Unit::new(
            id,
            team,
            self.name.clone(),
            self.health.unwrap_or(bp.health),
            self.power.unwrap_or(bp.power),
        )
        .mechanical(bp.mechanical)
        .aerial(bp.aerial)
        .with_strategy(standard(bp.weapon));

        if let Some((start, max, passive)) = bp.energy {
            unit = unit.with_energy(EnergyPool::new(start, max, passive));
        }
        if let Some((cost, drain, duration)) = bp.cloak {
            unit = unit.with_cloak(CloakModule::new(cost, drain, duration));
        }
        if let Some(rate) = bp.regen {
            unit = unit.with_regen(RegenerationModule::new(rate));
        }
        if let Some((cost, duration)) = bp.lockdown {
            unit = unit.with_lockdown_ability(LockdownAbility { cost, duration });
        }
        unit
    }
}
