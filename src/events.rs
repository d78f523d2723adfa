//! Structured battle events
//!
//! The core emits these as data; turning them into text (or anything
//! else) is the reporting collaborator's job, see [`crate::report`].

use serde::{Deserialize, Serialize};

use crate::core::types::{TeamId, Turn, UnitId};
use crate::unit::cloak::UncloakReason;

/// Named abilities a unit may attempt during its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ability {
    Cloak,
    Lockdown,
}

/// Reason a guarded action or ability was refused.
///
/// These are reported no-ops, never propagated failures: the simulation
/// step that produced one carries on normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionBlock {
    /// The actor is dead.
    Destroyed,
    /// The actor is under lockdown.
    LockedDown,
    /// Cloak activation while already cloaked.
    AlreadyCloaked,
    /// Not enough energy to pay an ability cost.
    InsufficientEnergy { need: i32, have: i32 },
    /// Lockdown against a non-mechanical target.
    NotMechanical,
    /// The unit does not carry the module for this ability.
    UnsupportedAbility,
}

/// How a finished battle was scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeReason {
    /// Exactly one team has living members.
    Elimination,
    /// The turn cap was reached with multiple teams standing.
    TurnLimit,
    /// No team has living members.
    Draw,
}

impl OutcomeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeReason::Elimination => "elimination",
            OutcomeReason::TurnLimit => "turn-limit",
            OutcomeReason::Draw => "draw",
        }
    }
}

/// Every observable occurrence in a battle, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    Spawned {
        unit: UnitId,
        name: String,
        team: TeamId,
    },
    TurnStarted {
        turn: Turn,
    },
    Moved {
        unit: UnitId,
        x: i32,
        y: i32,
    },
    /// An attack or move was refused by the actor's own state machine.
    ActionBlocked {
        unit: UnitId,
        reason: ActionBlock,
    },
    AbilityAttempted {
        unit: UnitId,
        ability: Ability,
    },
    AbilityFailed {
        unit: UnitId,
        ability: Ability,
        reason: ActionBlock,
    },
    CloakActivated {
        unit: UnitId,
        duration: u32,
        remaining_energy: i32,
    },
    CloakDeactivated {
        unit: UnitId,
        reason: UncloakReason,
    },
    LockdownApplied {
        caster: UnitId,
        target: UnitId,
        duration: u32,
    },
    LockdownExpired {
        unit: UnitId,
    },
    /// Overcharge self-damage paid before the boosted hit.
    Overcharged {
        unit: UnitId,
        health_cost: i32,
    },
    Damage {
        attacker: UnitId,
        target: UnitId,
        amount: i32,
        remaining: i32,
    },
    Regenerated {
        unit: UnitId,
        amount: i32,
    },
    StrategyChanged {
        unit: UnitId,
        strategy: String,
    },
    Death {
        unit: UnitId,
    },
    /// The unit had no living enemy to engage this turn.
    Idle {
        unit: UnitId,
    },
    BattleEnded {
        winning_team: Option<TeamId>,
        reason: OutcomeReason,
        turns: Turn,
    },
}
