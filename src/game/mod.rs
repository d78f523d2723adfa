//! Turn scheduler and battle orchestration
//!
//! The game owns every unit, one seedable RNG, and the injected
//! reporter. All mutation is sequential and turn-stepped, so a seed plus
//! a configuration fully determines the run, including the event stream.

use std::collections::{BTreeMap, BTreeSet};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::{ObserverId, TeamId, Turn, UnitId};
use crate::events::{BattleEvent, OutcomeReason};
use crate::report::Reporter;
use crate::unit::cloak::UncloakReason;
use crate::unit::factory::UnitSpec;
use crate::unit::{Combatant, DeathNotice, ObserverAction, Unit, UnitEvent, UnitObserver};

/// The game's own subscription identity; registered on every unit it
/// spawns so it can pull the dead off the roster.
pub const GAME_OBSERVER: ObserverId = ObserverId(0);

/// Final score of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub winning_team: Option<TeamId>,
    pub reason: OutcomeReason,
    pub turns: Turn,
}

pub struct Game {
    config: GameConfig,
    seed: u64,
    units: Vec<Unit>,
    /// Units still in play; the dead are removed on death notification.
    roster: BTreeSet<UnitId>,
    observers: BTreeMap<ObserverId, Box<dyn UnitObserver>>,
    next_observer: u32,
    rng: ChaCha8Rng,
    reporter: Box<dyn Reporter>,
    turn: Turn,
}

impl Game {
    /// Validates the configuration up front. With `config.seed` unset the
    /// seed comes from entropy; it is recorded either way so the run can
    /// be replayed.
    pub fn new(config: GameConfig, reporter: Box<dyn Reporter>) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            seed,
            units: Vec::new(),
            roster: BTreeSet::new(),
            observers: BTreeMap::new(),
            next_observer: GAME_OBSERVER.0 + 1,
            rng: ChaCha8Rng::seed_from_u64(seed),
            reporter,
            turn: 0,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.index()]
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.units[id.index()]
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn roster(&self) -> &BTreeSet<UnitId> {
        &self.roster
    }

    /// Build a unit from its spec and take it into the battle. The game
    /// subscribes itself to the unit's death event immediately.
    pub fn spawn(&mut self, spec: &UnitSpec, team: TeamId) -> UnitId {
        let id = UnitId(self.units.len() as u32);
        let mut unit = spec.build(id, team);
        unit.attach(GAME_OBSERVER);
        self.reporter.log(&BattleEvent::Spawned {
            unit: id,
            name: unit.name().to_string(),
            team,
        });
        self.roster.insert(id);
        self.units.push(unit);
        id
    }

    /// Register an external death-event subscriber on `subject`.
    pub fn register_observer(
        &mut self,
        subject: UnitId,
        observer: Box<dyn UnitObserver>,
    ) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.insert(id, observer);
        self.units[subject.index()].attach(id);
        id
    }

    /// Subscribe an already-registered observer to another unit.
    pub fn attach_observer(&mut self, subject: UnitId, observer: ObserverId) {
        self.units[subject.index()].attach(observer);
    }

    pub fn detach_observer(&mut self, subject: UnitId, observer: ObserverId) {
        self.units[subject.index()].detach(observer);
    }

    /// Run to completion. The loop is bounded by `max_turns`, so this
    /// always terminates.
    pub fn run(&mut self) -> Outcome {
        loop {
            if let Some(outcome) = self.step() {
                return outcome;
            }
        }
    }

    /// Advance one turn, or report the outcome if the battle is over.
    /// The end condition is checked at the top, so callers driving the
    /// loop themselves can stop between turns.
    pub fn step(&mut self) -> Option<Outcome> {
        if let Some(outcome) = self.check_end() {
            self.reporter.log(&BattleEvent::BattleEnded {
                winning_team: outcome.winning_team,
                reason: outcome.reason,
                turns: outcome.turns,
            });
            return Some(outcome);
        }
        self.turn += 1;
        self.reporter.log(&BattleEvent::TurnStarted { turn: self.turn });

        // One shuffle for the whole turn; no re-randomization mid-turn.
        let mut order: Vec<UnitId> = self
            .roster
            .iter()
            .copied()
            .filter(|id| self.units[id.index()].is_alive())
            .collect();
        order.shuffle(&mut self.rng);

        for id in order {
            let unit = &self.units[id.index()];
            if !unit.is_alive() || !unit.can_act() {
                continue;
            }
            self.act(id);
        }

        // Every tracked unit ticks, dead or alive; a dead unit's tick is
        // a guarded no-op.
        for unit in &mut self.units {
            unit.tick(self.reporter.as_mut());
        }
        None
    }

    /// Per-capability action policy for one acting unit: try lockdown,
    /// then the cloak toggles, then fall through to a plain attack.
    fn act(&mut self, id: UnitId) {
        let idx = id.index();
        let team = self.units[idx].team();

        if self.units[idx].lockdown_ready() {
            let eligible: Vec<UnitId> = self
                .units
                .iter()
                .filter(|u| u.team() != team && u.is_alive() && u.is_mechanical())
                .map(|u| u.id())
                .collect();
            if !eligible.is_empty() && self.rng.gen_bool(self.config.p_lockdown) {
                if let Some(&target) = eligible.choose(&mut self.rng) {
                    let (actor, victim) = pair_mut(&mut self.units, idx, target.index());
                    actor.cast_lockdown(victim, self.reporter.as_mut());
                }
                return;
            }
        }

        if self.units[idx].has_cloak() {
            if self.units[idx].cloak_ready() {
                if self.rng.gen_bool(self.config.p_cloak) {
                    self.units[idx].activate_cloak(self.reporter.as_mut());
                    return;
                }
            } else if self.units[idx].is_cloaked() && self.rng.gen_bool(self.config.p_uncloak) {
                self.units[idx].deactivate_cloak(UncloakReason::Manual, self.reporter.as_mut());
                return;
            }
        }

        let enemies: Vec<UnitId> = self
            .units
            .iter()
            .filter(|u| u.is_alive() && u.team() != team)
            .map(|u| u.id())
            .collect();
        match enemies.choose(&mut self.rng) {
            Some(&target) => {
                let (actor, victim) = pair_mut(&mut self.units, idx, target.index());
                let notices = actor.attack(victim, self.reporter.as_mut());
                self.dispatch(notices);
            }
            None => self.reporter.log(&BattleEvent::Idle { unit: id }),
        }
    }

    /// Fan a death out to the snapshot of subscribers taken at the
    /// instant of death. The game handles its own subscription inline
    /// (roster removal + forwarding to the reporter); external observers
    /// may ask to be detached, which is safe mid-dispatch because the
    /// walk is over the snapshot.
    fn dispatch(&mut self, notices: Vec<DeathNotice>) {
        for notice in notices {
            for recipient in notice.recipients {
                if recipient == GAME_OBSERVER {
                    self.roster.remove(&notice.unit);
                    self.reporter.log(&BattleEvent::Death { unit: notice.unit });
                } else if let Some(observer) = self.observers.get_mut(&recipient) {
                    let action = observer.on_unit_event(notice.unit, UnitEvent::Death);
                    if action == ObserverAction::Detach {
                        self.observers.remove(&recipient);
                        self.units[notice.unit.index()].detach(recipient);
                    }
                }
            }
        }
    }

    fn check_end(&self) -> Option<Outcome> {
        let living: BTreeSet<TeamId> = self
            .units
            .iter()
            .filter(|u| u.is_alive())
            .map(|u| u.team())
            .collect();
        if living.len() <= 1 {
            let (winning_team, reason) = match living.iter().next() {
                Some(&team) => (Some(team), OutcomeReason::Elimination),
                None => (None, OutcomeReason::Draw),
            };
            return Some(Outcome {
                winning_team,
                reason,
                turns: self.turn,
            });
        }
        if self.turn >= self.config.max_turns {
            return Some(Outcome {
                winning_team: None,
                reason: OutcomeReason::TurnLimit,
                turns: self.turn,
            });
        }
        None
    }
}

/// Disjoint mutable borrows of two units in the arena.
fn pair_mut(units: &mut [Unit], a: usize, b: usize) -> (&mut Unit, &mut Unit) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = units.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = units.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
