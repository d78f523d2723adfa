//! Units and their primary state machine
//!
//! A unit is Alive (optionally locked down) until its health reaches 0,
//! at which point it is permanently Dead: no further health, energy, or
//! cloak mutation is observable. Capabilities (energy, cloak,
//! regeneration, the lockdown ability) are composed as data, not as a
//! type hierarchy; what a unit can do is decided by which modules it
//! carries.

pub mod cloak;
pub mod energy;
pub mod factory;
pub mod modifier;
pub mod regen;
pub mod strategy;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::types::{ObserverId, Position, TeamId, UnitId};
use crate::events::{Ability, ActionBlock, BattleEvent};
use crate::report::Reporter;
use cloak::{CloakModule, UncloakReason};
use energy::EnergyPool;
use regen::RegenerationModule;
use strategy::{AttackStrategy, StandardStrategy};

/// Death-event payload handed to each subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitEvent {
    Death,
}

/// What a subscriber wants done with its subscription after handling an
/// event. Detaching from inside the notification is safe because the
/// fan-out walks a snapshot, never the live set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverAction {
    Keep,
    Detach,
}

/// Death-event subscriber. The game registers these and invokes them
/// synchronously when a unit dies.
pub trait UnitObserver {
    fn on_unit_event(&mut self, unit: UnitId, event: UnitEvent) -> ObserverAction;
}

/// One pending death notification: the dead unit plus a defensive copy
/// of its subscriber set taken at the instant of death. Produced exactly
/// once per unit, ever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeathNotice {
    pub unit: UnitId,
    pub recipients: Vec<ObserverId>,
}

/// Lockdown casting capability (cost paid from the caster's pool).
#[derive(Debug, Clone, Copy)]
pub struct LockdownAbility {
    pub cost: i32,
    pub duration: u32,
}

/// The seam shared by real units and stat-modifier layers. Strategies
/// and the scheduler operate through it, so a decorated unit can stand
/// anywhere a bare one can. `id()` always resolves to the terminal
/// unit's identity regardless of decoration depth.
pub trait Combatant {
    fn id(&self) -> UnitId;
    fn name(&self) -> &str;
    fn team(&self) -> TeamId;
    /// Effective attack power, including any modifier layers.
    fn power(&self) -> i32;
    fn health(&self) -> i32;
    fn max_health(&self) -> i32;
    fn is_alive(&self) -> bool;
    fn can_act(&self) -> bool;
    /// Why the unit cannot act right now, if it cannot.
    fn act_block(&self) -> Option<ActionBlock>;
    fn take_damage(&mut self, amount: i32) -> Option<DeathNotice>;
    fn strategy(&self) -> Arc<dyn AttackStrategy>;
    fn set_strategy(&mut self, strategy: Arc<dyn AttackStrategy>, reporter: &mut dyn Reporter);
    fn move_to(&mut self, x: i32, y: i32, reporter: &mut dyn Reporter);
    fn attach(&mut self, observer: ObserverId);
    fn detach(&mut self, observer: ObserverId);
}

/// A single combat unit and its state.
#[derive(Debug)]
pub struct Unit {
    id: UnitId,
    name: String,
    team: TeamId,
    max_health: i32,
    health: i32,
    power: i32,
    position: Position,
    mechanical: bool,
    aerial: bool,
    lockdown_ticks: u32,
    energy: Option<EnergyPool>,
    cloak: Option<CloakModule>,
    regen: Option<RegenerationModule>,
    lockdown_ability: Option<LockdownAbility>,
    strategy: Arc<dyn AttackStrategy>,
    subscribers: BTreeSet<ObserverId>,
}

impl Unit {
    pub fn new(id: UnitId, team: TeamId, name: impl Into<String>, max_health: i32, power: i32) -> Self {
        let max_health = max_health.max(1);
        Self {
            id,
            name: name.into(),
            team,
            max_health,
            health: max_health,
            power,
            position: Position::default(),
            mechanical: false,
            aerial: false,
            lockdown_ticks: 0,
            energy: None,
            cloak: None,
            regen: None,
            lockdown_ability: None,
            strategy: Arc::new(StandardStrategy::new("standard")),
            subscribers: BTreeSet::new(),
        }
    }

    pub fn mechanical(mut self, yes: bool) -> Self {
        self.mechanical = yes;
        self
    }

    pub fn aerial(mut self, yes: bool) -> Self {
        self.aerial = yes;
        self
    }

    pub fn with_energy(mut self, pool: EnergyPool) -> Self {
        self.energy = Some(pool);
        self
    }

    pub fn with_cloak(mut self, cloak: CloakModule) -> Self {
        self.cloak = Some(cloak);
        self
    }

    pub fn with_regen(mut self, regen: RegenerationModule) -> Self {
        self.regen = Some(regen);
        self
    }

    pub fn with_lockdown_ability(mut self, ability: LockdownAbility) -> Self {
        self.lockdown_ability = Some(ability);
        self
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn AttackStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_mechanical(&self) -> bool {
        self.mechanical
    }

    pub fn is_aerial(&self) -> bool {
        self.aerial
    }

    pub fn lockdown_ticks(&self) -> u32 {
        self.lockdown_ticks
    }

    pub fn energy(&self) -> Option<&EnergyPool> {
        self.energy.as_ref()
    }

    pub fn cloak(&self) -> Option<&CloakModule> {
        self.cloak.as_ref()
    }

    pub fn regen(&self) -> Option<&RegenerationModule> {
        self.regen.as_ref()
    }

    pub fn lockdown_ability(&self) -> Option<LockdownAbility> {
        self.lockdown_ability
    }

    pub fn is_cloaked(&self) -> bool {
        self.cloak.as_ref().is_some_and(CloakModule::is_cloaked)
    }

    pub fn has_cloak(&self) -> bool {
        self.cloak.is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Carries a lockdown ability and can currently pay for it.
    pub fn lockdown_ready(&self) -> bool {
        match (self.lockdown_ability, self.energy.as_ref()) {
            (Some(ability), Some(pool)) => pool.current() >= ability.cost,
            _ => false,
        }
    }

    /// Uncloaked, carries a cloak module, and can pay the activation cost.
    pub fn cloak_ready(&self) -> bool {
        match (self.cloak.as_ref(), self.energy.as_ref()) {
            (Some(cloak), Some(pool)) => {
                !cloak.is_cloaked() && pool.current() >= cloak.activation_cost()
            }
            _ => false,
        }
    }

    /// Ceiling count of hits at `power` needed to bring `target_health`
    /// to 0. `None` when the power cannot destroy anything.
    pub fn hits_to_kill(target_health: i32, power: i32) -> Option<u32> {
        if power <= 0 {
            return None;
        }
        let health = target_health.max(0);
        Some(((health + power - 1) / power) as u32)
    }

    /// Attack `target` with the current strategy. Blocked attempts are
    /// reported with their reason; attacking a dead target is a silent
    /// no-op. Returns any death notices for the game to dispatch.
    pub fn attack(&mut self, target: &mut dyn Combatant, reporter: &mut dyn Reporter) -> Vec<DeathNotice> {
        strategy::perform_attack(self, target, reporter)
    }

    /// Put this unit under lockdown. Only mechanical units can be locked.
    pub fn apply_lockdown(&mut self, duration: u32) -> Result<(), ActionBlock> {
        if !self.is_alive() {
            return Err(ActionBlock::Destroyed);
        }
        if !self.mechanical {
            return Err(ActionBlock::NotMechanical);
        }
        self.lockdown_ticks = duration;
        Ok(())
    }

    /// Cast lockdown on `target`, paying the ability cost. A dead target
    /// is a silent no-op; every other refusal is reported with a reason.
    pub fn cast_lockdown(&mut self, target: &mut Unit, reporter: &mut dyn Reporter) -> bool {
        reporter.log(&BattleEvent::AbilityAttempted {
            unit: self.id,
            ability: Ability::Lockdown,
        });
        if let Some(reason) = self.act_block() {
            reporter.log(&BattleEvent::AbilityFailed {
                unit: self.id,
                ability: Ability::Lockdown,
                reason,
            });
            return false;
        }
        let Some(ability) = self.lockdown_ability else {
            reporter.log(&BattleEvent::AbilityFailed {
                unit: self.id,
                ability: Ability::Lockdown,
                reason: ActionBlock::UnsupportedAbility,
            });
            return false;
        };
        if !target.is_alive() {
            return false;
        }
        if !target.is_mechanical() {
            reporter.log(&BattleEvent::AbilityFailed {
                unit: self.id,
                ability: Ability::Lockdown,
                reason: ActionBlock::NotMechanical,
            });
            return false;
        }
        let paid = self
            .energy
            .as_mut()
            .is_some_and(|pool| pool.consume(ability.cost));
        if !paid {
            let have = self.energy.as_ref().map_or(0, EnergyPool::current);
            reporter.log(&BattleEvent::AbilityFailed {
                unit: self.id,
                ability: Ability::Lockdown,
                reason: ActionBlock::InsufficientEnergy {
                    need: ability.cost,
                    have,
                },
            });
            return false;
        }
        // Checked mechanical and alive above; cannot fail now.
        target.lockdown_ticks = ability.duration;
        reporter.log(&BattleEvent::LockdownApplied {
            caster: self.id,
            target: target.id,
            duration: ability.duration,
        });
        true
    }

    /// Activate this unit's cloak. Refusals are reported in the module's
    /// fixed order: cannot act, already cloaked, insufficient energy.
    pub fn activate_cloak(&mut self, reporter: &mut dyn Reporter) -> bool {
        reporter.log(&BattleEvent::AbilityAttempted {
            unit: self.id,
            ability: Ability::Cloak,
        });
        let block = self.act_block();
        let result = match (self.cloak.as_mut(), self.energy.as_mut()) {
            (Some(cloak), Some(pool)) => cloak.activate(block, pool),
            _ => Err(ActionBlock::UnsupportedAbility),
        };
        match result {
            Ok(()) => {
                let remaining_energy = self.energy.as_ref().map_or(0, EnergyPool::current);
                let duration = self.cloak.as_ref().map_or(0, CloakModule::remaining_ticks);
                reporter.log(&BattleEvent::CloakActivated {
                    unit: self.id,
                    duration,
                    remaining_energy,
                });
                true
            }
            Err(reason) => {
                reporter.log(&BattleEvent::AbilityFailed {
                    unit: self.id,
                    ability: Ability::Cloak,
                    reason,
                });
                false
            }
        }
    }

    /// Drop the cloak. Idempotent; does nothing when not cloaked or dead.
    pub fn deactivate_cloak(&mut self, reason: UncloakReason, reporter: &mut dyn Reporter) -> bool {
        if !self.is_alive() {
            return false;
        }
        let dropped = self
            .cloak
            .as_mut()
            .is_some_and(|cloak| cloak.deactivate(reason));
        if dropped {
            reporter.log(&BattleEvent::CloakDeactivated {
                unit: self.id,
                reason,
            });
        }
        dropped
    }

    /// Advance this unit by one tick: lockdown countdown (with a one-time
    /// unlock event when it hits 0), then the resource modules in fixed
    /// order: regeneration, energy, cloak. Cloak goes last because it
    /// drains energy the earlier steps may have just replenished.
    pub fn tick(&mut self, reporter: &mut dyn Reporter) {
        if !self.is_alive() {
            return;
        }
        if self.lockdown_ticks > 0 {
            self.lockdown_ticks -= 1;
            if self.lockdown_ticks == 0 {
                reporter.log(&BattleEvent::LockdownExpired { unit: self.id });
            }
        }
        let can_act = self.can_act();
        if let Some(regen) = &self.regen {
            let healed = regen.tick(can_act, &mut self.health, self.max_health);
            if healed > 0 {
                reporter.log(&BattleEvent::Regenerated {
                    unit: self.id,
                    amount: healed,
                });
            }
        }
        if let Some(pool) = self.energy.as_mut() {
            pool.regen_passive();
        }
        if let (Some(cloak), Some(pool)) = (self.cloak.as_mut(), self.energy.as_mut()) {
            if let Some(reason) = cloak.tick(pool) {
                reporter.log(&BattleEvent::CloakDeactivated {
                    unit: self.id,
                    reason,
                });
            }
        }
    }
}

impl Combatant for Unit {
    fn id(&self) -> UnitId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn team(&self) -> TeamId {
        self.team
    }

    fn power(&self) -> i32 {
        self.power
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn max_health(&self) -> i32 {
        self.max_health
    }

    fn is_alive(&self) -> bool {
        self.health > 0
    }

    fn can_act(&self) -> bool {
        self.is_alive() && self.lockdown_ticks == 0
    }

    fn act_block(&self) -> Option<ActionBlock> {
        if !self.is_alive() {
            Some(ActionBlock::Destroyed)
        } else if self.lockdown_ticks > 0 {
            Some(ActionBlock::LockedDown)
        } else {
            None
        }
    }

    /// Clamp-subtract damage. The Dead transition happens at most once;
    /// the returned notice carries a snapshot of the subscriber set taken
    /// at the instant of death. Damaging a dead unit is a silent no-op.
    fn take_damage(&mut self, amount: i32) -> Option<DeathNotice> {
        if !self.is_alive() {
            return None;
        }
        let amount = amount.max(0);
        self.health = (self.health - amount).clamp(0, self.max_health);
        if self.health == 0 {
            return Some(DeathNotice {
                unit: self.id,
                recipients: self.subscribers.iter().copied().collect(),
            });
        }
        None
    }

    fn strategy(&self) -> Arc<dyn AttackStrategy> {
        Arc::clone(&self.strategy)
    }

    fn set_strategy(&mut self, strategy: Arc<dyn AttackStrategy>, reporter: &mut dyn Reporter) {
        reporter.log(&BattleEvent::StrategyChanged {
            unit: self.id,
            strategy: strategy.name().to_string(),
        });
        self.strategy = strategy;
    }

    fn move_to(&mut self, x: i32, y: i32, reporter: &mut dyn Reporter) {
        if let Some(reason) = self.act_block() {
            reporter.log(&BattleEvent::ActionBlocked {
                unit: self.id,
                reason,
            });
            return;
        }
        self.position = Position::new(x, y);
        reporter.log(&BattleEvent::Moved {
            unit: self.id,
            x,
            y,
        });
    }

    fn attach(&mut self, observer: ObserverId) {
        self.subscribers.insert(observer);
    }

    fn detach(&mut self, observer: ObserverId) {
        self.subscribers.remove(&observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RecordingReporter;
    use proptest::prelude::*;

    fn unit(health: i32, power: i32) -> Unit {
        Unit::new(UnitId(0), TeamId(0), "test", health, power)
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut u = unit(40, 6);
        let notice = u.take_damage(45);
        assert_eq!(u.health(), 0);
        assert!(!u.is_alive());
        assert!(notice.is_some());
    }

    #[test]
    fn death_notice_fires_exactly_once() {
        let mut u = unit(40, 6);
        u.attach(ObserverId(7));
        let first = u.take_damage(100);
        assert_eq!(
            first,
            Some(DeathNotice {
                unit: UnitId(0),
                recipients: vec![ObserverId(7)],
            })
        );
        // Post-death damage never re-fires
        assert_eq!(u.take_damage(100), None);
        assert_eq!(u.take_damage(0), None);
    }

    #[test]
    fn notice_snapshots_subscribers_at_death() {
        let mut u = unit(10, 1);
        u.attach(ObserverId(1));
        u.attach(ObserverId(2));
        u.detach(ObserverId(1));
        let notice = u.take_damage(10).unwrap();
        assert_eq!(notice.recipients, vec![ObserverId(2)]);
    }

    #[test]
    fn attach_detach_idempotent() {
        let mut u = unit(10, 1);
        u.attach(ObserverId(3));
        u.attach(ObserverId(3));
        assert_eq!(u.subscriber_count(), 1);
        u.detach(ObserverId(3));
        u.detach(ObserverId(3));
        assert_eq!(u.subscriber_count(), 0);
    }

    #[test]
    fn lockdown_counts_down_and_clears_once() {
        let mut reporter = RecordingReporter::new();
        let mut u = unit(40, 6).mechanical(true);
        u.apply_lockdown(2).unwrap();
        assert!(!u.can_act());

        u.tick(&mut reporter);
        assert_eq!(u.lockdown_ticks(), 1);
        assert!(!u.can_act());

        u.tick(&mut reporter);
        assert_eq!(u.lockdown_ticks(), 0);
        assert!(u.can_act());

        u.tick(&mut reporter);
        let unlocks = reporter.count(|e| matches!(e, BattleEvent::LockdownExpired { .. }));
        assert_eq!(unlocks, 1);
    }

    #[test]
    fn lockdown_rejects_non_mechanical() {
        let mut u = unit(40, 6);
        assert_eq!(u.apply_lockdown(3), Err(ActionBlock::NotMechanical));
        assert!(u.can_act());
    }

    #[test]
    fn dead_unit_is_inert() {
        let mut reporter = RecordingReporter::new();
        let mut u = unit(10, 5)
            .with_energy(EnergyPool::new(50, 200, 25))
            .with_regen(RegenerationModule::new(3));
        u.take_damage(10);

        u.tick(&mut reporter);
        assert_eq!(u.health(), 0);
        assert_eq!(u.energy().unwrap().current(), 50);
        assert!(u.take_damage(5).is_none());
        u.move_to(3, 4, &mut reporter);
        assert_eq!(u.position(), Position::default());
    }

    #[test]
    fn blocked_attack_is_reported_with_reason() {
        let mut reporter = RecordingReporter::new();
        let mut attacker = unit(40, 6).mechanical(true);
        let mut target = Unit::new(UnitId(1), TeamId(1), "enemy", 40, 6);
        attacker.apply_lockdown(3).unwrap();

        let notices = attacker.attack(&mut target, &mut reporter);
        assert!(notices.is_empty());
        assert_eq!(target.health(), 40);
        assert_eq!(
            reporter.count(|e| matches!(
                e,
                BattleEvent::ActionBlocked {
                    reason: ActionBlock::LockedDown,
                    ..
                }
            )),
            1
        );
    }

    #[test]
    fn attacking_a_dead_target_is_silent() {
        let mut reporter = RecordingReporter::new();
        let mut attacker = unit(40, 6);
        let mut target = Unit::new(UnitId(1), TeamId(1), "enemy", 10, 1);
        target.take_damage(10);

        let notices = attacker.attack(&mut target, &mut reporter);
        assert!(notices.is_empty());
        assert!(reporter.is_empty());
    }

    #[test]
    fn cloak_activation_fails_without_energy() {
        let mut reporter = RecordingReporter::new();
        let mut u = unit(45, 10)
            .with_energy(EnergyPool::new(20, 200, 0))
            .with_cloak(CloakModule::new(25, 10, 3));

        assert!(!u.activate_cloak(&mut reporter));
        assert!(!u.is_cloaked());
        assert_eq!(
            reporter.count(|e| matches!(
                e,
                BattleEvent::AbilityFailed {
                    reason: ActionBlock::InsufficientEnergy { need: 25, have: 20 },
                    ..
                }
            )),
            1
        );
    }

    #[test]
    fn tick_order_lets_fresh_energy_feed_the_cloak() {
        // Pool is empty after activation; passive regen must land before
        // the cloak drain or the cloak would starve immediately.
        let mut reporter = RecordingReporter::new();
        let mut u = unit(45, 10)
            .with_energy(EnergyPool::new(25, 200, 10))
            .with_cloak(CloakModule::new(25, 10, 3));
        assert!(u.activate_cloak(&mut reporter));
        assert_eq!(u.energy().unwrap().current(), 0);

        u.tick(&mut reporter);
        assert!(u.is_cloaked());
        assert_eq!(u.energy().unwrap().current(), 0);
    }

    #[test]
    fn regen_waits_out_lockdown() {
        let mut reporter = RecordingReporter::new();
        let mut u = unit(35, 5)
            .mechanical(true)
            .with_regen(RegenerationModule::new(2));
        u.take_damage(10);
        u.apply_lockdown(2).unwrap();

        // Tick 1: still locked after the countdown (2 -> 1), no heal.
        u.tick(&mut reporter);
        assert_eq!(u.health(), 25);

        // Tick 2: lock clears at the start, heal applies.
        u.tick(&mut reporter);
        assert_eq!(u.health(), 27);
    }

    #[test]
    fn hits_to_kill_is_a_ceiling() {
        assert_eq!(Unit::hits_to_kill(35, 6), Some(6));
        assert_eq!(Unit::hits_to_kill(36, 6), Some(6));
        assert_eq!(Unit::hits_to_kill(37, 6), Some(7));
        assert_eq!(Unit::hits_to_kill(35, 0), None);
        assert_eq!(Unit::hits_to_kill(35, -2), None);
    }

    proptest! {
        #[test]
        fn health_always_clamped(start in 1i32..500, damage in 0i32..1000) {
            let mut u = unit(start, 5);
            u.take_damage(damage);
            prop_assert!(u.health() >= 0);
            prop_assert!(u.health() <= u.max_health());
            prop_assert_eq!(u.health(), (start - damage).clamp(0, start));
        }

        #[test]
        fn energy_consume_is_all_or_nothing(current in 0i32..300, amount in 1i32..300) {
            let mut pool = EnergyPool::new(current, 300, 0);
            let before = pool.current();
            let ok = pool.consume(amount);
            if ok {
                prop_assert_eq!(pool.current(), before - amount);
            } else {
                prop_assert_eq!(pool.current(), before);
            }
            prop_assert!(pool.current() >= 0);
        }
    }
}
