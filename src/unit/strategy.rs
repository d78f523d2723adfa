//! Pluggable attack behavior
//!
//! Strategies are stateless and shared behind `Arc`: several units may
//! point at the same instance, and a unit can swap its strategy at
//! runtime without affecting an action already in flight.

use std::fmt;
use std::sync::Arc;

use crate::events::BattleEvent;
use crate::report::Reporter;
use crate::unit::{Combatant, DeathNotice};

/// Attack algorithm, polymorphic over the [`Combatant`] seam.
pub trait AttackStrategy: fmt::Debug + Send + Sync {
    /// Short identifier used in `StrategyChanged` events.
    fn name(&self) -> &str;

    /// Carry out the attack. Implementations abort silently when the
    /// attacker cannot act or the target is already dead; any deaths
    /// caused are returned for the game to dispatch.
    fn execute(
        &self,
        attacker: &mut dyn Combatant,
        target: &mut dyn Combatant,
        reporter: &mut dyn Reporter,
    ) -> Vec<DeathNotice>;
}

/// Guarded attack entry point shared by units and modifier layers:
/// reports the block when the attacker cannot act, skips dead targets
/// silently, and otherwise hands off to the attacker's current strategy.
pub fn perform_attack(
    attacker: &mut dyn Combatant,
    target: &mut dyn Combatant,
    reporter: &mut dyn Reporter,
) -> Vec<DeathNotice> {
    if let Some(reason) = attacker.act_block() {
        reporter.log(&BattleEvent::ActionBlocked {
            unit: attacker.id(),
            reason,
        });
        return Vec::new();
    }
    if !target.is_alive() {
        return Vec::new();
    }
    let strategy = attacker.strategy();
    strategy.execute(attacker, target, reporter)
}

/// Plain hit for the attacker's effective power. The label names the
/// weapon flavor ("gauss rifle", "claws", ...) for reporting; the
/// mechanics are identical across flavors.
#[derive(Debug, Clone)]
pub struct StandardStrategy {
    label: &'static str,
}

impl StandardStrategy {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl AttackStrategy for StandardStrategy {
    fn name(&self) -> &str {
        self.label
    }

    fn execute(
        &self,
        attacker: &mut dyn Combatant,
        target: &mut dyn Combatant,
        reporter: &mut dyn Reporter,
    ) -> Vec<DeathNotice> {
        if !attacker.can_act() || !target.is_alive() {
            return Vec::new();
        }
        let amount = attacker.power();
        let notice = target.take_damage(amount);
        reporter.log(&BattleEvent::Damage {
            attacker: attacker.id(),
            target: target.id(),
            amount,
            remaining: target.health(),
        });
        notice.into_iter().collect()
    }
}

/// Overcharge attack: burn `health_cost` of the attacker's own health,
/// then hit for power plus `power_bonus`. If the self-damage kills the
/// attacker the boosted hit never lands.
#[derive(Debug, Clone)]
pub struct OverchargeStrategy {
    health_cost: i32,
    power_bonus: i32,
}

impl OverchargeStrategy {
    pub fn new(health_cost: i32, power_bonus: i32) -> Self {
        Self {
            health_cost,
            power_bonus,
        }
    }
}

impl AttackStrategy for OverchargeStrategy {
    fn name(&self) -> &str {
        "overcharge"
    }

    fn execute(
        &self,
        attacker: &mut dyn Combatant,
        target: &mut dyn Combatant,
        reporter: &mut dyn Reporter,
    ) -> Vec<DeathNotice> {
        if !attacker.can_act() || !target.is_alive() {
            return Vec::new();
        }
        reporter.log(&BattleEvent::Overcharged {
            unit: attacker.id(),
            health_cost: self.health_cost,
        });
        let mut notices = Vec::new();
        if let Some(notice) = attacker.take_damage(self.health_cost) {
            // The overcharge killed the attacker; the hit never lands.
            notices.push(notice);
            return notices;
        }
        let amount = attacker.power() + self.power_bonus;
        if let Some(notice) = target.take_damage(amount) {
            notices.push(notice);
        }
        reporter.log(&BattleEvent::Damage {
            attacker: attacker.id(),
            target: target.id(),
            amount,
            remaining: target.health(),
        });
        notices
    }
}

/// Convenience constructor for the default shared strategy set.
pub fn standard(label: &'static str) -> Arc<dyn AttackStrategy> {
    Arc::new(StandardStrategy::new(label))
}
