//! Stat-modifier layers
//!
//! A modifier wraps another combatant by mutable reference and overrides
//! exactly the attributes it exists to change; everything else forwards
//! to the wrapped layer. Layers chain, bonuses compose additively, and
//! identity always resolves to the terminal unit, so a decorated and an
//! undecorated reference to the same unit are the same entity for
//! subscription, death matching, and roster removal.

use std::sync::Arc;

use crate::core::types::{ObserverId, TeamId, UnitId};
use crate::events::ActionBlock;
use crate::report::Reporter;
use crate::unit::strategy::{perform_attack, AttackStrategy};
use crate::unit::{Combatant, DeathNotice};

/// Additive attack-power bonus over the wrapped combatant.
pub struct PowerUpgrade<'a> {
    inner: &'a mut dyn Combatant,
    bonus: i32,
}

impl<'a> PowerUpgrade<'a> {
    pub fn new(inner: &'a mut dyn Combatant, bonus: i32) -> Self {
        Self { inner, bonus }
    }

    /// Attack through the modifier, so the boosted power is in effect.
    pub fn attack(
        &mut self,
        target: &mut dyn Combatant,
        reporter: &mut dyn Reporter,
    ) -> Vec<DeathNotice> {
        perform_attack(self, target, reporter)
    }
}

impl Combatant for PowerUpgrade<'_> {
    fn id(&self) -> UnitId {
        self.inner.id()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn team(&self) -> TeamId {
        self.inner.team()
    }

    fn power(&self) -> i32 {
        self.inner.power() + self.bonus
    }

    fn health(&self) -> i32 {
        self.inner.health()
    }

    fn max_health(&self) -> i32 {
        self.inner.max_health()
    }

    fn is_alive(&self) -> bool {
        self.inner.is_alive()
    }

    fn can_act(&self) -> bool {
        self.inner.can_act()
    }

    fn act_block(&self) -> Option<ActionBlock> {
        self.inner.act_block()
    }

    fn take_damage(&mut self, amount: i32) -> Option<DeathNotice> {
        self.inner.take_damage(amount)
    }

    fn strategy(&self) -> Arc<dyn AttackStrategy> {
        self.inner.strategy()
    }

    fn set_strategy(&mut self, strategy: Arc<dyn AttackStrategy>, reporter: &mut dyn Reporter) {
        self.inner.set_strategy(strategy, reporter);
    }

    fn move_to(&mut self, x: i32, y: i32, reporter: &mut dyn Reporter) {
        self.inner.move_to(x, y, reporter);
    }

    fn attach(&mut self, observer: ObserverId) {
        self.inner.attach(observer);
    }

    fn detach(&mut self, observer: ObserverId) {
        self.inner.detach(observer);
    }
}
