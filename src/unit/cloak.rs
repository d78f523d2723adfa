//! Cloak state machine
//!
//! Cloaking costs energy up front and drains the owner's pool every tick
//! while active. It drops on its own when the duration runs out or when
//! the pool can no longer cover the upkeep. All timing is tick-counted
//! and driven by the turn loop; there are no wall-clock timers anywhere.

use serde::{Deserialize, Serialize};

use crate::events::ActionBlock;
use crate::unit::energy::EnergyPool;

/// Why a cloak ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UncloakReason {
    Manual,
    Expired,
    Starved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloakModule {
    activation_cost: i32,
    drain_per_tick: i32,
    base_duration: u32,
    cloaked: bool,
    remaining_ticks: u32,
}

impl CloakModule {
    pub fn new(activation_cost: i32, drain_per_tick: i32, base_duration: u32) -> Self {
        Self {
            activation_cost,
            drain_per_tick,
            base_duration,
            cloaked: false,
            remaining_ticks: 0,
        }
    }

    pub fn is_cloaked(&self) -> bool {
        self.cloaked
    }

    /// Ticks left before the cloak expires; meaningful only while cloaked.
    pub fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    pub fn activation_cost(&self) -> i32 {
        self.activation_cost
    }

    /// Attempt activation. Failure reasons are checked in a fixed order:
    /// owner cannot act, already cloaked, insufficient energy. On success
    /// the activation cost is consumed from the owner's pool.
    ///
    /// `owner_block` is the owner's current act-block state, if any; the
    /// pool is the owner's own, borrowed for this call.
    pub fn activate(
        &mut self,
        owner_block: Option<ActionBlock>,
        pool: &mut EnergyPool,
    ) -> Result<(), ActionBlock> {
        if let Some(block) = owner_block {
            return Err(block);
        }
        if self.cloaked {
            return Err(ActionBlock::AlreadyCloaked);
        }
        if !pool.consume(self.activation_cost) {
            return Err(ActionBlock::InsufficientEnergy {
                need: self.activation_cost,
                have: pool.current(),
            });
        }
        self.cloaked = true;
        self.remaining_ticks = self.base_duration;
        Ok(())
    }

    /// Drop the cloak. Idempotent: returns `false` if nothing was cloaked.
    pub fn deactivate(&mut self, _reason: UncloakReason) -> bool {
        if !self.cloaked {
            return false;
        }
        self.cloaked = false;
        self.remaining_ticks = 0;
        true
    }

    /// Advance one tick: decrement the timer, pay the upkeep, and report
    /// the reason if the cloak dropped. Starvation wins over expiry when
    /// both happen on the same tick.
    pub fn tick(&mut self, pool: &mut EnergyPool) -> Option<UncloakReason> {
        if !self.cloaked {
            return None;
        }
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if !pool.consume(self.drain_per_tick) {
            self.deactivate(UncloakReason::Starved);
            return Some(UncloakReason::Starved);
        }
        if self.remaining_ticks == 0 {
            self.deactivate(UncloakReason::Expired);
            return Some(UncloakReason::Expired);
        }
        None
    }
}
