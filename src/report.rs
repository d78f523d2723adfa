//! Reporting collaborators
//!
//! The core hands every observable occurrence to an injected sink as
//! structured [`BattleEvent`] data. Formatting, localization, and
//! storage are entirely the sink's concern; a sink must never affect
//! simulation timing or ordering.

use std::cell::RefCell;
use std::rc::Rc;

use crate::events::BattleEvent;

/// Fire-and-forget event sink.
pub trait Reporter {
    fn log(&mut self, event: &BattleEvent);
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn log(&mut self, _event: &BattleEvent) {}
}

/// Plain-text lines on stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn log(&mut self, event: &BattleEvent) {
        match event {
            BattleEvent::Spawned { unit, name, team } => {
                println!("[spawn] {name} ({unit:?}) joins team {}", team.0);
            }
            BattleEvent::TurnStarted { turn } => {
                println!("=== Turn {turn} ===");
            }
            BattleEvent::Moved { unit, x, y } => {
                println!("[move] {unit:?} -> ({x}, {y})");
            }
            BattleEvent::ActionBlocked { unit, reason } => {
                println!("[blocked] {unit:?}: {reason:?}");
            }
            BattleEvent::AbilityAttempted { unit, ability } => {
                println!("[ability] {unit:?} attempts {ability:?}");
            }
            BattleEvent::AbilityFailed {
                unit,
                ability,
                reason,
            } => {
                println!("[ability] {unit:?} fails {ability:?}: {reason:?}");
            }
            BattleEvent::CloakActivated {
                unit,
                duration,
                remaining_energy,
            } => {
                println!("[cloak] {unit:?} cloaks for {duration} ticks ({remaining_energy} energy left)");
            }
            BattleEvent::CloakDeactivated { unit, reason } => {
                println!("[cloak] {unit:?} uncloaks ({reason:?})");
            }
            BattleEvent::LockdownApplied {
                caster,
                target,
                duration,
            } => {
                println!("[lockdown] {caster:?} locks {target:?} for {duration} ticks");
            }
            BattleEvent::LockdownExpired { unit } => {
                println!("[lockdown] {unit:?} is free");
            }
            BattleEvent::Overcharged { unit, health_cost } => {
                println!("[overcharge] {unit:?} burns {health_cost} health");
            }
            BattleEvent::Damage {
                attacker,
                target,
                amount,
                remaining,
            } => {
                println!("[hit] {attacker:?} -> {target:?} for {amount} ({remaining} left)");
            }
            BattleEvent::Regenerated { unit, amount } => {
                println!("[regen] {unit:?} +{amount}");
            }
            BattleEvent::StrategyChanged { unit, strategy } => {
                println!("[strategy] {unit:?} switches to {strategy}");
            }
            BattleEvent::Death { unit } => {
                println!("*** {unit:?} destroyed ***");
            }
            BattleEvent::Idle { unit } => {
                println!("[idle] {unit:?} has no target");
            }
            BattleEvent::BattleEnded {
                winning_team,
                reason,
                turns,
            } => match winning_team {
                Some(team) => println!("### team {} wins after {turns} turns ({reason:?}) ###", team.0),
                None => println!("### no winner after {turns} turns ({reason:?}) ###"),
            },
        }
    }
}

/// Bridges battle events into `tracing` for the CLI's diagnostics.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn log(&mut self, event: &BattleEvent) {
        match event {
            BattleEvent::Death { .. } | BattleEvent::BattleEnded { .. } => {
                tracing::info!(?event, "battle event");
            }
            _ => tracing::debug!(?event, "battle event"),
        }
    }
}

/// Captures the full event stream; used by determinism tests.
///
/// The handle is a cheap clone over shared storage so the test can keep
/// one end while the game owns the other. The simulation is
/// single-threaded, so `Rc<RefCell<_>>` is all the sharing it needs.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Rc<RefCell<Vec<BattleEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BattleEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Count of events matching a predicate.
    pub fn count(&self, predicate: impl Fn(&BattleEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }
}

impl Reporter for RecordingReporter {
    fn log(&mut self, event: &BattleEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
