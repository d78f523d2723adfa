//! Replay determinism tests
//!
//! A configuration plus a seed must fully determine a battle, including
//! the order of every emitted event.

use skirmish::core::types::TeamId;
use skirmish::events::BattleEvent;
use skirmish::game::{Game, Outcome};
use skirmish::report::RecordingReporter;
use skirmish::scenario::Scenario;

fn run_demo(seed: Option<u64>) -> (u64, Outcome, Vec<BattleEvent>) {
    let mut scenario = Scenario::default_skirmish();
    scenario.seed = seed;

    let reporter = RecordingReporter::new();
    let mut game = Game::new(scenario.config().unwrap(), Box::new(reporter.clone())).unwrap();
    for (index, team) in scenario.teams.iter().enumerate() {
        for spec in &team.units {
            game.spawn(spec, TeamId(index as u32));
        }
    }
    let seed = game.seed();
    let outcome = game.run();
    (seed, outcome, reporter.events())
}

#[test]
fn test_same_seed_produces_identical_event_streams() {
    for seed in [0, 1, 42, 0xDEAD_BEEF] {
        let (_, first_outcome, first_events) = run_demo(Some(seed));
        let (_, second_outcome, second_events) = run_demo(Some(seed));
        assert_eq!(first_outcome, second_outcome, "seed {seed}");
        assert_eq!(first_events, second_events, "seed {seed}");
    }
}

#[test]
fn test_entropy_seeded_run_can_be_replayed() {
    // No seed given: the game draws one from entropy and records it.
    // Feeding the recorded seed back reproduces the run exactly.
    let (seed, outcome, events) = run_demo(None);
    let (_, replay_outcome, replay_events) = run_demo(Some(seed));
    assert_eq!(outcome, replay_outcome);
    assert_eq!(events, replay_events);
}

#[test]
fn test_every_run_terminates_within_the_turn_cap() {
    for seed in 0..20 {
        let (_, outcome, events) = run_demo(Some(seed));
        assert!(outcome.turns <= 100, "seed {seed}");
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, BattleEvent::BattleEnded { .. }))
                .count(),
            1,
            "seed {seed}"
        );
    }
}
