//! End-to-end battle tests

use std::fs;
use std::sync::Arc;

use skirmish::core::config::GameConfig;
use skirmish::core::types::{TeamId, UnitId};
use skirmish::events::BattleEvent;
use skirmish::game::Game;
use skirmish::report::{NullReporter, RecordingReporter};
use skirmish::scenario::Scenario;
use skirmish::unit::cloak::UncloakReason;
use skirmish::unit::factory::{UnitKind, UnitSpec};
use skirmish::unit::strategy::OverchargeStrategy;
use skirmish::unit::Combatant;

#[test]
fn test_demo_scenario_runs_to_completion() {
    let mut scenario = Scenario::default_skirmish();
    scenario.seed = Some(1234);

    let reporter = RecordingReporter::new();
    let mut game = Game::new(scenario.config().unwrap(), Box::new(reporter.clone())).unwrap();
    for (index, team) in scenario.teams.iter().enumerate() {
        for spec in &team.units {
            game.spawn(spec, TeamId(index as u32));
        }
    }
    let spawned = game.units().len();
    let outcome = game.run();

    assert!(outcome.turns <= scenario.rules.max_turns);
    assert_eq!(
        reporter.count(|e| matches!(e, BattleEvent::BattleEnded { .. })),
        1
    );
    // Roster bookkeeping matches the event stream
    let deaths = reporter.count(|e| matches!(e, BattleEvent::Death { .. }));
    assert_eq!(game.roster().len(), spawned - deaths);
    if let Some(winner) = outcome.winning_team {
        for id in game.roster() {
            assert_eq!(game.unit(*id).team(), winner);
        }
    }
}

#[test]
fn test_lockdown_disables_then_releases_target() {
    let mut reporter = RecordingReporter::new();
    let mut phantom = UnitSpec::new(UnitKind::Phantom, "whisper").build(UnitId(0), TeamId(0));
    let mut trooper = UnitSpec::new(UnitKind::Trooper, "ajax").build(UnitId(1), TeamId(1));

    // A stock phantom spawns with 75 energy; lockdown costs 100, so the
    // first attempt is refused with the shortfall reported.
    assert!(!phantom.cast_lockdown(&mut trooper, &mut reporter));
    assert!(trooper.can_act());
    assert_eq!(
        reporter.count(|e| matches!(
            e,
            BattleEvent::AbilityFailed {
                reason: skirmish::events::ActionBlock::InsufficientEnergy { need: 100, have: 75 },
                ..
            }
        )),
        1
    );

    // One tick of passive regen (25) covers the cost.
    phantom.tick(&mut reporter);
    assert!(phantom.cast_lockdown(&mut trooper, &mut reporter));
    assert!(!trooper.can_act());
    assert_eq!(trooper.lockdown_ticks(), 3);
    assert_eq!(phantom.energy().unwrap().current(), 0);
    assert_eq!(
        reporter.count(|e| matches!(e, BattleEvent::LockdownApplied { .. })),
        1
    );

    for _ in 0..3 {
        trooper.tick(&mut reporter);
    }
    assert!(trooper.can_act());
    assert_eq!(
        reporter.count(|e| matches!(
            e,
            BattleEvent::LockdownExpired { unit } if *unit == UnitId(1)
        )),
        1
    );
}

#[test]
fn test_cloak_expires_after_its_duration() {
    let mut reporter = RecordingReporter::new();
    let mut wraith = UnitSpec::new(UnitKind::Wraith, "mirage").build(UnitId(0), TeamId(0));

    assert!(wraith.activate_cloak(&mut reporter));
    assert!(wraith.is_cloaked());

    // Passive regen (20) outruns the drain (12), so the cloak runs its
    // full three ticks and expires rather than starving.
    for _ in 0..3 {
        wraith.tick(&mut reporter);
    }
    assert!(!wraith.is_cloaked());
    assert_eq!(
        reporter.count(|e| matches!(
            e,
            BattleEvent::CloakDeactivated { reason, .. } if *reason == UncloakReason::Expired
        )),
        1
    );
}

#[test]
fn test_elite_trooper_beats_stock_trooper() {
    // Abilities off; the elite out-damages the stock trooper badly
    // enough to win from either side of the turn order.
    let config = GameConfig::new(100, Some(9), 0.0, 0.0, 0.0).unwrap();
    let mut game = Game::new(config, Box::new(NullReporter)).unwrap();
    game.spawn(&UnitSpec::elite_trooper("sarge"), TeamId(0));
    game.spawn(&UnitSpec::new(UnitKind::Trooper, "grunt"), TeamId(1));

    let outcome = game.run();
    assert_eq!(outcome.winning_team, Some(TeamId(0)));
}

#[test]
fn test_scenario_file_loads_and_runs() {
    let text = r#"
        seed = 77

        [rules]
        max_turns = 60
        p_lockdown = 0.0
        p_cloak = 0.0
        p_uncloak = 0.0

        [[teams]]
        name = "red"
        units = [
            { kind = "trooper", name = "r1" },
            { kind = "ravager", name = "r2" },
        ]

        [[teams]]
        name = "blue"
        units = [
            { kind = "trooper", name = "b1" },
            { kind = "ravager", name = "b2" },
        ]
    "#;
    let path = std::env::temp_dir().join("skirmish_integration_scenario.toml");
    fs::write(&path, text).unwrap();

    let scenario = Scenario::load(&path).unwrap();
    let mut game = Game::new(scenario.config().unwrap(), Box::new(NullReporter)).unwrap();
    for (index, team) in scenario.teams.iter().enumerate() {
        for spec in &team.units {
            game.spawn(spec, TeamId(index as u32));
        }
    }
    let outcome = game.run();
    assert!(outcome.turns <= 60);
    fs::remove_file(&path).ok();
}

#[test]
fn test_strategy_swap_shows_up_in_the_event_stream() {
    let config = GameConfig::new(100, Some(3), 0.0, 0.0, 0.0).unwrap();
    let reporter = RecordingReporter::new();
    let mut game = Game::new(config, Box::new(reporter.clone())).unwrap();
    let a = game.spawn(&UnitSpec::new(UnitKind::Trooper, "alpha"), TeamId(0));
    game.spawn(&UnitSpec::new(UnitKind::Trooper, "beta"), TeamId(1));

    let mut swap_log = NullReporter;
    game.unit_mut(a)
        .set_strategy(Arc::new(OverchargeStrategy::new(5, 6)), &mut swap_log);

    game.run();
    assert!(reporter.count(|e| matches!(e, BattleEvent::Overcharged { unit, .. } if *unit == a)) > 0);
}
