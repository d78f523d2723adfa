//! Skirmish - Entry Point
//!
//! Runs a scenario headlessly to completion and prints the outcome as
//! JSON or text. Without a scenario file the built-in demo matchup runs.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use skirmish::core::error::Result;
use skirmish::core::types::TeamId;
use skirmish::game::Game;
use skirmish::report::{ConsoleReporter, Reporter, TracingReporter};
use skirmish::scenario::Scenario;

/// Headless battle runner
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Run a scripted skirmish to completion and print the outcome")]
struct Args {
    /// Scenario file (TOML); omit to run the built-in demo matchup
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Random seed for deterministic runs (overrides the scenario seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Turn cap override
    #[arg(long)]
    max_turns: Option<u32>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every battle event to stdout
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(serde::Serialize)]
struct RunResult {
    outcome: String,
    winner: Option<String>,
    turns: u32,
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skirmish=info".into()),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default_skirmish(),
    };
    if args.seed.is_some() {
        scenario.seed = args.seed;
    }
    if let Some(max_turns) = args.max_turns {
        scenario.rules.max_turns = max_turns;
    }

    let config = scenario.config()?;
    let reporter: Box<dyn Reporter> = if args.verbose {
        Box::new(ConsoleReporter)
    } else {
        Box::new(TracingReporter)
    };
    let mut game = Game::new(config, reporter)?;

    for (index, team) in scenario.teams.iter().enumerate() {
        let team_id = TeamId(index as u32);
        for spec in &team.units {
            game.spawn(spec, team_id);
        }
    }

    let seed = game.seed();
    let outcome = game.run();

    let result = RunResult {
        outcome: outcome.reason.as_str().to_string(),
        winner: outcome
            .winning_team
            .map(|t| scenario.teams[t.0 as usize].name.clone()),
        turns: outcome.turns,
        seed,
    };

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        "text" => {
            println!("Skirmish Result");
            println!("===============");
            println!("Outcome: {}", result.outcome);
            match &result.winner {
                Some(name) => println!("Winner: {}", name),
                None => println!("Winner: none"),
            }
            println!("Turns: {}", result.turns);
            println!("Seed: {}", result.seed);
        }
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
