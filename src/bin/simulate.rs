use std::error::Error;
use std::process;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use skyjobot::{Game, ScoringMode, describe_turn, render_game};

const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Play a single Skyjo game between heuristic players.")]
struct Args {
    /// Number of players (2-8)
    #[arg(short = 'p', long = "players", default_value_t = 4)]
    players: usize,

    /// Seed for shuffling and every random choice
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Accumulate scores over rounds until someone reaches the score limit
    #[arg(long = "cumulative", action = ArgAction::SetTrue)]
    cumulative: bool,

    /// Show every turn and the table after each round
    #[arg(long = "visualize", action = ArgAction::SetTrue)]
    visualize: bool,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let scoring = if args.cumulative {
        ScoringMode::Cumulative
    } else {
        ScoringMode::SingleRound
    };
    let mut game = Game::builder(args.players)?
        .with_seed(args.seed)
        .with_scoring(scoring)
        .build()?;
    game.start()?;

    println!(
        "Starting Skyjo simulation with {} players (seed {:#x}).\n",
        args.players, args.seed
    );
    if args.visualize {
        println!("{}", render_game(&game));
    }

    while !game.is_finished() {
        let summary = game.play_round()?;
        if args.visualize {
            let names: Vec<String> = game.players().iter().map(|p| p.name().to_string()).collect();
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            for turn in &summary.turns {
                println!("{}", describe_turn(turn, &names));
            }
            println!();
            println!("{}", render_game(&game));
        }
        let trigger = game.player(summary.trigger)?.name().to_string();
        println!(
            "Round {} ended after {} turns ({trigger} revealed every card).",
            summary.round,
            summary.turns.len()
        );
        if let Some(scores) = game.history().last() {
            for (name, score) in &scores.scores {
                println!("  {name:<10} {score:>4}");
            }
        }
    }

    let outcome = game
        .outcome()
        .ok_or("game stopped before a winner was decided")?;
    println!(
        "\nGame finished after {} round(s). Winner: {}.",
        outcome.rounds_played, outcome.winner_name
    );
    for (name, score) in &outcome.final_scores {
        println!("  {name:<10} {score:>4}");
    }
    Ok(())
}
