//! Batch driver: plays many independent games and tallies the results.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::GameError;
use crate::game::{Game, GameConfig};
use crate::state::{GameOutcome, ScoringMode};

/// Knobs for a batch of simulated games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub games: usize,
    pub players: usize,
    /// Base seed; a random one is drawn when absent.
    pub seed: Option<u64>,
    pub scoring: ScoringMode,
    /// Worker threads; rayon's default pool when absent.
    pub threads: Option<usize>,
}

impl SimulationConfig {
    pub fn new(games: usize, players: usize) -> Self {
        Self {
            games,
            players,
            seed: None,
            scoring: ScoringMode::default(),
            threads: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

/// A game that could not be completed, e.g. because every card ran out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFailure {
    pub game_index: usize,
    pub seed: u64,
    pub error: String,
}

/// Aggregated statistics over a batch of games, keyed by player name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub games_requested: usize,
    pub games_completed: usize,
    pub win_counts: BTreeMap<String, usize>,
    pub average_scores: BTreeMap<String, f64>,
    pub all_scores: BTreeMap<String, Vec<i32>>,
    pub failures: Vec<GameFailure>,
}

impl BatchSummary {
    /// Share of completed games won by `name`.
    pub fn win_rate(&self, name: &str) -> f64 {
        if self.games_completed == 0 {
            return 0.0;
        }
        let wins = self.win_counts.get(name).copied().unwrap_or(0);
        wins as f64 / self.games_completed as f64
    }

    /// Score distribution for `name` as `(bin_start, count)` pairs, in contiguous bins
    /// of `bin_width` from the lowest to the highest recorded score.
    pub fn score_histogram(&self, name: &str, bin_width: i32) -> Vec<(i32, usize)> {
        assert!(bin_width > 0, "bin width must be positive");
        let Some(scores) = self.all_scores.get(name).filter(|s| !s.is_empty()) else {
            return Vec::new();
        };
        let low = scores.iter().copied().min().unwrap_or(0);
        let high = scores.iter().copied().max().unwrap_or(0);
        let low = low.div_euclid(bin_width) * bin_width;
        let bins = ((high - low) / bin_width + 1) as usize;
        let mut counts = vec![0usize; bins];
        for &score in scores {
            counts[((score - low) / bin_width) as usize] += 1;
        }
        counts
            .into_iter()
            .enumerate()
            .map(|(idx, count)| (low + idx as i32 * bin_width, count))
            .collect()
    }

    fn record(&mut self, outcome: &GameOutcome) {
        *self
            .win_counts
            .entry(outcome.winner_name.clone())
            .or_default() += 1;
        for (name, score) in &outcome.final_scores {
            self.all_scores.entry(name.clone()).or_default().push(*score);
        }
        self.games_completed += 1;
    }
}

/// Plays a single game with the default policy and scoring.
pub fn run_one_game(player_count: usize, seed: u64) -> Result<GameOutcome, GameError> {
    let config = GameConfig::new(player_count, seed)?;
    Game::new(config)?.play()
}

/// Plays `count` games with a random base seed.
pub fn run_many_games(count: usize, player_count: usize) -> Result<BatchSummary, GameError> {
    run_batch(&SimulationConfig::new(count, player_count))
}

/// Plays a batch of games in parallel.
///
/// Every game gets its own seed derived from the base seed and its index, so a seeded
/// batch gives the same summary whatever the thread count. Games that fail are listed
/// in [`BatchSummary::failures`] and left out of every tally.
pub fn run_batch(config: &SimulationConfig) -> Result<BatchSummary, GameError> {
    let template = GameConfig::new(config.players, 0)?;
    let base_seed = config.seed.unwrap_or_else(rand::random);

    let play_all = || -> Vec<(usize, u64, Result<GameOutcome, GameError>)> {
        (0..config.games)
            .into_par_iter()
            .map(|game_idx| {
                let seed = mix_seed(base_seed, game_idx as u64);
                let game_config = GameConfig {
                    seed,
                    scoring: config.scoring,
                    ..template
                };
                let result = Game::new(game_config).and_then(|mut game| game.play());
                (game_idx, seed, result)
            })
            .collect()
    };
    let results = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|_| GameError::InvalidConfiguration("could not start worker pool"))?
            .install(play_all),
        None => play_all(),
    };

    let summary = tally(config.games, results);
    info!(
        base_seed,
        completed = summary.games_completed,
        failed = summary.failures.len(),
        "batch finished"
    );
    Ok(summary)
}

/// Folds per-game results, tagged with their index and seed, into a summary.
///
/// Failed games only land in `failures`; averages divide by completed games.
pub fn tally<I>(games_requested: usize, results: I) -> BatchSummary
where
    I: IntoIterator<Item = (usize, u64, Result<GameOutcome, GameError>)>,
{
    let mut summary = BatchSummary {
        games_requested,
        ..BatchSummary::default()
    };
    for (game_index, seed, result) in results {
        match result {
            Ok(outcome) => summary.record(&outcome),
            Err(err) => {
                warn!(game_index, seed, error = %err, "game aborted");
                summary.failures.push(GameFailure {
                    game_index,
                    seed,
                    error: err.to_string(),
                });
            }
        }
    }
    for (name, scores) in &summary.all_scores {
        let total: i64 = scores.iter().map(|&s| i64::from(s)).sum();
        let average = total as f64 / summary.games_completed as f64;
        summary.average_scores.insert(name.clone(), average);
    }
    summary
}

/// Derives a per-game seed from the batch seed (xorshift-style mix).
pub fn mix_seed(base: u64, index: u64) -> u64 {
    let mut z = base ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}
