//! Skyjo game engine and batch simulator for studying heuristic play.

pub mod action;
pub mod card;
pub mod deck;
pub mod error;
pub mod game;
pub mod grid;
pub mod policy;
mod round;
pub mod score;
pub mod simulation;
pub mod state;
pub mod visualize;

pub use crate::action::{Decision, PlayerId, TurnKind};
pub use crate::card::CardValue;
pub use crate::deck::{Deck, DiscardPile};
pub use crate::error::GameError;
pub use crate::game::{Game, GameBuilder, GameConfig, Player};
pub use crate::grid::{PlayerGrid, Slot, SlotPos};
pub use crate::policy::{Policy, ThresholdPolicy};
pub use crate::simulation::{
    BatchSummary, GameFailure, SimulationConfig, run_batch, run_many_games, run_one_game,
    tally,
};
pub use crate::state::{
    GameOutcome, GameStatus, RoundPhase, RoundScores, RoundSummary, ScoringMode, TurnRecord,
};
pub use crate::visualize::{describe_turn, render_game, render_grid};
