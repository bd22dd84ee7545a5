use serde::{Deserialize, Serialize};

use crate::action::{Decision, PlayerId, TurnKind};
use crate::card::CardValue;

/// Lifecycle of a whole game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    Setup,
    PlayingRounds,
    GameOver { winner: PlayerId },
}

/// Progress of the round currently being played.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoundPhase {
    InProgress,
    /// `trigger` found all twelve of their cards revealed; everyone else gets one more turn.
    FinalTurnSweep { trigger: PlayerId },
    Ended { trigger: PlayerId },
}

/// How round results turn into a finished game.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScoringMode {
    /// The game is decided by the first round alone.
    #[default]
    SingleRound,
    /// Round scores accumulate; rounds repeat until someone reaches the score limit.
    Cumulative,
}

/// Everything that happened during one turn.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnRecord {
    pub player: PlayerId,
    pub kind: TurnKind,
    pub drawn: CardValue,
    pub decision: Decision,
    /// Card pushed out of the grid by a keep, if the slot held one.
    pub displaced: Option<CardValue>,
    /// Cards removed by triple-clears at the end of the turn.
    pub cleared: Vec<CardValue>,
    pub revealed_after: usize,
    /// The discard pile was recycled into the deck before drawing.
    pub reshuffled: bool,
}

/// Turn log of one completed round.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: usize,
    pub trigger: PlayerId,
    pub turns: Vec<TurnRecord>,
}

impl RoundSummary {
    /// Turns taken during the closing sweep, in play order.
    pub fn sweep_turns(&self) -> impl Iterator<Item = &TurnRecord> {
        self.turns
            .iter()
            .filter(|turn| turn.kind == TurnKind::FinalSweep)
    }
}

/// Score snapshot taken at the end of a round.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundScores {
    pub round: usize,
    pub scores: Vec<(String, i32)>,
}

/// Final result handed to callers once a game is over.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: PlayerId,
    pub winner_name: String,
    pub rounds_played: usize,
    /// Last round's scores, or running totals under [`ScoringMode::Cumulative`].
    pub final_scores: Vec<(String, i32)>,
    pub history: Vec<RoundScores>,
}
