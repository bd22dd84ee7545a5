use thiserror::Error;

use crate::action::PlayerId;

/// Errors that can occur while building or simulating a game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("draw attempted on an empty deck")]
    EmptyDeck,
    #[error("deck and discard pile are both exhausted")]
    NoCardsAvailable,
    #[error("player index {0} is out of range")]
    InvalidPlayer(PlayerId),
    #[error("no player reached the score limit within {0} rounds")]
    RoundLimitExceeded(usize),
    #[error("game is already over")]
    GameOver,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}
