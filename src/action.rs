use serde::{Deserialize, Serialize};

use crate::grid::SlotPos;

/// Zero-based index of a player within the game.
pub type PlayerId = usize;

/// What a player does with the card they just drew.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Swap the drawn card into the slot; the displaced card goes to the discard pile.
    Keep(SlotPos),
    /// Throw the drawn card away and turn over the slot instead.
    Discard(SlotPos),
}

impl Decision {
    /// Returns the grid slot the decision targets.
    pub fn slot(&self) -> SlotPos {
        match self {
            Decision::Keep(pos) | Decision::Discard(pos) => *pos,
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, Decision::Keep(_))
    }
}

/// Whether a turn belongs to the regular rotation or the closing sweep.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TurnKind {
    Normal,
    FinalSweep,
}
