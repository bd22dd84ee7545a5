use tracing::debug;

use crate::action::PlayerId;
use crate::error::GameError;
use crate::game::Game;
use crate::state::{RoundPhase, RoundSummary};

impl Game {
    /// Plays one round to completion and scores it.
    ///
    /// Seats take turns in order until a player starts their turn with all twelve cards
    /// revealed. That player becomes the trigger and takes no further turn; every other
    /// player then plays exactly one final turn, in seat order.
    pub fn play_round(&mut self) -> Result<RoundSummary, GameError> {
        self.start()?;
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        self.rounds_played += 1;
        self.round_phase = RoundPhase::InProgress;
        let round = self.rounds_played;
        let mut turns = Vec::new();

        let trigger = 'cycle: loop {
            for player in 0..self.players.len() {
                if self.players[player].grid().is_fully_revealed() {
                    break 'cycle player;
                }
                turns.push(self.play_turn(player)?);
            }
        };
        debug!(round, trigger, turns = turns.len(), "final turn sweep");

        self.round_phase = RoundPhase::FinalTurnSweep { trigger };
        let others: Vec<PlayerId> = (0..self.players.len())
            .filter(|&player| player != trigger)
            .collect();
        for player in others {
            turns.push(self.play_turn(player)?);
        }
        self.round_phase = RoundPhase::Ended { trigger };

        self.finish_round()?;
        Ok(RoundSummary {
            round,
            trigger,
            turns,
        })
    }
}
