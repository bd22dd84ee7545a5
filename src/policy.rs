use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::action::Decision;
use crate::card::CardValue;
use crate::grid::{PlayerGrid, SlotPos};

/// Cards at or below this value are kept by the default policy.
pub const DEFAULT_KEEP_THRESHOLD: CardValue = 3;

/// Interface for deciding what to do with a freshly drawn card.
///
/// Implementations must take every random choice from `rng` so that games stay
/// reproducible under a fixed seed.
pub trait Policy: Send + Sync {
    fn decide(&self, drawn: CardValue, grid: &PlayerGrid, rng: &mut dyn RngCore) -> Decision;
}

/// Keeps low cards over the worst face-up card and otherwise flips a random slot.
///
/// In plain English:
/// - A drawn card at or below the threshold replaces the highest revealed card. With no
///   revealed card to replace, it goes to a random slot.
/// - Anything higher is discarded and a random slot is turned over, even if that slot is
///   already face up.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub keep_threshold: CardValue,
}

impl ThresholdPolicy {
    pub fn new(keep_threshold: CardValue) -> Self {
        Self { keep_threshold }
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_KEEP_THRESHOLD)
    }
}

impl Policy for ThresholdPolicy {
    fn decide(&self, drawn: CardValue, grid: &PlayerGrid, rng: &mut dyn RngCore) -> Decision {
        if drawn <= self.keep_threshold {
            let target = grid
                .choose_worst_revealed_slot()
                .unwrap_or_else(|| SlotPos::random(rng));
            Decision::Keep(target)
        } else {
            Decision::Discard(SlotPos::random(rng))
        }
    }
}
