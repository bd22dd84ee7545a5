use rand::RngCore;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::card::{CardValue, full_deck, is_valid_value};
use crate::error::GameError;

/// Face-down draw pile. Cards are drawn from the end of the vector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<CardValue>,
}

impl Deck {
    /// Builds the standard 150-card deck and shuffles it.
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let mut cards = full_deck();
        cards.shuffle(rng);
        Self { cards }
    }

    /// Uses the given cards as-is; the last element is drawn first.
    pub fn from_cards(cards: Vec<CardValue>) -> Self {
        debug_assert!(cards.iter().all(|card| is_valid_value(*card)));
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[CardValue] {
        &self.cards
    }

    pub fn draw(&mut self) -> Result<CardValue, GameError> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    /// Moves every discard except the top one into the deck and shuffles it.
    ///
    /// Cards already in the deck stay in it; in practice this is only called on an
    /// empty deck.
    pub fn reshuffle_from(
        &mut self,
        discard: &mut DiscardPile,
        rng: &mut dyn RngCore,
    ) -> Result<(), GameError> {
        if discard.len() < 2 {
            return Err(GameError::NoCardsAvailable);
        }
        let top = discard.cards.pop();
        self.cards.append(&mut discard.cards);
        self.cards.shuffle(rng);
        discard.cards.extend(top);
        Ok(())
    }
}

/// Face-up discard pile; the last element is the top card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardPile {
    cards: Vec<CardValue>,
}

impl DiscardPile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: CardValue) {
        debug_assert!(is_valid_value(card));
        self.cards.push(card);
    }

    pub fn top(&self) -> Option<CardValue> {
        self.cards.last().copied()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[CardValue] {
        &self.cards
    }

    pub(crate) fn clear(&mut self) {
        self.cards.clear();
    }
}
