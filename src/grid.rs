use std::array::from_fn;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::card::{CardValue, is_valid_value};
use crate::deck::Deck;
use crate::error::GameError;

pub const GRID_ROWS: usize = 3;
pub const GRID_COLS: usize = 4;
pub const GRID_SLOTS: usize = GRID_ROWS * GRID_COLS;
/// Cards revealed per player before the first turn.
pub const INITIAL_REVEALS: usize = 2;

/// Coordinates of a slot in a player's grid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotPos {
    pub row: usize,
    pub col: usize,
}

impl SlotPos {
    pub fn new(row: usize, col: usize) -> Self {
        assert!(
            row < GRID_ROWS && col < GRID_COLS,
            "slot ({row}, {col}) is outside the grid"
        );
        Self { row, col }
    }

    /// Row-major index in `0..GRID_SLOTS`.
    pub fn from_index(index: usize) -> Self {
        assert!(index < GRID_SLOTS, "slot index {index} is outside the grid");
        Self {
            row: index / GRID_COLS,
            col: index % GRID_COLS,
        }
    }

    pub fn index(&self) -> usize {
        self.row * GRID_COLS + self.col
    }

    /// All slots in row-major order.
    pub fn all() -> impl Iterator<Item = SlotPos> {
        (0..GRID_SLOTS).map(SlotPos::from_index)
    }

    /// Uniformly random slot among all twelve.
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self::new(rng.gen_range(0..GRID_ROWS), rng.gen_range(0..GRID_COLS))
    }
}

/// A single grid position. `card` is `None` once the column has been cleared.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub card: Option<CardValue>,
    pub revealed: bool,
}

/// A player's 3x4 layout of face-down and face-up cards.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerGrid {
    slots: [[Slot; GRID_COLS]; GRID_ROWS],
    revealed_count: usize,
}

impl PlayerGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a grid from explicit cards, all hidden.
    pub fn from_cards(cards: [[CardValue; GRID_COLS]; GRID_ROWS]) -> Self {
        let slots = from_fn(|row| {
            from_fn(|col| {
                let card = cards[row][col];
                debug_assert!(is_valid_value(card));
                Slot {
                    card: Some(card),
                    revealed: false,
                }
            })
        });
        Self {
            slots,
            revealed_count: 0,
        }
    }

    /// Replaces the grid with twelve fresh hidden cards popped from the deck, row by row.
    pub fn deal(&mut self, deck: &mut Deck) -> Result<(), GameError> {
        for pos in SlotPos::all() {
            let card = deck.draw()?;
            self.slots[pos.row][pos.col] = Slot {
                card: Some(card),
                revealed: false,
            };
        }
        self.revealed_count = 0;
        Ok(())
    }

    /// Turns over two distinct random slots.
    pub fn reveal_initial(&mut self, rng: &mut dyn RngCore) {
        let mut opened = 0;
        while opened < INITIAL_REVEALS {
            let pos = SlotPos::random(rng);
            if !self.slot(pos).revealed {
                self.reveal(pos);
                opened += 1;
            }
        }
    }

    /// Turns over a hidden slot and returns its card.
    ///
    /// Already revealed slots are left alone and yield `None`; so do cleared slots, which
    /// still become revealed.
    pub fn reveal(&mut self, pos: SlotPos) -> Option<CardValue> {
        let slot = &mut self.slots[pos.row][pos.col];
        if slot.revealed {
            return None;
        }
        slot.revealed = true;
        self.revealed_count += 1;
        slot.card
    }

    /// Installs `card` face up at `pos` and hands back whatever was there.
    pub fn exchange(&mut self, pos: SlotPos, card: CardValue) -> Option<CardValue> {
        debug_assert!(is_valid_value(card));
        let slot = &mut self.slots[pos.row][pos.col];
        let old = slot.card.replace(card);
        if !slot.revealed {
            slot.revealed = true;
            self.revealed_count += 1;
        }
        old
    }

    /// Removes every column whose three cards are face up and equal.
    ///
    /// Returns the removed cards so they can go to the discard pile.
    pub fn check_and_clear_triples(&mut self) -> Vec<CardValue> {
        let mut removed = Vec::new();
        for col in 0..GRID_COLS {
            let top = self.slots[0][col];
            let Some(value) = top.card else {
                continue;
            };
            let matching = (0..GRID_ROWS).all(|row| {
                let slot = self.slots[row][col];
                slot.revealed && slot.card == Some(value)
            });
            if !matching {
                continue;
            }
            for row in 0..GRID_ROWS {
                self.slots[row][col] = Slot::default();
                removed.push(value);
            }
            self.revealed_count -= GRID_ROWS;
        }
        removed
    }

    /// Sum of every remaining card, face up or not.
    pub fn score(&self) -> i32 {
        self.cards().map(i32::from).sum()
    }

    /// Sum of the face-up cards only.
    pub fn revealed_score(&self) -> i32 {
        self.iter()
            .filter(|(_, slot)| slot.revealed)
            .filter_map(|(_, slot)| slot.card)
            .map(i32::from)
            .sum()
    }

    /// Highest face-up card; the first one in row-major order wins ties.
    pub fn choose_worst_revealed_slot(&self) -> Option<SlotPos> {
        let mut worst: Option<(SlotPos, CardValue)> = None;
        for (pos, slot) in self.iter() {
            if !slot.revealed {
                continue;
            }
            let Some(value) = slot.card else {
                continue;
            };
            if worst.is_none_or(|(_, best)| value > best) {
                worst = Some((pos, value));
            }
        }
        worst.map(|(pos, _)| pos)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.revealed_count == GRID_SLOTS
    }

    pub fn slot(&self, pos: SlotPos) -> Slot {
        self.slots[pos.row][pos.col]
    }

    /// Slots paired with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (SlotPos, Slot)> + '_ {
        SlotPos::all().map(|pos| (pos, self.slot(pos)))
    }

    /// Every card still on the grid.
    pub fn cards(&self) -> impl Iterator<Item = CardValue> + '_ {
        self.iter().filter_map(|(_, slot)| slot.card)
    }
}
