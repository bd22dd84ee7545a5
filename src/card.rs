/// Face value of a Skyjo card, between -2 and 12 inclusive.
pub type CardValue = i8;

pub const MIN_CARD_VALUE: CardValue = -2;
pub const MAX_CARD_VALUE: CardValue = 12;
pub const DECK_SIZE: usize = 150;
/// Number of distinct card values (-2 through 12).
pub const DISTINCT_VALUES: usize = (MAX_CARD_VALUE - MIN_CARD_VALUE + 1) as usize;

/// Copies of each value in a standard deck.
pub const CARD_DISTRIBUTION: [(CardValue, usize); DISTINCT_VALUES] = [
    (-2, 5),
    (-1, 10),
    (0, 15),
    (1, 10),
    (2, 10),
    (3, 10),
    (4, 10),
    (5, 10),
    (6, 10),
    (7, 10),
    (8, 10),
    (9, 10),
    (10, 10),
    (11, 10),
    (12, 10),
];

/// Per-value card counts, indexed by `value - MIN_CARD_VALUE`.
pub type Census = [usize; DISTINCT_VALUES];

#[inline]
pub fn is_valid_value(value: CardValue) -> bool {
    (MIN_CARD_VALUE..=MAX_CARD_VALUE).contains(&value)
}

/// Builds the full 150-card deck in deterministic order (unshuffled).
pub fn full_deck() -> Vec<CardValue> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for (value, copies) in CARD_DISTRIBUTION {
        deck.extend(std::iter::repeat(value).take(copies));
    }
    deck
}

/// Tallies a collection of cards by value.
pub fn card_census<I>(cards: I) -> Census
where
    I: IntoIterator<Item = CardValue>,
{
    let mut census = [0usize; DISTINCT_VALUES];
    for card in cards {
        assert!(is_valid_value(card), "card value {card} out of range");
        census[(card - MIN_CARD_VALUE) as usize] += 1;
    }
    census
}

/// Census of a complete, untouched deck.
pub fn full_census() -> Census {
    let mut census = [0usize; DISTINCT_VALUES];
    for (value, copies) in CARD_DISTRIBUTION {
        census[(value - MIN_CARD_VALUE) as usize] = copies;
    }
    census
}
