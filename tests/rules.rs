use rand::RngCore;

use skyjobot::card::{DECK_SIZE, card_census, full_census};
use skyjobot::grid::{GRID_COLS, GRID_ROWS, GRID_SLOTS};
use skyjobot::{
    Decision, GameBuilder, GameError, GameStatus, PlayerGrid, Policy, RoundPhase, ScoringMode,
    SlotPos, TurnKind,
};

/// Grid contents with no repeated value inside any column.
const MIXED: [i8; 12] = [4, 5, 6, 7, 8, 9, 10, 11, 12, 4, 5, 6];

/// Keeps every card, filling hidden slots column by column.
struct ColumnFiller;

impl Policy for ColumnFiller {
    fn decide(&self, _drawn: i8, grid: &PlayerGrid, _rng: &mut dyn RngCore) -> Decision {
        let target = (0..GRID_COLS)
            .flat_map(|col| (0..GRID_ROWS).map(move |row| SlotPos::new(row, col)))
            .find(|pos| !grid.slot(*pos).revealed)
            .unwrap_or(SlotPos::new(0, 0));
        Decision::Keep(target)
    }
}

/// Deck whose first `dealt` cards (drawn from the end) are `grid_cards`, followed by
/// `draws` in draw order.
fn stacked_deck(grids: &[Vec<i8>], draws: &[i8]) -> Vec<i8> {
    let mut deck: Vec<i8> = draws.iter().rev().copied().collect();
    for grid in grids.iter().rev() {
        deck.extend(grid.iter().rev());
    }
    deck
}

#[test]
fn initial_setup_two_players() -> Result<(), GameError> {
    let mut game = GameBuilder::new(2)?.with_seed(9).build()?;
    assert_eq!(game.status(), GameStatus::Setup);
    assert_eq!(game.deck().len(), DECK_SIZE);
    game.start()?;
    assert_eq!(game.status(), GameStatus::PlayingRounds);
    assert_eq!(game.deck().len(), DECK_SIZE - 2 * GRID_SLOTS);
    for player in game.players() {
        assert_eq!(player.grid().revealed_count(), 2);
        assert_eq!(player.grid().cards().count(), GRID_SLOTS);
    }
    assert_eq!(game.players()[0].name(), "Player 1");
    assert_eq!(game.players()[1].name(), "Player 2");
    Ok(())
}

#[test]
fn player_count_is_validated() {
    assert!(matches!(
        GameBuilder::new(1),
        Err(GameError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        GameBuilder::new(9),
        Err(GameError::InvalidConfiguration(_))
    ));
    assert!(GameBuilder::new(8).is_ok());
}

#[test]
fn short_custom_deck_is_rejected() -> Result<(), GameError> {
    let result = GameBuilder::new(3)?.with_deck(vec![0; 20]).build();
    assert!(matches!(result, Err(GameError::InvalidConfiguration(_))));
    Ok(())
}

#[test]
fn keep_turn_swaps_with_worst_revealed_card() -> Result<(), GameError> {
    let grid_a: Vec<i8> = (1..=12).collect();
    let grid_b = vec![0; 12];
    let deck = stacked_deck(&[grid_a, grid_b], &[-2]);
    let mut game = GameBuilder::new(2)?.with_deck(deck).build()?;
    game.start()?;
    let worst = game.players()[0]
        .grid()
        .choose_worst_revealed_slot()
        .expect("two cards revealed");
    let worst_value = game.players()[0].grid().slot(worst).card;

    let turn = game.play_turn(0)?;
    assert_eq!(turn.drawn, -2);
    assert_eq!(turn.kind, TurnKind::Normal);
    assert_eq!(turn.decision, Decision::Keep(worst));
    assert_eq!(turn.displaced, worst_value);
    assert_eq!(game.discard_pile().top(), worst_value);
    assert_eq!(game.players()[0].grid().slot(worst).card, Some(-2));
    assert_eq!(turn.revealed_after, 2);
    Ok(())
}

#[test]
fn discard_turn_reveals_a_slot() -> Result<(), GameError> {
    let deck = stacked_deck(&[MIXED.to_vec(), MIXED.to_vec()], &[11]);
    let mut game = GameBuilder::new(2)?.with_deck(deck).build()?;
    game.start()?;
    let turn = game.play_turn(1)?;
    let Decision::Discard(pos) = turn.decision else {
        panic!("11 should be discarded");
    };
    assert_eq!(game.discard_pile().cards(), &[11]);
    assert!(game.players()[1].grid().slot(pos).revealed);
    assert!(turn.revealed_after == 2 || turn.revealed_after == 3);
    Ok(())
}

#[test]
fn completed_column_goes_to_discard_pile() -> Result<(), GameError> {
    // Column 0 of player 1 holds three 1s; keeping 1s into it reveals them all.
    let grid_a = vec![1, 8, 8, 8, 1, 9, 9, 9, 1, 10, 10, 10];
    let deck = stacked_deck(&[grid_a, MIXED.to_vec()], &[1; 5]);
    let expected = card_census(deck.iter().copied());
    let mut game = GameBuilder::new(2)?
        .with_deck(deck)
        .with_policy(ColumnFiller)
        .build()?;
    game.start()?;
    let mut cleared = Vec::new();
    for _ in 0..3 {
        let turn = game.play_turn(0)?;
        if !turn.cleared.is_empty() {
            cleared = turn.cleared;
            break;
        }
    }
    assert_eq!(cleared, vec![1, 1, 1]);
    assert_eq!(game.discard_pile().top(), Some(1));
    for row in 0..GRID_ROWS {
        assert_eq!(game.players()[0].grid().slot(SlotPos::new(row, 0)).card, None);
    }
    assert_eq!(game.card_census(), expected);
    Ok(())
}

#[test]
fn empty_deck_is_refilled_from_discards() -> Result<(), GameError> {
    // Exactly the grids plus two cards: the third turn must reshuffle.
    let deck = stacked_deck(&[MIXED.to_vec(), MIXED.to_vec()], &[12, 11]);
    let mut game = GameBuilder::new(2)?.with_deck(deck).build()?;
    game.start()?;
    assert!(!game.play_turn(0)?.reshuffled);
    assert!(!game.play_turn(1)?.reshuffled);
    assert!(game.deck().is_empty());
    assert_eq!(game.discard_pile().len(), 2);
    let turn = game.play_turn(0)?;
    assert!(turn.reshuffled);
    assert_eq!(turn.drawn, 12);
    Ok(())
}

#[test]
fn exhausted_cards_abort_the_game() -> Result<(), GameError> {
    let deck = stacked_deck(&[MIXED.to_vec(), MIXED.to_vec()], &[12]);
    let mut game = GameBuilder::new(2)?.with_deck(deck).build()?;
    game.start()?;
    game.play_turn(0)?;
    assert_eq!(game.play_turn(1), Err(GameError::NoCardsAvailable));
    Ok(())
}

#[test]
fn invalid_player_is_rejected() -> Result<(), GameError> {
    let mut game = GameBuilder::new(3)?.build()?;
    assert_eq!(game.play_turn(3), Err(GameError::InvalidPlayer(3)));
    assert!(matches!(game.player(5), Err(GameError::InvalidPlayer(5))));
    Ok(())
}

#[test]
fn cards_are_conserved_every_turn() -> Result<(), GameError> {
    for seed in 0..25 {
        let mut game = GameBuilder::new(4)?.with_seed(seed).build()?;
        game.start()?;
        assert_eq!(game.card_census(), full_census());
        let mut turns = 0;
        while !game.is_finished() && turns < 400 {
            let player = turns % 4;
            if game.players()[player].grid().is_fully_revealed() {
                break;
            }
            game.play_turn(player)?;
            assert_eq!(game.card_census(), full_census(), "seed {seed}, turn {turns}");
            turns += 1;
        }
    }
    Ok(())
}

#[test]
fn cards_are_conserved_across_cumulative_rounds() -> Result<(), GameError> {
    for seed in 0..10 {
        let mut game = GameBuilder::new(3)?
            .with_seed(seed)
            .with_scoring(ScoringMode::Cumulative)
            .build()?;
        while !game.is_finished() {
            game.play_round()?;
            assert_eq!(game.card_census(), full_census());
        }
    }
    Ok(())
}

#[test]
fn revealed_count_only_drops_by_triples() -> Result<(), GameError> {
    for seed in 0..25 {
        let mut game = GameBuilder::new(2)?.with_seed(seed).build()?;
        let summary = game.play_round()?;
        let mut last = [2usize; 2];
        for turn in &summary.turns {
            let before = last[turn.player];
            let cleared = turn.cleared.len();
            assert_eq!(cleared % 3, 0);
            assert!(turn.revealed_after + cleared >= before, "seed {seed}");
            assert!(turn.revealed_after + cleared <= before + 1, "seed {seed}");
            last[turn.player] = turn.revealed_after;
        }
    }
    Ok(())
}

#[test]
fn single_round_game_ends_after_one_round() -> Result<(), GameError> {
    for seed in 0..10 {
        let mut game = GameBuilder::new(4)?.with_seed(seed).build()?;
        let outcome = game.play()?;
        assert_eq!(outcome.rounds_played, 1);
        assert_eq!(outcome.history.len(), 1);
        assert_eq!(outcome.final_scores, outcome.history[0].scores);
        let scores: Vec<i32> = outcome.final_scores.iter().map(|(_, s)| *s).collect();
        let best = *scores.iter().min().expect("players");
        let first_best = scores.iter().position(|&s| s == best).expect("minimum");
        assert_eq!(outcome.winner, first_best);
        assert_eq!(outcome.winner_name, format!("Player {}", first_best + 1));
        for (player, (_, score)) in game.players().iter().zip(&outcome.final_scores) {
            assert_eq!(player.grid().score(), *score);
        }
        assert!(matches!(game.round_phase(), RoundPhase::Ended { .. }));
    }
    Ok(())
}

#[test]
fn cumulative_game_plays_until_limit() -> Result<(), GameError> {
    let mut game = GameBuilder::new(4)?
        .with_seed(77)
        .with_scoring(ScoringMode::Cumulative)
        .build()?;
    let outcome = game.play()?;
    let totals: Vec<i32> = outcome.final_scores.iter().map(|(_, s)| *s).collect();
    assert!(totals.iter().any(|&t| t >= 100));
    assert_eq!(outcome.history.len(), outcome.rounds_played);
    for (idx, player) in game.players().iter().enumerate() {
        assert_eq!(player.round_scores().len(), outcome.rounds_played);
        assert_eq!(player.round_scores().iter().sum::<i32>(), totals[idx]);
    }
    if outcome.rounds_played > 1 {
        let before_last: Vec<i32> = game
            .players()
            .iter()
            .map(|p| p.total_score() - p.round_scores().last().copied().unwrap_or(0))
            .collect();
        assert!(before_last.iter().all(|&t| t < 100));
    }
    Ok(())
}

#[test]
fn finished_game_rejects_more_play() -> Result<(), GameError> {
    let mut game = GameBuilder::new(2)?.with_seed(5).build()?;
    game.play()?;
    assert_eq!(game.play_round(), Err(GameError::GameOver));
    assert_eq!(game.play_turn(0), Err(GameError::GameOver));
    assert_eq!(game.start(), Err(GameError::GameOver));
    Ok(())
}

#[test]
fn slot_positions_are_row_major() {
    let all: Vec<SlotPos> = SlotPos::all().collect();
    assert_eq!(all.len(), GRID_SLOTS);
    assert_eq!(all[4], SlotPos::new(1, 0));
    assert_eq!(all[11].index(), 11);
}

#[test]
fn cumulative_game_stops_at_round_cap() -> Result<(), GameError> {
    let mut game = GameBuilder::new(2)?
        .with_seed(3)
        .with_scoring(ScoringMode::Cumulative)
        .with_score_limit(i32::MAX)
        .with_max_rounds(3)
        .build()?;
    assert_eq!(game.config().max_rounds, 3);
    assert_eq!(game.play(), Err(GameError::RoundLimitExceeded(3)));
    assert_eq!(game.rounds_played(), 3);
    assert_eq!(game.history().len(), 3);
    assert!(!game.is_finished());
    Ok(())
}

#[test]
fn round_cap_does_not_affect_single_round_games() -> Result<(), GameError> {
    let mut game = GameBuilder::new(2)?.with_seed(3).with_max_rounds(1).build()?;
    let outcome = game.play()?;
    assert_eq!(outcome.rounds_played, 1);
    Ok(())
}
