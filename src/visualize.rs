use std::fmt::Write;

use crate::action::{Decision, TurnKind};
use crate::game::Game;
use crate::grid::{GRID_COLS, GRID_ROWS, PlayerGrid, SlotPos};
use crate::state::{GameStatus, RoundPhase, TurnRecord};

/// Draws a grid as three rows of cells: the value when face up, `??` when face down,
/// `--` once the column has been cleared.
pub fn render_grid(grid: &PlayerGrid) -> String {
    let mut out = String::new();
    for row in 0..GRID_ROWS {
        let cells = (0..GRID_COLS)
            .map(|col| {
                let slot = grid.slot(SlotPos::new(row, col));
                match (slot.card, slot.revealed) {
                    (Some(value), true) => format!("{value:>3}"),
                    (Some(_), false) => String::from(" ??"),
                    (None, _) => String::from(" --"),
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "  [{cells} ]");
    }
    out
}

pub fn render_game(game: &Game) -> String {
    let mut out = String::new();
    let status = match game.status() {
        GameStatus::Setup => String::from("Setup"),
        GameStatus::PlayingRounds => String::from("Playing"),
        GameStatus::GameOver { winner } => {
            let name = game.players().get(winner).map(|p| p.name()).unwrap_or("?");
            format!("Game over (winner: {name})")
        }
    };
    let _ = writeln!(out, "Game status: {status}");
    let phase = match game.round_phase() {
        RoundPhase::InProgress => String::from("in progress"),
        RoundPhase::FinalTurnSweep { trigger } => format!("final sweep (trigger {trigger})"),
        RoundPhase::Ended { trigger } => format!("ended (trigger {trigger})"),
    };
    let _ = writeln!(out, "Round {}: {phase}", game.rounds_played());
    let top = game
        .discard_pile()
        .top()
        .map(|card| card.to_string())
        .unwrap_or_else(|| String::from("--"));
    let _ = writeln!(
        out,
        "Deck: {}  |  Discard: {} (top: {top})",
        game.deck().len(),
        game.discard_pile().len()
    );
    for player in game.players() {
        let grid = player.grid();
        let _ = writeln!(
            out,
            "{} - revealed {}/12, showing {}, total {}",
            player.name(),
            grid.revealed_count(),
            grid.revealed_score(),
            player.total_score()
        );
        out.push_str(&render_grid(grid));
    }
    out
}

/// One-line account of a turn, e.g. `Player 2 drew 1, kept it at (0, 3) replacing 11`.
pub fn describe_turn(turn: &TurnRecord, names: &[&str]) -> String {
    let name = names
        .get(turn.player)
        .map(|n| n.to_string())
        .unwrap_or_else(|| format!("Player {}", turn.player + 1));
    let mut text = String::new();
    if turn.kind == TurnKind::FinalSweep {
        text.push_str("[final] ");
    }
    if turn.reshuffled {
        text.push_str("(reshuffled) ");
    }
    let _ = write!(text, "{name} drew {}", turn.drawn);
    let pos = turn.decision.slot();
    match turn.decision {
        Decision::Keep(_) => {
            let _ = write!(text, ", kept it at ({}, {})", pos.row, pos.col);
            if let Some(old) = turn.displaced {
                let _ = write!(text, " replacing {old}");
            }
        }
        Decision::Discard(_) => {
            let _ = write!(text, ", discarded it and flipped ({}, {})", pos.row, pos.col);
        }
    }
    if !turn.cleared.is_empty() {
        let values = turn
            .cleared
            .chunks(GRID_ROWS)
            .map(|column| column[0].to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(text, "; cleared column(s) of {values}");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameBuilder;

    #[test]
    fn render_grid_marks_hidden_and_cleared() {
        let mut grid = PlayerGrid::from_cards([[5, 1, 1, 1], [5, 2, 2, 2], [5, 3, 3, 3]]);
        for row in 0..GRID_ROWS {
            grid.reveal(SlotPos::new(row, 0));
        }
        grid.reveal(SlotPos::new(0, 1));
        let before = render_grid(&grid);
        assert!(before.contains("  5   1  ??  ??"));
        grid.check_and_clear_triples();
        let after = render_grid(&grid);
        assert!(after.contains(" --   1  ??  ??"));
    }

    #[test]
    fn render_and_describe_include_expected_phrases() {
        let mut game = GameBuilder::new(2).expect("builder").build().expect("game");
        let turn = game.play_turn(0).expect("turn");
        let text = render_game(&game);
        assert!(text.contains("Player 1 - revealed"));
        assert!(text.contains("Deck: "));
        let desc = describe_turn(&turn, &["Alice", "Bob"]);
        assert!(desc.starts_with("Alice drew"));
    }

    #[test]
    fn describe_lists_each_cleared_column() {
        let turn = TurnRecord {
            player: 1,
            kind: TurnKind::FinalSweep,
            drawn: 4,
            decision: Decision::Keep(SlotPos::new(2, 1)),
            displaced: Some(11),
            cleared: vec![4, 4, 4, -1, -1, -1],
            revealed_after: 6,
            reshuffled: false,
        };
        let desc = describe_turn(&turn, &["Alice", "Bob"]);
        assert_eq!(
            desc,
            "[final] Bob drew 4, kept it at (2, 1) replacing 11; cleared column(s) of 4, -1"
        );
    }
}
