//! Scoring utilities for Skyjo games.
//!
//! A grid scores the sum of every card left on it, hidden or not; lower is better.
//! The winner is the player with the lowest score, the earliest seat winning ties.

use crate::action::PlayerId;

/// Index of the lowest score; the first one wins ties. `None` for an empty slice.
pub fn winner_index(scores: &[i32]) -> Option<PlayerId> {
    let mut best: Option<(PlayerId, i32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if best.is_none_or(|(_, low)| score < low) {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
}

/// True once any score reaches `limit`.
pub fn limit_reached(scores: &[i32], limit: i32) -> bool {
    scores.iter().any(|&score| score >= limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_is_lowest_score() {
        assert_eq!(winner_index(&[40, 12, 33]), Some(1));
    }

    #[test]
    fn test_winner_ties_go_to_first_seat() {
        assert_eq!(winner_index(&[20, 5, 5, 9]), Some(1));
    }

    #[test]
    fn test_winner_with_negative_scores() {
        assert_eq!(winner_index(&[-3, -8, 0]), Some(1));
    }

    #[test]
    fn test_no_winner_without_players() {
        assert_eq!(winner_index(&[]), None);
    }

    #[test]
    fn test_limit_is_inclusive() {
        assert!(limit_reached(&[10, 100], 100));
        assert!(!limit_reached(&[10, 99], 100));
    }
}
