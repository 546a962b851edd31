//! Elo arithmetic.
//!
//! Expected score `E = 1 / (1 + 10^((opponent - me) / 400))`. A completed
//! match scores 1 for the winner against each opponent and 0 for every
//! loser against the winner.

/// Default K-factor.
pub const K_FACTOR: f64 = 32.0;

/// Flat pool shared out to the winner of a forfeited match.
pub const FORFEIT_WIN_POOL: f64 = 20.0;

/// Flat penalty for each player who left a forfeited match.
pub const FORFEIT_PENALTY: i32 = 25;

/// A forfeit penalty never takes a rating below this.
pub const RATING_FLOOR: i32 = 800;

/// Expected score of `rating` against `opponent`.
#[must_use]
pub fn expected_score(rating: i32, opponent: i32) -> f64 {
    1.0 / (1.0 + 10_f64.powf(f64::from(opponent - rating) / 400.0))
}

/// Winner's change: the mean over opponents of `k * (1 - E)`, rounded.
///
/// # Panics
///
/// Panics if `opponents` is empty.
#[must_use]
pub fn winner_delta(k: f64, winner: i32, opponents: &[i32]) -> i32 {
    assert!(!opponents.is_empty(), "a winner needs at least one opponent");
    let total: f64 = opponents
        .iter()
        .map(|&opp| k * (1.0 - expected_score(winner, opp)))
        .sum();
    (total / opponents.len() as f64).round() as i32
}

/// A loser's change against the winner: `k * (0 - E)`, rounded.
#[must_use]
pub fn loser_delta(k: f64, loser: i32, winner: i32) -> i32 {
    (k * (0.0 - expected_score(loser, winner))).round() as i32
}

/// Winner's flat gain at a table of `player_count` after a forfeit.
#[must_use]
pub fn forfeit_win_delta(player_count: usize) -> i32 {
    let n = player_count as f64;
    (FORFEIT_WIN_POOL * (n - 1.0) / n).round() as i32
}

/// Flat forfeit penalty, clamped so the rating stops at the floor.
/// A rating already below the floor is left alone.
#[must_use]
pub fn forfeit_loss_delta(rating: i32) -> i32 {
    -FORFEIT_PENALTY.min((rating - RATING_FLOOR).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_score_symmetry() {
        assert!((expected_score(1200, 1200) - 0.5).abs() < 1e-9);
        let a = expected_score(1400, 1200);
        let b = expected_score(1200, 1400);
        assert!((a + b - 1.0).abs() < 1e-9);
        assert!(a > 0.75 && a < 0.77);
    }

    #[test]
    fn test_equal_ratings_two_players() {
        assert_eq!(winner_delta(K_FACTOR, 1000, &[1000]), 16);
        assert_eq!(loser_delta(K_FACTOR, 1000, 1000), -16);
    }

    #[test]
    fn test_winner_delta_is_mean() {
        // 16 against an equal opponent, ~24 against a 200-point stronger one.
        let single_equal = winner_delta(K_FACTOR, 1000, &[1000]);
        let single_strong = winner_delta(K_FACTOR, 1000, &[1200]);
        let mixed = winner_delta(K_FACTOR, 1000, &[1000, 1200]);

        assert_eq!(single_strong, 24);
        assert_eq!(mixed, 20);
        assert!(single_equal < mixed && mixed < single_strong);
    }

    #[test]
    fn test_forfeit_win_delta() {
        assert_eq!(forfeit_win_delta(2), 10);
        assert_eq!(forfeit_win_delta(3), 13);
        assert_eq!(forfeit_win_delta(4), 15);
    }

    #[test]
    fn test_forfeit_loss_floor() {
        assert_eq!(forfeit_loss_delta(1000), -25);
        assert_eq!(forfeit_loss_delta(810), -10);
        assert_eq!(forfeit_loss_delta(800), 0);
        assert_eq!(forfeit_loss_delta(700), 0);
    }
}
