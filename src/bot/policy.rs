//! Move selection policies.
//!
//! Policies are trait-based so the simulator can seat different
//! strategies against each other:
//! - [`HeuristicPolicy`]: additive rule scores with an occasional random pick
//! - [`RandomPolicy`]: uniform over legal moves

use crate::core::board::{
    is_capturable, is_safe_cell, is_strategic_cell, ENTRY_ROLL, FINISH_STEP, TRACK_LENGTH,
};
use crate::core::{GameRng, GameState, Seat, TokenId, TokenPosition};
use crate::rules::landing;

/// Policy for choosing which token to move.
pub trait MovePolicy: Send + Sync {
    /// Choose among `legal` for the current player with the pending dice.
    ///
    /// Returns `None` if `legal` is empty.
    fn choose(&self, state: &GameState, legal: &[TokenId], rng: &mut GameRng) -> Option<TokenId>;
}

// === Scoring ===

const LEAVE_HOME: i32 = 100;
const REACH_FINISH: i32 = 200;
const LANE_BASE: i32 = 150;
const LANE_PER_STEP_LEFT: i32 = 10;
const PER_CAPTURE: i32 = 80;
const ESCAPE_DANGER: i32 = 60;
const OPEN_PATH_PROGRESS: i32 = 30;
const EARLY_PROGRESS: i32 = 20;
const EARLY_PROGRESS_FRACTION: f64 = 0.3;
const CROWDED_HOME: i32 = 40;
const CROWDED_HOME_THRESHOLD: usize = 2;
const STRATEGIC_LANDING: i32 = 25;
const THREAT_RANGE: std::ops::RangeInclusive<i16> = 1..=6;

/// True when an opponent on the ring is 1..=6 steps behind `step`.
fn is_threatened(state: &GameState, seat: Seat, step: u8) -> bool {
    !is_safe_cell(step)
        && state
            .opponent_steps(seat)
            .any(|opp| THREAT_RANGE.contains(&(i16::from(step) - i16::from(opp))))
}

/// Heuristic value of moving `token` for `seat` by `dice`.
///
/// Moves that are not legal score `i32::MIN`.
#[must_use]
pub fn score_move(state: &GameState, seat: Seat, token: TokenId, dice: u8) -> i32 {
    let from = state.position(seat, token);
    let Ok(to) = landing(from, dice) else {
        return i32::MIN;
    };

    let mut score = 0;

    if from.is_home() && dice == ENTRY_ROLL {
        score += LEAVE_HOME;
        if state.tokens_at_home(seat) > CROWDED_HOME_THRESHOLD {
            score += CROWDED_HOME;
        }
    }

    if to.is_finished() {
        score += REACH_FINISH;
    } else if let (true, Some(step)) = (from.is_in_lane(), from.step()) {
        let left = i32::from(FINISH_STEP - step);
        score += LANE_BASE - LANE_PER_STEP_LEFT * left;
    }

    if let TokenPosition::Track(step) = to {
        if is_capturable(step) {
            score += PER_CAPTURE * state.opponents_at(seat, step).count() as i32;
        }
        if is_strategic_cell(step) {
            score += STRATEGIC_LANDING;
        }
    }

    if let (true, Some(step)) = (from.is_open_path(), from.step()) {
        if is_threatened(state, seat, step) {
            score += ESCAPE_DANGER;
        }
        score += OPEN_PATH_PROGRESS;
        if f64::from(step) / f64::from(TRACK_LENGTH) < EARLY_PROGRESS_FRACTION {
            score += EARLY_PROGRESS;
        }
    }

    score
}

/// Rule-based policy: highest score wins, first one on ties.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicPolicy {
    /// Chance of a uniform random pick instead of the best score.
    pub random_move_probability: f64,
}

impl HeuristicPolicy {
    #[must_use]
    pub const fn new(random_move_probability: f64) -> Self {
        Self {
            random_move_probability,
        }
    }

    /// Always the best-scored move.
    #[must_use]
    pub const fn greedy() -> Self {
        Self::new(0.0)
    }

    /// The first highest-scoring token in `legal`.
    #[must_use]
    pub fn best(&self, state: &GameState, legal: &[TokenId]) -> Option<TokenId> {
        let dice = state.dice?;
        let seat = state.current;

        let mut best: Option<(TokenId, i32)> = None;
        for &token in legal {
            let score = score_move(state, seat, token, dice);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((token, score));
            }
        }
        best.map(|(token, _)| token)
    }
}

impl MovePolicy for HeuristicPolicy {
    fn choose(&self, state: &GameState, legal: &[TokenId], rng: &mut GameRng) -> Option<TokenId> {
        match legal {
            [] => None,
            [only] => Some(*only),
            _ => {
                if self.random_move_probability > 0.0 && rng.gen_bool(self.random_move_probability) {
                    return rng.choose(legal).copied();
                }
                self.best(state, legal).or_else(|| legal.first().copied())
            }
        }
    }
}

/// Uniform random policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPolicy;

impl MovePolicy for RandomPolicy {
    fn choose(&self, _state: &GameState, legal: &[TokenId], rng: &mut GameRng) -> Option<TokenId> {
        rng.choose(legal).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Player;

    fn state() -> GameState {
        GameState::new(vec![Player::human("a", "Alice"), Player::human("b", "Bob")])
    }

    const ME: Seat = Seat::new(0);
    const THEM: Seat = Seat::new(1);

    #[test]
    fn test_leaving_crowded_home() {
        let state = state();
        // 100 for leaving home, 40 for four tokens still home.
        assert_eq!(score_move(&state, ME, TokenId::new(0), 6), 140);
    }

    #[test]
    fn test_leaving_home_with_few_left() {
        let mut state = state();
        for i in 1..4 {
            state.place_token(ME, TokenId::new(i), TokenPosition::Track(30));
        }
        assert_eq!(score_move(&state, ME, TokenId::new(0), 6), 100);
    }

    #[test]
    fn test_finish_bonus() {
        let mut state = state();
        state.place_token(ME, TokenId::new(0), TokenPosition::Track(54));
        assert_eq!(score_move(&state, ME, TokenId::new(0), 3), 200);
    }

    #[test]
    fn test_lane_progress() {
        let mut state = state();
        state.place_token(ME, TokenId::new(0), TokenPosition::Track(53));
        // 150 - 10 * (57 - 53)
        assert_eq!(score_move(&state, ME, TokenId::new(0), 2), 110);
    }

    #[test]
    fn test_capture_and_threat() {
        let mut state = state();
        state.place_token(ME, TokenId::new(0), TokenPosition::Track(10));
        state.place_token(THEM, TokenId::new(0), TokenPosition::Track(14));
        state.place_token(THEM, TokenId::new(1), TokenPosition::Track(6));

        // capture 80, threatened from step 6: 60, open path 30, early 20.
        assert_eq!(score_move(&state, ME, TokenId::new(0), 4), 190);
    }

    #[test]
    fn test_no_threat_on_safe_cell() {
        let mut state = state();
        state.place_token(ME, TokenId::new(0), TokenPosition::Track(8));
        state.place_token(THEM, TokenId::new(0), TokenPosition::Track(5));

        // open path 30, early 20, lands on strategic 12: 25.
        assert_eq!(score_move(&state, ME, TokenId::new(0), 4), 75);
    }

    #[test]
    fn test_illegal_move_scores_min() {
        let state = state();
        assert_eq!(score_move(&state, ME, TokenId::new(0), 3), i32::MIN);
    }

    #[test]
    fn test_greedy_picks_capture() {
        let mut state = state();
        state.place_token(ME, TokenId::new(0), TokenPosition::Track(40));
        state.place_token(ME, TokenId::new(1), TokenPosition::Track(15));
        state.place_token(THEM, TokenId::new(0), TokenPosition::Track(18));
        state.dice = Some(3);

        let mut rng = GameRng::new(1);
        let legal = [TokenId::new(0), TokenId::new(1)];
        let choice = HeuristicPolicy::greedy().choose(&state, &legal, &mut rng);
        assert_eq!(choice, Some(TokenId::new(1)));
    }

    #[test]
    fn test_ties_go_to_first() {
        let mut state = state();
        state.place_token(ME, TokenId::new(0), TokenPosition::Track(30));
        state.place_token(ME, TokenId::new(1), TokenPosition::Track(30));
        state.dice = Some(2);

        let legal = [TokenId::new(1), TokenId::new(0)];
        assert_eq!(HeuristicPolicy::greedy().best(&state, &legal), Some(TokenId::new(1)));
    }

    #[test]
    fn test_empty_and_single() {
        let state = state();
        let mut rng = GameRng::new(1);
        let policy = HeuristicPolicy::new(1.0);

        assert_eq!(policy.choose(&state, &[], &mut rng), None);
        assert_eq!(policy.choose(&state, &[TokenId::new(2)], &mut rng), Some(TokenId::new(2)));
        assert_eq!(RandomPolicy.choose(&state, &[], &mut rng), None);
    }
}
