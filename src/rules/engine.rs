//! The Ludo rules engine.
//!
//! `LudoRules` is stateless: every operation takes the `GameState` it acts
//! on. It decides:
//! - Whether a roll is allowed and what it leads to
//! - Which tokens may move and where they land
//! - Captures, finishing, winning and who plays next
//!
//! All checks run before any mutation, so a rejected request leaves the
//! state exactly as it was.

use crate::core::board::{self, ENTRY_ROLL};
use crate::core::{
    CapturedToken, Captures, GameRng, GameState, MoveRecord, PlayerId, Seat, TokenId, TokenPosition,
};
use crate::error::{GameError, IllegalMoveReason};

use super::outcome::{AvailableMoves, MoveOutcome, PassReason, RollOutcome};

/// Sixes in a row that void the last one.
pub const MAX_CONSECUTIVE_SIXES: u8 = 3;

/// Where a token would land with `dice`.
pub fn landing(from: TokenPosition, dice: u8) -> Result<TokenPosition, IllegalMoveReason> {
    match from {
        TokenPosition::Finished => Err(IllegalMoveReason::TokenFinished),
        TokenPosition::Home if dice != ENTRY_ROLL => Err(IllegalMoveReason::NeedSix),
        _ => from.advance(dice).ok_or(IllegalMoveReason::Overshoot),
    }
}

/// Validate a token index received from a client.
pub fn parse_token(index: u8) -> Result<TokenId, GameError> {
    TokenId::parse(index).ok_or(GameError::IllegalMove {
        token: index,
        reason: IllegalMoveReason::UnknownToken,
    })
}

/// A move that passed every check and has not been applied yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannedMove {
    pub seat: Seat,
    pub token: TokenId,
    pub from: TokenPosition,
    pub to: TokenPosition,
    pub dice: u8,
}

/// Ludo rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct LudoRules;

impl LudoRules {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolve `player` to a seat and require that it is their turn.
    fn ensure_turn(&self, state: &GameState, player: &PlayerId) -> Result<Seat, GameError> {
        if !state.is_playing() {
            return Err(GameError::GameOver);
        }
        let seat = state
            .seat_of(player)
            .ok_or_else(|| GameError::NotInSession(player.clone()))?;
        if seat != state.current {
            return Err(GameError::NotYourTurn {
                expected: state.current_player().id().clone(),
            });
        }
        Ok(seat)
    }

    // === Rolling ===

    /// Roll the die for `player` and apply the result.
    pub fn roll_dice(
        &self,
        state: &mut GameState,
        player: &PlayerId,
        rng: &mut GameRng,
    ) -> Result<RollOutcome, GameError> {
        // Validate first so a rejected request does not consume randomness.
        self.ensure_turn(state, player)?;
        if state.dice.is_some() {
            return Err(GameError::AlreadyRolled);
        }
        self.apply_roll(state, player, rng.roll_die())
    }

    /// Apply a known dice value for `player`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not in `1..=6`.
    pub fn apply_roll(
        &self,
        state: &mut GameState,
        player: &PlayerId,
        value: u8,
    ) -> Result<RollOutcome, GameError> {
        assert!((1..=6).contains(&value), "dice value {value} outside 1..=6");

        let seat = self.ensure_turn(state, player)?;
        if state.dice.is_some() {
            return Err(GameError::AlreadyRolled);
        }

        state.last_roll = Some(value);
        state.stats[seat].turns_played += 1;

        let pass = |state: &mut GameState, reason| {
            state.advance_turn();
            RollOutcome {
                player: player.clone(),
                seat,
                value,
                available: AvailableMoves::new(),
                passed: Some(reason),
                next: state.current,
            }
        };

        if value == ENTRY_ROLL {
            if state.consecutive_sixes + 1 >= MAX_CONSECUTIVE_SIXES {
                return Ok(pass(state, PassReason::ThreeSixesLimit));
            }
        } else {
            state.consecutive_sixes = 0;
        }

        state.dice = Some(value);
        let available = self.available_for_seat(state, seat);

        if available.is_empty() {
            let reason = if state.tokens_in_play(seat) == 0 && value != ENTRY_ROLL {
                PassReason::NoTokensOutside
            } else {
                PassReason::NoValidMoves
            };
            return Ok(pass(state, reason));
        }

        Ok(RollOutcome {
            player: player.clone(),
            seat,
            value,
            available,
            passed: None,
            next: seat,
        })
    }

    // === Legality ===

    /// Check a move without applying it.
    pub fn plan_move(
        &self,
        state: &GameState,
        player: &PlayerId,
        token: TokenId,
    ) -> Result<PlannedMove, GameError> {
        let seat = self.ensure_turn(state, player)?;
        let dice = state.dice.ok_or(GameError::NoActiveRoll)?;
        let from = state.position(seat, token);
        let to = landing(from, dice).map_err(|reason| GameError::IllegalMove {
            token: token.index() as u8,
            reason,
        })?;

        Ok(PlannedMove {
            seat,
            token,
            from,
            to,
            dice,
        })
    }

    #[must_use]
    pub fn can_move_token(&self, state: &GameState, player: &PlayerId, token: TokenId) -> bool {
        self.plan_move(state, player, token).is_ok()
    }

    /// Tokens `player` may move now. Empty unless it is their turn and a
    /// roll is pending.
    #[must_use]
    pub fn available_moves(&self, state: &GameState, player: &PlayerId) -> AvailableMoves {
        match self.ensure_turn(state, player) {
            Ok(seat) => self.available_for_seat(state, seat),
            Err(_) => AvailableMoves::new(),
        }
    }

    fn available_for_seat(&self, state: &GameState, seat: Seat) -> AvailableMoves {
        let Some(dice) = state.dice else {
            return AvailableMoves::new();
        };
        state
            .tokens(seat)
            .iter()
            .filter(|t| landing(t.position, dice).is_ok())
            .map(|t| t.id)
            .collect()
    }

    // === Moving ===

    /// Move a token with the pending dice value.
    pub fn move_token(
        &self,
        state: &mut GameState,
        player: &PlayerId,
        token: TokenId,
    ) -> Result<MoveOutcome, GameError> {
        let planned = self.plan_move(state, player, token)?;
        let PlannedMove { seat, from, to, dice, .. } = planned;

        state.place_token(seat, token, to);

        let mut captured = Captures::new();
        if let TokenPosition::Track(step) = to {
            if board::is_capturable(step) {
                let victims: Vec<_> = state.opponents_at(seat, step).collect();
                for (victim_seat, victim_token) in victims {
                    state.place_token(victim_seat, victim_token, TokenPosition::Home);
                    state.stats[victim_seat].tokens_captured += 1;
                    captured.push(CapturedToken::new(
                        state.player(victim_seat).id().clone(),
                        victim_seat,
                        victim_token,
                    ));
                }
                state.stats[seat].captures += captured.len() as u32;
            }
        }

        let token_finished = to.is_finished();
        if token_finished {
            state.stats[seat].tokens_finished += 1;
        }

        state.record_move(
            MoveRecord::new(player.clone(), seat, token, from, to, dice).with_captured(captured.iter().cloned()),
        );
        state.dice = None;

        if state.all_finished(seat) {
            state.declare_winner(seat);
            return Ok(MoveOutcome {
                player: player.clone(),
                seat,
                token,
                from,
                to,
                dice,
                captured,
                extra_turn: false,
                token_finished,
                winner: Some(player.clone()),
                next: seat,
                next_available: AvailableMoves::new(),
            });
        }

        let rolled_six = dice == ENTRY_ROLL;
        if rolled_six {
            state.consecutive_sixes += 1;
        }
        let extra_turn = rolled_six || !captured.is_empty();
        if !extra_turn {
            state.advance_turn();
        }

        Ok(MoveOutcome {
            player: player.clone(),
            seat,
            token,
            from,
            to,
            dice,
            captured,
            extra_turn,
            token_finished,
            winner: None,
            next: state.current,
            next_available: self.available_for_seat(state, state.current),
        })
    }

    /// The winning seat, once there is one.
    #[must_use]
    pub fn is_terminal(&self, state: &GameState) -> Option<Seat> {
        state.winner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Player;

    fn game() -> (LudoRules, GameState, PlayerId, PlayerId) {
        let state = GameState::new(vec![Player::human("a", "Alice"), Player::human("b", "Bob")]);
        (LudoRules::new(), state, PlayerId::new("a"), PlayerId::new("b"))
    }

    #[test]
    fn test_landing() {
        assert_eq!(landing(TokenPosition::Home, 6), Ok(TokenPosition::Track(0)));
        assert_eq!(landing(TokenPosition::Home, 5), Err(IllegalMoveReason::NeedSix));
        assert_eq!(landing(TokenPosition::Finished, 1), Err(IllegalMoveReason::TokenFinished));
        assert_eq!(landing(TokenPosition::Track(55), 3), Err(IllegalMoveReason::Overshoot));
        assert_eq!(landing(TokenPosition::Track(54), 3), Ok(TokenPosition::Finished));
    }

    #[test]
    fn test_parse_token() {
        assert_eq!(parse_token(2).unwrap(), TokenId::new(2));
        assert!(matches!(
            parse_token(4),
            Err(GameError::IllegalMove { token: 4, reason: IllegalMoveReason::UnknownToken })
        ));
    }

    #[test]
    fn test_roll_out_of_turn_rejected() {
        let (rules, mut state, _, bob) = game();

        let err = rules.apply_roll(&mut state, &bob, 3).unwrap_err();
        assert!(matches!(err, GameError::NotYourTurn { .. }));
        assert_eq!(state.last_roll, None);
    }

    #[test]
    fn test_unknown_player_rejected() {
        let (rules, mut state, _, _) = game();
        let err = rules.apply_roll(&mut state, &PlayerId::new("eve"), 3).unwrap_err();
        assert!(matches!(err, GameError::NotInSession(_)));
    }

    #[test]
    fn test_non_six_with_all_home_passes() {
        let (rules, mut state, alice, _) = game();

        let outcome = rules.apply_roll(&mut state, &alice, 4).unwrap();

        assert_eq!(outcome.passed, Some(PassReason::NoTokensOutside));
        assert_eq!(outcome.next, Seat::new(1));
        assert_eq!(state.current, Seat::new(1));
        assert_eq!(state.dice, None);
        assert_eq!(state.last_roll, Some(4));
    }

    #[test]
    fn test_six_with_all_home_lists_every_token() {
        let (rules, mut state, alice, _) = game();

        let outcome = rules.apply_roll(&mut state, &alice, 6).unwrap();

        assert!(!outcome.is_pass());
        assert_eq!(outcome.available.len(), 4);
        assert_eq!(state.dice, Some(6));
    }

    #[test]
    fn test_double_roll_rejected() {
        let (rules, mut state, alice, _) = game();
        rules.apply_roll(&mut state, &alice, 6).unwrap();

        assert!(matches!(rules.apply_roll(&mut state, &alice, 2), Err(GameError::AlreadyRolled)));
    }

    #[test]
    fn test_move_without_roll_rejected() {
        let (rules, mut state, alice, _) = game();
        let err = rules.move_token(&mut state, &alice, TokenId::new(0)).unwrap_err();
        assert!(matches!(err, GameError::NoActiveRoll));
    }

    #[test]
    fn test_no_valid_moves_when_everything_overshoots() {
        let (rules, mut state, alice, _) = game();
        let seat = Seat::new(0);
        state.place_token(seat, TokenId::new(0), TokenPosition::Track(56));
        for i in 1..4 {
            state.place_token(seat, TokenId::new(i), TokenPosition::Finished);
        }

        let outcome = rules.apply_roll(&mut state, &alice, 3).unwrap();
        assert_eq!(outcome.passed, Some(PassReason::NoValidMoves));
    }

    #[test]
    fn test_rejected_move_leaves_state_untouched() {
        let (rules, mut state, alice, _) = game();
        state.place_token(Seat::new(0), TokenId::new(1), TokenPosition::Track(20));
        rules.apply_roll(&mut state, &alice, 3).unwrap();

        let err = rules.move_token(&mut state, &alice, TokenId::new(0)).unwrap_err();
        assert!(matches!(
            err,
            GameError::IllegalMove { reason: IllegalMoveReason::NeedSix, .. }
        ));
        assert_eq!(state.dice, Some(3));
        assert!(state.history.is_empty());
        assert!(rules.can_move_token(&state, &alice, TokenId::new(1)));
    }

    #[test]
    #[should_panic(expected = "outside 1..=6")]
    fn test_invalid_dice_panics() {
        let (rules, mut state, alice, _) = game();
        let _ = rules.apply_roll(&mut state, &alice, 7);
    }

    #[test]
    fn test_finished_game_rejects_everything() {
        let (rules, mut state, alice, _) = game();
        state.declare_winner(Seat::new(1));

        assert!(matches!(rules.apply_roll(&mut state, &alice, 6), Err(GameError::GameOver)));
        assert!(rules.available_moves(&state, &alice).is_empty());
        assert_eq!(rules.is_terminal(&state), Some(Seat::new(1)));
    }
}
