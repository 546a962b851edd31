//! Request-level errors.
//!
//! Every variant rejects a single request and leaves game state untouched.
//! Broken engine invariants are not represented here; they panic.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::session::SessionId;
use crate::storage::StoreError;

/// Why a move was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum IllegalMoveReason {
    #[error("a six is needed to leave home")]
    NeedSix,
    #[error("move would pass the finish cell")]
    Overshoot,
    #[error("token has already finished")]
    TokenFinished,
    #[error("no such token")]
    UnknownToken,
}

/// Why a roster could not be seated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum RosterError {
    #[error("a table seats 2-4 players, got {0}")]
    PlayerCount(usize),
    #[error("player {0} is listed twice")]
    DuplicatePlayer(PlayerId),
    #[error("bot game has no human player")]
    NoHuman,
}

/// Errors surfaced to the requester.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("not your turn - it is {expected}'s turn")]
    NotYourTurn { expected: PlayerId },

    #[error("roll the dice before moving")]
    NoActiveRoll,

    #[error("dice already rolled this turn")]
    AlreadyRolled,

    #[error("illegal move for token {token}: {reason}")]
    IllegalMove { token: u8, reason: IllegalMoveReason },

    #[error("game is already over")]
    GameOver,

    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("player {0} is not in this session")]
    NotInSession(PlayerId),

    #[error("invalid roster: {0}")]
    RosterInvalid(#[from] RosterError),

    #[error("replay diverged at move {index}")]
    ReplayMismatch { index: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GameError {
    /// Short machine-readable code for the transport layer.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotYourTurn { .. } => "not_your_turn",
            Self::NoActiveRoll => "no_active_roll",
            Self::AlreadyRolled => "already_rolled",
            Self::IllegalMove { .. } => "illegal_move",
            Self::GameOver => "game_over",
            Self::SessionNotFound(_) => "session_not_found",
            Self::NotInSession(_) => "not_in_session",
            Self::RosterInvalid(_) => "roster_invalid",
            Self::ReplayMismatch { .. } => "replay_mismatch",
            Self::Store(_) => "store_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = GameError::NotYourTurn {
            expected: PlayerId::new("bob"),
        };
        assert_eq!(err.to_string(), "not your turn - it is bob's turn");

        let err = GameError::IllegalMove {
            token: 1,
            reason: IllegalMoveReason::Overshoot,
        };
        assert_eq!(err.to_string(), "illegal move for token 1: move would pass the finish cell");

        let err: GameError = RosterError::PlayerCount(5).into();
        assert_eq!(err.to_string(), "invalid roster: a table seats 2-4 players, got 5");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(GameError::NoActiveRoll.code(), "no_active_roll");
        let err = GameError::IllegalMove {
            token: 9,
            reason: IllegalMoveReason::UnknownToken,
        };
        assert_eq!(err.code(), "illegal_move");
        assert_eq!(GameError::from(RosterError::NoHuman).code(), "roster_invalid");
    }

    #[test]
    fn test_errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GameError>();
    }
}
