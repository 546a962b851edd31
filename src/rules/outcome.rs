//! Results of rolling and moving.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Captures, PlayerId, Seat, TokenId, TokenPosition};

/// Tokens that may legally move with the pending dice value.
pub type AvailableMoves = SmallVec<[TokenId; 4]>;

/// Why a roll handed the turn over without a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassReason {
    /// Third six in a row: the roll is voided.
    ThreeSixesLimit,
    /// Nothing on the board and the roll was not a six.
    NoTokensOutside,
    /// Tokens are out but none can use this roll.
    NoValidMoves,
}

impl std::fmt::Display for PassReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThreeSixesLimit => write!(f, "three_sixes_limit"),
            Self::NoTokensOutside => write!(f, "no_tokens_outside"),
            Self::NoValidMoves => write!(f, "no_valid_moves"),
        }
    }
}

/// Result of a roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Who rolled.
    pub player: PlayerId,
    pub seat: Seat,
    /// Face shown.
    pub value: u8,
    /// Movable tokens. Empty when the roll passed the turn.
    pub available: AvailableMoves,
    /// Set when the turn passed without a move.
    pub passed: Option<PassReason>,
    /// Seat to act next (the roller unless the turn passed).
    pub next: Seat,
}

impl RollOutcome {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.passed.is_some()
    }
}

/// Result of a successful move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub player: PlayerId,
    pub seat: Seat,
    pub token: TokenId,
    pub from: TokenPosition,
    pub to: TokenPosition,
    pub dice: u8,
    /// Opposing tokens sent home.
    pub captured: Captures,
    /// The mover rolls again.
    pub extra_turn: bool,
    /// The token reached the finish cell.
    pub token_finished: bool,
    /// Set when this move won the match.
    pub winner: Option<PlayerId>,
    /// Seat to act next.
    pub next: Seat,
    /// What `next` may move right now. Empty until they roll again, since
    /// the move consumed the dice.
    pub next_available: AvailableMoves,
}
