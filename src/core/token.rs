//! Tokens and their positions.
//!
//! A token's position is a tagged variant instead of a sentinel integer:
//! `Home` (waiting for a six), `Track(step)` for steps `0..=56`, and
//! `Finished` for step 57. `Track` covers both the shared ring and the
//! private lane; use [`TokenPosition::is_open_path`] to tell them apart.

use serde::{Deserialize, Serialize};

use super::board::{self, ENTRY_ROLL, FINISH_STEP};
use super::player::Color;

/// Tokens owned by each player.
pub const TOKENS_PER_PLAYER: usize = 4;

/// Index of a token within its owner's set (0..4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(u8);

impl TokenId {
    /// Create a token id.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`. Internal callers only construct valid ids;
    /// untrusted input goes through [`TokenId::parse`].
    #[must_use]
    pub const fn new(index: u8) -> Self {
        assert!((index as usize) < TOKENS_PER_PLAYER, "token index out of range");
        Self(index)
    }

    /// Validate an index received from a client.
    #[must_use]
    pub const fn parse(index: u8) -> Option<Self> {
        if (index as usize) < TOKENS_PER_PLAYER {
            Some(Self(index))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// All token ids in order.
    pub fn all() -> impl Iterator<Item = TokenId> {
        (0..TOKENS_PER_PLAYER as u8).map(TokenId)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {}", self.0)
    }
}

/// Where a token currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "at", content = "step", rename_all = "snake_case")]
pub enum TokenPosition {
    /// In the yard, needs a six to enter.
    #[default]
    Home,
    /// On the ring or in the private lane, step `0..=56`.
    Track(u8),
    /// Reached step 57. Terminal.
    Finished,
}

impl TokenPosition {
    /// Map a step index to a position. Steps past the finish are invalid.
    #[must_use]
    pub fn from_step(step: u8) -> Option<Self> {
        match step {
            FINISH_STEP => Some(Self::Finished),
            s if s < FINISH_STEP => Some(Self::Track(s)),
            _ => None,
        }
    }

    /// Step index on the walk, `None` while at home.
    #[must_use]
    pub const fn step(self) -> Option<u8> {
        match self {
            Self::Home => None,
            Self::Track(s) => Some(s),
            Self::Finished => Some(FINISH_STEP),
        }
    }

    #[must_use]
    pub const fn is_home(self) -> bool {
        matches!(self, Self::Home)
    }

    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }

    /// On the shared 52-cell ring.
    #[must_use]
    pub const fn is_open_path(self) -> bool {
        matches!(self, Self::Track(s) if board::is_open_path(s))
    }

    /// In the private lane but not yet finished.
    #[must_use]
    pub const fn is_in_lane(self) -> bool {
        matches!(self, Self::Track(s) if !board::is_open_path(s))
    }

    /// Position after moving `dice` steps, or `None` when the move is
    /// illegal (home without a six, overshoot, already finished).
    #[must_use]
    pub fn advance(self, dice: u8) -> Option<Self> {
        match self {
            Self::Home if dice == ENTRY_ROLL => Some(Self::Track(0)),
            Self::Home | Self::Finished => None,
            Self::Track(s) => Self::from_step(s.checked_add(dice)?),
        }
    }
}

/// A single token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub color: Color,
    pub position: TokenPosition,
}

impl Token {
    /// A fresh token waiting at home.
    #[must_use]
    pub const fn new(id: TokenId, color: Color) -> Self {
        Self {
            id,
            color,
            position: TokenPosition::Home,
        }
    }

    /// The starting set for one color.
    #[must_use]
    pub fn starting_set(color: Color) -> [Token; TOKENS_PER_PLAYER] {
        [0, 1, 2, 3].map(|i| Token::new(TokenId::new(i), color))
    }
}
