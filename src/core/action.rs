//! Move records.
//!
//! Every successful move appends one immutable [`MoveRecord`] to the game
//! history. Records carry enough to rebuild the board from the starting
//! layout: the moved token's from/to positions and every token it sent
//! home.
//!
//! ## Example
//!
//! ```
//! use rust_ludo::core::{CapturedToken, MoveRecord, PlayerId, Seat, TokenId, TokenPosition};
//!
//! let record = MoveRecord::new(
//!     PlayerId::new("alice"),
//!     Seat::new(0),
//!     TokenId::new(1),
//!     TokenPosition::Track(4),
//!     TokenPosition::Track(10),
//!     6,
//! )
//! .with_captured(vec![CapturedToken::new(PlayerId::new("bob"), Seat::new(1), TokenId::new(0))]);
//!
//! assert_eq!(record.captured.len(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::{PlayerId, Seat};
use super::token::{TokenId, TokenPosition};

/// A token sent back home by a capture.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapturedToken {
    /// Owner of the captured token.
    pub player: PlayerId,
    /// Owner's seat.
    pub seat: Seat,
    /// Which of the owner's tokens.
    pub token: TokenId,
}

impl CapturedToken {
    #[must_use]
    pub fn new(player: PlayerId, seat: Seat, token: TokenId) -> Self {
        Self {
            player,
            seat,
            token,
        }
    }
}

/// Tokens captured by one move. Rarely more than one, never more than
/// twelve.
pub type Captures = SmallVec<[CapturedToken; 2]>;

/// A recorded move with metadata for history tracking.
///
/// Used for:
/// - Replay (rebuilding the board from the start)
/// - Match history and debugging
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The player who moved.
    pub player: PlayerId,

    /// Their seat.
    pub seat: Seat,

    /// The token moved.
    pub token: TokenId,

    /// Position before the move.
    pub from: TokenPosition,

    /// Position after the move.
    pub to: TokenPosition,

    /// Dice value consumed by the move.
    pub dice: u8,

    /// Opposing tokens sent home.
    pub captured: Captures,

    /// When the move was applied.
    pub timestamp: DateTime<Utc>,
}

impl MoveRecord {
    /// Create a record with no captures, stamped now.
    #[must_use]
    pub fn new(
        player: PlayerId,
        seat: Seat,
        token: TokenId,
        from: TokenPosition,
        to: TokenPosition,
        dice: u8,
    ) -> Self {
        Self {
            player,
            seat,
            token,
            from,
            to,
            dice,
            captured: Captures::new(),
            timestamp: Utc::now(),
        }
    }

    /// Attach the captured tokens.
    #[must_use]
    pub fn with_captured(mut self, captured: impl IntoIterator<Item = CapturedToken>) -> Self {
        self.captured = captured.into_iter().collect();
        self
    }

    /// Whether the move sent anything home.
    #[must_use]
    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MoveRecord {
        MoveRecord::new(
            PlayerId::new("alice"),
            Seat::new(0),
            TokenId::new(2),
            TokenPosition::Home,
            TokenPosition::Track(0),
            6,
        )
    }

    #[test]
    fn test_record_without_captures() {
        let record = sample();

        assert_eq!(record.seat, Seat::new(0));
        assert_eq!(record.from, TokenPosition::Home);
        assert_eq!(record.to, TokenPosition::Track(0));
        assert!(!record.is_capture());
    }

    #[test]
    fn test_record_with_captures() {
        let record = sample().with_captured(vec![
            CapturedToken::new(PlayerId::new("bob"), Seat::new(1), TokenId::new(0)),
            CapturedToken::new(PlayerId::new("bob"), Seat::new(1), TokenId::new(3)),
        ]);

        assert!(record.is_capture());
        assert_eq!(record.captured.len(), 2);
        assert_eq!(record.captured[1].token, TokenId::new(3));
    }

    #[test]
    fn test_record_serialization() {
        let record = sample();
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: MoveRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
