//! Events broadcast to everyone watching a session.
//!
//! Events are serde types tagged by `type` so a transport can forward
//! them as JSON unchanged.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, PlayerId, PlayerStats, Seat};
use crate::rating::RatingChange;
use crate::rules::{MoveOutcome, RollOutcome};

use super::SessionId;

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// A player finished all four tokens.
    Completed,
    /// Everyone else disconnected.
    OpponentsLeft,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::OpponentsLeft => write!(f, "opponents_left"),
        }
    }
}

/// Final statistics for one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSummary {
    pub player: PlayerId,
    pub seat: Seat,
    pub stats: PlayerStats,
}

/// Sent once when a session ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub winner: PlayerId,
    pub reason: EndReason,
    pub turns: u32,
    pub seats: Vec<SeatSummary>,
    /// Present only when ratings were updated.
    pub rating_changes: Option<Vec<RatingChange>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Full state, sent at start and on request.
    StateSnapshot {
        session_id: SessionId,
        state: Box<GameState>,
        connected: Vec<PlayerId>,
    },
    RollOutcome(RollOutcome),
    MoveOutcome(MoveOutcome),
    /// A disconnected player's turn was handed on.
    TurnSkipped { player: PlayerId, next: PlayerId },
    PlayerDisconnected { player: PlayerId },
    PlayerReconnected { player: PlayerId },
    SessionEnded(SessionSummary),
}

impl SessionEvent {
    /// Stable event name for logs and transports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StateSnapshot { .. } => "state_snapshot",
            Self::RollOutcome(_) => "roll_outcome",
            Self::MoveOutcome(_) => "move_outcome",
            Self::TurnSkipped { .. } => "turn_skipped",
            Self::PlayerDisconnected { .. } => "player_disconnected",
            Self::PlayerReconnected { .. } => "player_reconnected",
            Self::SessionEnded(_) => "session_ended",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Seat, TokenId};
    use crate::rules::PassReason;
    use smallvec::smallvec;

    #[test]
    fn test_event_json_is_tagged() {
        let event = SessionEvent::RollOutcome(RollOutcome {
            player: PlayerId::new("a"),
            seat: Seat::new(0),
            value: 6,
            available: smallvec![TokenId::new(0)],
            passed: None,
            next: Seat::new(0),
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "roll_outcome");
        assert_eq!(json["value"], 6);
        assert_eq!(event.kind(), "roll_outcome");
    }

    #[test]
    fn test_pass_reason_json() {
        let json = serde_json::to_value(PassReason::ThreeSixesLimit).unwrap();
        assert_eq!(json, "three_sixes_limit");

        let event = SessionEvent::TurnSkipped {
            player: PlayerId::new("a"),
            next: PlayerId::new("b"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "turn_skipped");
        assert_eq!(json["next"], "b");
    }
}
