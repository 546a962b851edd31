//! Authoritative match sessions.
//!
//! ## Overview
//!
//! A [`SessionController`] seats a roster, creates the `GameState` and
//! spawns one actor task per match. All requests for a match go through
//! that actor's mailbox; every state change is broadcast as a
//! [`SessionEvent`]. Bot seats are driven by the actor itself with
//! delayed self-messages.
//!
//! When a match ends the controller's collaborators are called once:
//! ratings through [`RatingService`](crate::rating::RatingService) for
//! ranked human-only matches, then match history for every human through
//! the [`UserStore`](crate::storage::UserStore). The session is then
//! removed from the [`SessionRegistry`].

mod actor;
pub mod controller;
pub mod events;
pub mod registry;
pub mod roster;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::Player;

pub use controller::{SessionController, StartedSession};
pub use events::{EndReason, SeatSummary, SessionEvent, SessionSummary};
pub use registry::{SessionHandle, SessionRegistry};
pub use roster::seat_roster;

/// Unique identifier for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a new random session id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the lobby hands over to start a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSpec {
    /// Players in join order.
    pub players: Vec<Player>,
    /// Ratings move at the end of ranked human-only matches.
    pub ranked: bool,
}

impl SessionSpec {
    /// An unranked match.
    #[must_use]
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players,
            ranked: false,
        }
    }

    #[must_use]
    pub fn ranked(mut self) -> Self {
        self.ranked = true;
        self
    }
}
