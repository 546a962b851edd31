//! Who is online and where.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::PlayerId;
use crate::session::SessionId;

/// A player's presence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "session", rename_all = "snake_case")]
pub enum Presence {
    #[default]
    Offline,
    Online,
    InGame(SessionId),
}

/// Presence of connected players. Absent players are offline.
#[derive(Debug, Default)]
pub struct OnlineRegistry {
    players: Mutex<FxHashMap<PlayerId, Presence>>,
}

impl OnlineRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_online(&self, player: PlayerId) {
        self.players.lock().await.insert(player, Presence::Online);
    }

    pub async fn set_in_game(&self, player: PlayerId, session: SessionId) {
        self.players.lock().await.insert(player, Presence::InGame(session));
    }

    pub async fn set_offline(&self, player: &PlayerId) {
        self.players.lock().await.remove(player);
    }

    /// Return everyone in `session` to plain online.
    pub async fn end_session(&self, session: SessionId) {
        for presence in self.players.lock().await.values_mut() {
            if *presence == Presence::InGame(session) {
                *presence = Presence::Online;
            }
        }
    }

    pub async fn presence(&self, player: &PlayerId) -> Presence {
        self.players
            .lock()
            .await
            .get(player)
            .copied()
            .unwrap_or_default()
    }

    /// Players online, in a game or not.
    pub async fn online_count(&self) -> usize {
        self.players.lock().await.len()
    }
}
