//! Matchmaking queue.
//!
//! Waiting players are grouped by what they asked for (table size and
//! ranked flag). A group fills in arrival order; the first full group
//! becomes a [`SessionSpec`] with players in queue order, which is also
//! their seat order.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::core::{Player, PlayerId, MAX_PLAYERS, MIN_PLAYERS};
use crate::session::SessionSpec;

use super::LobbyError;

/// What kind of table a player wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchPreferences {
    pub table_size: usize,
    pub ranked: bool,
}

impl MatchPreferences {
    #[must_use]
    pub const fn new(table_size: usize, ranked: bool) -> Self {
        Self { table_size, ranked }
    }
}

impl Default for MatchPreferences {
    fn default() -> Self {
        Self::new(4, true)
    }
}

/// A player waiting in the queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedPlayer {
    pub player: Player,
    pub preferences: MatchPreferences,
    /// When the player joined the queue.
    pub queued_at: DateTime<Utc>,
}

/// Result of joining the queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueOutcome {
    /// Still waiting for `needed` more players.
    Waiting { needed: usize },
    /// The group filled up.
    Matched(SessionSpec),
}

/// Players waiting for a table.
#[derive(Debug, Default)]
pub struct MatchmakingQueue {
    queues: Mutex<FxHashMap<MatchPreferences, VecDeque<QueuedPlayer>>>,
}

impl MatchmakingQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a human to the queue for `preferences`.
    pub async fn join(
        &self,
        player: Player,
        preferences: MatchPreferences,
    ) -> Result<QueueOutcome, LobbyError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&preferences.table_size) {
            return Err(LobbyError::TableSize(preferences.table_size));
        }
        if player.is_bot() {
            return Err(LobbyError::BotQueued(player.id().clone()));
        }

        let mut queues = self.queues.lock().await;
        if queues.values().flatten().any(|q| q.player.id() == player.id()) {
            return Err(LobbyError::AlreadyQueued(player.id().clone()));
        }

        let queue = queues.entry(preferences).or_default();
        debug!(player = %player.id(), table_size = preferences.table_size, ranked = preferences.ranked, "queued");
        queue.push_back(QueuedPlayer {
            player,
            preferences,
            queued_at: Utc::now(),
        });

        if queue.len() < preferences.table_size {
            return Ok(QueueOutcome::Waiting {
                needed: preferences.table_size - queue.len(),
            });
        }

        let players: Vec<Player> = queue
            .drain(..preferences.table_size)
            .map(|queued| queued.player)
            .collect();
        info!(
            table_size = preferences.table_size,
            ranked = preferences.ranked,
            players = ?players.iter().map(|p| p.id().as_str()).collect::<Vec<_>>(),
            "match formed"
        );

        Ok(QueueOutcome::Matched(SessionSpec {
            players,
            ranked: preferences.ranked,
        }))
    }

    /// Remove a player from whichever queue they are in.
    pub async fn leave(&self, player: &PlayerId) -> bool {
        let mut queues = self.queues.lock().await;
        for queue in queues.values_mut() {
            if let Some(index) = queue.iter().position(|q| q.player.id() == player) {
                queue.remove(index);
                debug!(player = %player, "left queue");
                return true;
            }
        }
        false
    }

    /// Players waiting for `preferences`.
    pub async fn waiting(&self, preferences: MatchPreferences) -> usize {
        self.queues
            .lock()
            .await
            .get(&preferences)
            .map_or(0, VecDeque::len)
    }

    /// Players waiting across all queues.
    pub async fn len(&self) -> usize {
        self.queues.lock().await.values().map(VecDeque::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Difficulty;

    #[tokio::test]
    async fn test_group_fills_in_order() {
        let queue = MatchmakingQueue::new();
        let prefs = MatchPreferences::new(3, true);

        let first = queue.join(Player::human("a", "Ann"), prefs).await.unwrap();
        assert_eq!(first, QueueOutcome::Waiting { needed: 2 });
        queue.join(Player::human("b", "Ben"), prefs).await.unwrap();

        let QueueOutcome::Matched(spec) = queue.join(Player::human("c", "Cy"), prefs).await.unwrap() else {
            panic!("expected a match");
        };
        let ids: Vec<_> = spec.players.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(spec.ranked);
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn test_preferences_keep_groups_apart() {
        let queue = MatchmakingQueue::new();
        queue.join(Player::human("a", "Ann"), MatchPreferences::new(2, true)).await.unwrap();
        let outcome = queue
            .join(Player::human("b", "Ben"), MatchPreferences::new(2, false))
            .await
            .unwrap();

        assert_eq!(outcome, QueueOutcome::Waiting { needed: 1 });
        assert_eq!(queue.len().await, 2);
        assert_eq!(queue.waiting(MatchPreferences::new(2, true)).await, 1);
    }

    #[tokio::test]
    async fn test_leave_and_rejoin() {
        let queue = MatchmakingQueue::new();
        let prefs = MatchPreferences::new(2, false);
        queue.join(Player::human("a", "Ann"), prefs).await.unwrap();

        let again = queue.join(Player::human("a", "Ann"), prefs).await;
        assert!(matches!(again, Err(LobbyError::AlreadyQueued(_))));

        assert!(queue.leave(&PlayerId::new("a")).await);
        assert!(!queue.leave(&PlayerId::new("a")).await);
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn test_rejects_bad_requests() {
        let queue = MatchmakingQueue::new();

        let err = queue.join(Player::human("a", "Ann"), MatchPreferences::new(5, false)).await;
        assert!(matches!(err, Err(LobbyError::TableSize(5))));

        let err = queue
            .join(Player::bot("b", "Robo", Difficulty::Easy), MatchPreferences::default())
            .await;
        assert!(matches!(err, Err(LobbyError::BotQueued(_))));
    }
}
