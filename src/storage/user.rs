//! Per-player records: rating, level, win/loss counts and match history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::{PlayerId, PlayerStats};
use crate::rating::level_from_rating;
use crate::session::{EndReason, SessionId};

use super::{KeyValueStore, StoreError};

/// How a match ended for one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Won,
    Lost,
}

/// One finished match, from one player's point of view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchHistoryEntry {
    pub session_id: SessionId,
    pub result: MatchResult,
    pub ranked: bool,
    /// At least one seat was a bot.
    pub vs_bots: bool,
    pub opponents: Vec<PlayerId>,
    /// Rating change applied for this match, if any.
    pub rating_delta: Option<i32>,
    pub stats: PlayerStats,
    pub reason: EndReason,
    pub ended_at: DateTime<Utc>,
}

/// Everything stored about one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub player: PlayerId,
    pub rating: i32,
    pub level: u32,
    pub wins: u32,
    pub losses: u32,
    pub history: Vec<MatchHistoryEntry>,
}

impl UserRecord {
    /// A player who has never finished a match.
    #[must_use]
    pub fn new(player: PlayerId, rating: i32) -> Self {
        Self {
            player,
            rating,
            level: level_from_rating(rating),
            wins: 0,
            losses: 0,
            history: Vec::new(),
        }
    }
}

/// User and rating store used at game end.
///
/// Unknown players read as a fresh record at the starting rating.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, player: &PlayerId) -> Result<UserRecord, StoreError>;

    async fn get_rating(&self, player: &PlayerId) -> Result<i32, StoreError> {
        Ok(self.get_user(player).await?.rating)
    }

    /// Add `delta` to the player's rating and recompute their level.
    /// Returns the new rating.
    async fn apply_rating_delta(&self, player: &PlayerId, delta: i32) -> Result<i32, StoreError>;

    /// Append a finished match and bump the win or loss counter.
    async fn append_match_history(
        &self,
        player: &PlayerId,
        entry: MatchHistoryEntry,
    ) -> Result<(), StoreError>;
}

/// [`UserStore`] over a [`KeyValueStore`], one bincode record per player.
#[derive(Debug)]
pub struct KvUserStore<S> {
    kv: S,
    starting_rating: i32,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> KvUserStore<S> {
    #[must_use]
    pub fn new(kv: S, starting_rating: i32) -> Self {
        Self {
            kv,
            starting_rating,
            write_lock: Mutex::new(()),
        }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &S {
        &self.kv
    }

    fn key(player: &PlayerId) -> String {
        format!("user:{player}")
    }

    async fn load(&self, player: &PlayerId) -> Result<UserRecord, StoreError> {
        match self.kv.get(&Self::key(player)).await? {
            Some(bytes) => Ok(bincode::deserialize(&bytes)?),
            None => Ok(UserRecord::new(player.clone(), self.starting_rating)),
        }
    }

    async fn save(&self, record: &UserRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record)?;
        self.kv.put(&Self::key(&record.player), bytes).await
    }
}

#[async_trait]
impl<S: KeyValueStore> UserStore for KvUserStore<S> {
    async fn get_user(&self, player: &PlayerId) -> Result<UserRecord, StoreError> {
        self.load(player).await
    }

    async fn apply_rating_delta(&self, player: &PlayerId, delta: i32) -> Result<i32, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.load(player).await?;
        record.rating += delta;
        record.level = level_from_rating(record.rating);
        self.save(&record).await?;
        Ok(record.rating)
    }

    async fn append_match_history(
        &self,
        player: &PlayerId,
        entry: MatchHistoryEntry,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.load(player).await?;
        match entry.result {
            MatchResult::Won => record.wins += 1,
            MatchResult::Lost => record.losses += 1,
        }
        record.history.push(entry);
        self.save(&record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;

    fn entry(result: MatchResult) -> MatchHistoryEntry {
        MatchHistoryEntry {
            session_id: SessionId::new(),
            result,
            ranked: true,
            vs_bots: false,
            opponents: vec![PlayerId::new("bob")],
            rating_delta: Some(16),
            stats: PlayerStats::default(),
            reason: EndReason::Completed,
            ended_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unknown_player_gets_starting_rating() {
        let store = KvUserStore::new(MemoryKvStore::new(), 1000);
        let user = store.get_user(&PlayerId::new("alice")).await.unwrap();

        assert_eq!(user.rating, 1000);
        assert_eq!(user.level, 1);
        assert!(user.history.is_empty());
        assert!(store.backend().is_empty().await);
    }

    #[tokio::test]
    async fn test_rating_delta_updates_level() {
        let store = KvUserStore::new(MemoryKvStore::new(), 1000);
        let alice = PlayerId::new("alice");

        assert_eq!(store.apply_rating_delta(&alice, 150).await.unwrap(), 1150);
        let user = store.get_user(&alice).await.unwrap();
        assert_eq!(user.level, 2);
        assert_eq!(store.get_rating(&alice).await.unwrap(), 1150);
    }

    #[tokio::test]
    async fn test_history_counts_results() {
        let store = KvUserStore::new(MemoryKvStore::new(), 1000);
        let alice = PlayerId::new("alice");

        store.append_match_history(&alice, entry(MatchResult::Won)).await.unwrap();
        store.append_match_history(&alice, entry(MatchResult::Lost)).await.unwrap();
        store.append_match_history(&alice, entry(MatchResult::Won)).await.unwrap();

        let user = store.get_user(&alice).await.unwrap();
        assert_eq!((user.wins, user.losses), (2, 1));
        assert_eq!(user.history.len(), 3);
        assert_eq!(user.history[0].rating_delta, Some(16));
    }
}
