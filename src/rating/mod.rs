//! Ratings and levels.
//!
//! Ratings move only for ranked matches between humans. A completed match
//! uses Elo; a match won because everyone else left uses flat amounts (see
//! [`elo`]). Levels are derived from rating in 100-point bands.

pub mod elo;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::PlayerId;
use crate::session::EndReason;
use crate::storage::{StoreError, UserStore};

/// Level for a rating: 1 below 1100, then one level per 100 points.
///
/// ```
/// use rust_ludo::rating::level_from_rating;
///
/// assert_eq!(level_from_rating(1000), 1);
/// assert_eq!(level_from_rating(1100), 2);
/// assert_eq!(level_from_rating(1999), 10);
/// assert_eq!(level_from_rating(2350), 13);
/// ```
#[must_use]
pub fn level_from_rating(rating: i32) -> u32 {
    if rating < 1100 {
        1
    } else if rating < 2000 {
        ((rating - 1100) / 100 + 2) as u32
    } else {
        (10 + (rating - 2000) / 100) as u32
    }
}

/// One player's rating movement after a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player: PlayerId,
    pub before: i32,
    pub after: i32,
    pub delta: i32,
}

/// Computes and applies rating changes through a [`UserStore`].
#[derive(Clone, Copy, Debug)]
pub struct RatingService {
    k_factor: f64,
}

impl Default for RatingService {
    fn default() -> Self {
        Self::new(elo::K_FACTOR)
    }
}

impl RatingService {
    #[must_use]
    pub const fn new(k_factor: f64) -> Self {
        Self { k_factor }
    }

    #[must_use]
    pub const fn k_factor(&self) -> f64 {
        self.k_factor
    }

    /// Deltas for each player from pre-match ratings. The winner comes first.
    #[must_use]
    pub fn deltas(
        &self,
        winner: i32,
        losers: &[i32],
        reason: EndReason,
    ) -> (i32, Vec<i32>) {
        match reason {
            EndReason::Completed => {
                let winner_delta = elo::winner_delta(self.k_factor, winner, losers);
                let loser_deltas = losers
                    .iter()
                    .map(|&loser| elo::loser_delta(self.k_factor, loser, winner))
                    .collect();
                (winner_delta, loser_deltas)
            }
            EndReason::OpponentsLeft => {
                let winner_delta = elo::forfeit_win_delta(losers.len() + 1);
                let loser_deltas = losers.iter().map(|&r| elo::forfeit_loss_delta(r)).collect();
                (winner_delta, loser_deltas)
            }
        }
    }

    /// Read current ratings, compute deltas and write them back.
    pub async fn settle<U: UserStore + ?Sized>(
        &self,
        store: &U,
        winner: &PlayerId,
        losers: &[PlayerId],
        reason: EndReason,
    ) -> Result<Vec<RatingChange>, StoreError> {
        let winner_rating = store.get_rating(winner).await?;
        let mut loser_ratings = Vec::with_capacity(losers.len());
        for loser in losers {
            loser_ratings.push(store.get_rating(loser).await?);
        }

        let (winner_delta, loser_deltas) = self.deltas(winner_rating, &loser_ratings, reason);

        let mut changes = Vec::with_capacity(losers.len() + 1);
        let participants = std::iter::once((winner, winner_rating, winner_delta))
            .chain(losers.iter().zip(loser_ratings).zip(loser_deltas).map(|((p, r), d)| (p, r, d)));

        for (player, before, delta) in participants {
            let after = match store.apply_rating_delta(player, delta).await {
                Ok(after) => after,
                Err(e) => {
                    Self::revert(store, &changes).await;
                    return Err(e);
                }
            };
            info!(player = %player, before, after, delta, ?reason, "rating updated");
            changes.push(RatingChange {
                player: player.clone(),
                before,
                after,
                delta,
            });
        }

        Ok(changes)
    }

    /// Undo changes already written when a later write fails, so a match
    /// settles for everyone or for no one.
    async fn revert<U: UserStore + ?Sized>(store: &U, applied: &[RatingChange]) {
        for change in applied.iter().rev() {
            match store.apply_rating_delta(&change.player, -change.delta).await {
                Ok(rating) => info!(player = %change.player, rating, "rating change reverted"),
                Err(e) => warn!(
                    player = %change.player,
                    delta = change.delta,
                    error = %e,
                    "rating change could not be reverted"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KvUserStore, MemoryKvStore};

    #[test]
    fn test_level_bands() {
        assert_eq!(level_from_rating(800), 1);
        assert_eq!(level_from_rating(1099), 1);
        assert_eq!(level_from_rating(1100), 2);
        assert_eq!(level_from_rating(1250), 3);
        assert_eq!(level_from_rating(1999), 10);
        assert_eq!(level_from_rating(2000), 10);
        assert_eq!(level_from_rating(2100), 11);
    }

    #[test]
    fn test_completed_deltas() {
        let service = RatingService::default();
        let (w, l) = service.deltas(1000, &[1000, 1000, 1000], EndReason::Completed);

        assert_eq!(w, 16);
        assert_eq!(l, vec![-16, -16, -16]);
    }

    #[test]
    fn test_forfeit_deltas() {
        let service = RatingService::default();
        let (w, l) = service.deltas(1000, &[1000, 810], EndReason::OpponentsLeft);

        assert_eq!(w, 13);
        assert_eq!(l, vec![-25, -10]);
    }

    #[tokio::test]
    async fn test_settle_writes_store() {
        let store = KvUserStore::new(MemoryKvStore::new(), 1000);
        let service = RatingService::default();
        let alice = PlayerId::new("alice");
        let bob = PlayerId::new("bob");

        let changes = service
            .settle(&store, &alice, std::slice::from_ref(&bob), EndReason::Completed)
            .await
            .unwrap();

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].player, alice);
        assert_eq!(changes[0].after, 1016);
        assert_eq!(changes[1].after, 984);
        assert_eq!(store.get_rating(&bob).await.unwrap(), 984);
    }
}
