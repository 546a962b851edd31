//! Lobby: forming rosters before a session starts.
//!
//! - [`MatchmakingQueue`]: groups humans by table size and ranked flag
//! - [`create_bot_game`]: one human against server bots
//! - [`OnlineRegistry`]: online / in-game presence

pub mod matchmaking;
pub mod presence;

use crate::core::{Difficulty, Player, PlayerId, MAX_PLAYERS};
use crate::session::SessionSpec;

pub use matchmaking::{MatchPreferences, MatchmakingQueue, QueueOutcome, QueuedPlayer};
pub use presence::{OnlineRegistry, Presence};

/// Errors from lobby requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    #[error("tables seat 2-4 players, requested {0}")]
    TableSize(usize),

    #[error("player {0} is already queued")]
    AlreadyQueued(PlayerId),

    #[error("bot {0} cannot join the queue")]
    BotQueued(PlayerId),

    #[error("a bot game needs a human player")]
    NoHuman,
}

const BOT_NAMES: [&str; MAX_PLAYERS - 1] = ["Ruby", "Cobalt", "Jade"];

/// An unranked match of `human` against `bots` bots of one difficulty.
///
/// The human takes seat 0. Bot ids are derived from the human's id so
/// they never clash with it.
///
/// ```
/// use rust_ludo::core::{Difficulty, Player};
/// use rust_ludo::lobby::create_bot_game;
///
/// let spec = create_bot_game(Player::human("u1", "Uma"), 3, Difficulty::Easy).unwrap();
/// assert_eq!(spec.players.len(), 4);
/// assert!(!spec.ranked);
/// ```
pub fn create_bot_game(
    human: Player,
    bots: usize,
    difficulty: Difficulty,
) -> Result<SessionSpec, LobbyError> {
    if human.is_bot() {
        return Err(LobbyError::NoHuman);
    }
    if !(1..MAX_PLAYERS).contains(&bots) {
        return Err(LobbyError::TableSize(bots + 1));
    }

    let mut players = Vec::with_capacity(bots + 1);
    let owner = human.id().clone();
    players.push(human);
    players.extend(
        BOT_NAMES
            .iter()
            .take(bots)
            .enumerate()
            .map(|(i, name)| Player::bot(format!("{owner}-bot-{i}"), *name, difficulty)),
    );

    Ok(SessionSpec::new(players))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_bot_game() {
        let spec = create_bot_game(Player::human("u1", "Uma"), 1, Difficulty::Hard).unwrap();

        assert_eq!(spec.players.len(), 2);
        assert!(!spec.players[0].is_bot());
        assert_eq!(spec.players[1].difficulty(), Some(Difficulty::Hard));
        assert_eq!(spec.players[1].id().as_str(), "u1-bot-0");
    }

    #[test]
    fn test_create_bot_game_limits() {
        let human = Player::human("u1", "Uma");
        assert_eq!(create_bot_game(human.clone(), 0, Difficulty::Easy), Err(LobbyError::TableSize(1)));
        assert_eq!(create_bot_game(human, 4, Difficulty::Easy), Err(LobbyError::TableSize(5)));
        assert_eq!(
            create_bot_game(Player::bot("b", "Robo", Difficulty::Easy), 1, Difficulty::Easy),
            Err(LobbyError::NoHuman)
        );
    }
}
