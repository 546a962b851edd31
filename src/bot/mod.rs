//! Server-driven opponents.
//!
//! A [`Bot`] pairs a difficulty [`BotProfile`] with the heuristic
//! [`MovePolicy`]. It only reads game state: the caller applies the chosen
//! token through the rules engine.
//!
//! ```
//! use rust_ludo::bot::Bot;
//! use rust_ludo::core::{Difficulty, GameRng, GameState, Player, TokenId};
//!
//! let mut state = GameState::new(vec![
//!     Player::human("h", "Hana"),
//!     Player::bot("b", "Robo", Difficulty::Hard),
//! ]);
//! state.dice = Some(6);
//!
//! let bot = Bot::new(Difficulty::Hard);
//! let mut rng = GameRng::new(7);
//! let choice = bot.choose(&state, &[TokenId::new(0), TokenId::new(1)], &mut rng);
//! assert!(choice.is_some());
//! ```

pub mod config;
pub mod policy;

use std::time::Duration;

use tracing::debug;

use crate::core::{Difficulty, GameRng, GameState, TokenId};

pub use config::BotProfile;
pub use policy::{score_move, HeuristicPolicy, MovePolicy, RandomPolicy};

/// A bot opponent.
#[derive(Clone, Debug)]
pub struct Bot {
    profile: BotProfile,
    policy: HeuristicPolicy,
}

impl Bot {
    /// Bot with the built-in profile for `difficulty`.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self::from_profile(BotProfile::for_difficulty(difficulty))
    }

    #[must_use]
    pub fn from_profile(profile: BotProfile) -> Self {
        let policy = HeuristicPolicy::new(profile.random_move_probability);
        Self { profile, policy }
    }

    #[must_use]
    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }

    /// Draw a thinking pause from the profile's range.
    pub fn think_time(&self, rng: &mut GameRng) -> Duration {
        rng.gen_duration(self.profile.min_think, self.profile.max_think)
    }

    /// Pick a token without pausing.
    pub fn choose(&self, state: &GameState, legal: &[TokenId], rng: &mut GameRng) -> Option<TokenId> {
        let choice = self.policy.choose(state, legal, rng);
        debug!(
            difficulty = %self.profile.difficulty,
            seat = %state.current,
            dice = ?state.dice,
            candidates = legal.len(),
            choice = ?choice,
            "bot chose move"
        );
        choice
    }

    /// Think for a while, then pick a token. `None` for an empty list,
    /// returned without pausing.
    ///
    /// For callers that can simply await. The session actor cannot block
    /// its mailbox, so it runs the same two steps apart: [`think_time`]
    /// for a delayed self-message, then [`choose`] when it arrives.
    ///
    /// [`think_time`]: Bot::think_time
    /// [`choose`]: Bot::choose
    pub async fn decide(
        &self,
        state: &GameState,
        legal: &[TokenId],
        rng: &mut GameRng,
    ) -> Option<TokenId> {
        if legal.is_empty() {
            return None;
        }
        tokio::time::sleep(self.think_time(rng)).await;
        self.choose(state, legal, rng)
    }
}
