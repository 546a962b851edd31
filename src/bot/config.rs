//! Bot difficulty profiles.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::Difficulty;

/// Upper bound on any thinking pause, whatever the scale.
pub const MAX_THINK: Duration = Duration::from_secs(2);

/// How a bot of a given difficulty behaves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BotProfile {
    pub difficulty: Difficulty,

    /// Shortest simulated thinking pause.
    pub min_think: Duration,

    /// Longest simulated thinking pause.
    pub max_think: Duration,

    /// Chance of ignoring the scores and picking any legal move.
    pub random_move_probability: f64,
}

impl BotProfile {
    /// Built-in profile for a difficulty.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (min_ms, max_ms, random_move_probability) = match difficulty {
            Difficulty::Easy => (1000, 2000, 0.30),
            Difficulty::Medium => (800, 1500, 0.10),
            Difficulty::Hard => (500, 1000, 0.02),
        };
        Self {
            difficulty,
            min_think: Duration::from_millis(min_ms),
            max_think: Duration::from_millis(max_ms),
            random_move_probability,
        }
    }

    /// Scale both think bounds. `0.0` removes the pause entirely; scaled
    /// bounds never exceed [`MAX_THINK`].
    #[must_use]
    pub fn with_think_scale(mut self, scale: f64) -> Self {
        let scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
        self.min_think = self.min_think.mul_f64(scale).min(MAX_THINK);
        self.max_think = self.max_think.mul_f64(scale).min(MAX_THINK);
        self
    }

    /// Override the random-move probability.
    #[must_use]
    pub fn with_random_move_probability(mut self, probability: f64) -> Self {
        self.random_move_probability = probability.clamp(0.0, 1.0);
        self
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_get_faster_and_sharper() {
        let easy = BotProfile::for_difficulty(Difficulty::Easy);
        let hard = BotProfile::for_difficulty(Difficulty::Hard);

        assert_eq!(easy.min_think, Duration::from_secs(1));
        assert_eq!(easy.max_think, Duration::from_secs(2));
        assert!(hard.max_think <= easy.min_think);
        assert!(hard.max_think < easy.max_think);
        assert!(hard.random_move_probability < easy.random_move_probability);
        assert_eq!(BotProfile::default().difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_think_scale() {
        let fast = BotProfile::for_difficulty(Difficulty::Medium).with_think_scale(0.5);
        assert_eq!(fast.min_think, Duration::from_millis(400));
        assert_eq!(fast.max_think, Duration::from_millis(750));

        let instant = BotProfile::for_difficulty(Difficulty::Easy).with_think_scale(0.0);
        assert_eq!(instant.max_think, Duration::ZERO);
    }

    #[test]
    fn test_think_scale_capped_at_two_seconds() {
        let slow = BotProfile::for_difficulty(Difficulty::Easy).with_think_scale(3.0);
        assert_eq!(slow.min_think, MAX_THINK);
        assert_eq!(slow.max_think, MAX_THINK);

        let medium = BotProfile::for_difficulty(Difficulty::Medium).with_think_scale(2.0);
        assert_eq!(medium.min_think, Duration::from_millis(1600));
        assert_eq!(medium.max_think, MAX_THINK);

        let unset = BotProfile::for_difficulty(Difficulty::Hard).with_think_scale(f64::NAN);
        assert_eq!(unset.max_think, Duration::from_millis(1000));
    }
}
