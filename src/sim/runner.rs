//! Simulation configuration and runner.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bot::{BotProfile, HeuristicPolicy, MovePolicy, RandomPolicy};
use crate::core::{Difficulty, GameRng, GameState, Player, PlayerStats, Seat, SeatMap};
use crate::error::GameError;
use crate::rules::LudoRules;

/// Strategy used by one simulated seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatPolicy {
    /// The regular bot at a difficulty.
    Heuristic(Difficulty),
    /// Uniformly random legal moves.
    Random,
}

impl SeatPolicy {
    fn build(self) -> Box<dyn MovePolicy> {
        match self {
            Self::Heuristic(difficulty) => Box::new(HeuristicPolicy::new(
                BotProfile::for_difficulty(difficulty).random_move_probability,
            )),
            Self::Random => Box::new(RandomPolicy),
        }
    }
}

impl std::fmt::Display for SeatPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Heuristic(difficulty) => write!(f, "{difficulty}"),
            Self::Random => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for SeatPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("random") {
            Ok(Self::Random)
        } else {
            s.parse().map(Self::Heuristic)
        }
    }
}

/// Configuration for a batch of simulated games.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// One policy per seat, in seat order.
    pub seats: Vec<SeatPolicy>,

    /// Rolls after which an unfinished game is abandoned.
    pub max_rolls: u32,

    /// Seed offset (combined with game index for unique seeds).
    pub seed_offset: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seats: vec![SeatPolicy::Heuristic(Difficulty::Medium); 4],
            max_rolls: 10_000,
            seed_offset: 0,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seats(mut self, seats: Vec<SeatPolicy>) -> Self {
        self.seats = seats;
        self
    }

    pub fn with_max_rolls(mut self, max: u32) -> Self {
        self.max_rolls = max;
        self
    }

    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }
}

/// Outcome of one simulated game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameReport {
    pub seed: u64,
    /// `None` if the roll limit was hit first.
    pub winner: Option<Seat>,
    pub rolls: u32,
    pub moves: usize,
    pub stats: SeatMap<PlayerStats>,
}

/// Aggregate over a batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchReport {
    pub games: usize,
    pub wins: SeatMap<u32>,
    pub unfinished: usize,
    pub total_rolls: u64,
    pub total_captures: u64,
}

impl BatchReport {
    /// Mean rolls per game.
    #[must_use]
    pub fn mean_rolls(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_rolls as f64 / self.games as f64
        }
    }

    /// Share of finished games won by `seat`.
    #[must_use]
    pub fn win_rate(&self, seat: Seat) -> f64 {
        let finished = self.games - self.unfinished;
        if finished == 0 {
            0.0
        } else {
            f64::from(self.wins[seat]) / finished as f64
        }
    }
}

/// Runs simulated games.
pub struct Simulator {
    rules: LudoRules,
    config: SimulationConfig,
    policies: Vec<Box<dyn MovePolicy>>,
}

impl Simulator {
    /// # Panics
    ///
    /// Panics if the config does not name 2-4 seats.
    pub fn new(config: SimulationConfig) -> Self {
        let policies = config.seats.iter().map(|p| p.build()).collect();
        let simulator = Self {
            rules: LudoRules::new(),
            config,
            policies,
        };
        // Fail at construction, not on the first game.
        let _ = simulator.roster();
        simulator
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn roster(&self) -> Vec<Player> {
        let roster: Vec<Player> = self
            .config
            .seats
            .iter()
            .enumerate()
            .map(|(i, policy)| {
                let difficulty = match policy {
                    SeatPolicy::Heuristic(d) => *d,
                    SeatPolicy::Random => Difficulty::Easy,
                };
                Player::bot(format!("sim-{i}"), format!("{policy} #{i}"), difficulty)
            })
            .collect();
        assert!(
            (2..=4).contains(&roster.len()),
            "simulation needs 2-4 seats, got {}",
            roster.len()
        );
        roster
    }

    /// Play one game from `seed` to the end or the roll limit.
    pub fn play_game(&self, seed: u64) -> Result<GameReport, GameError> {
        let mut state = GameState::new(self.roster());
        let rng = GameRng::new(seed);
        let mut dice = rng.for_context("dice");
        let mut choices = rng.for_context("bot");
        let mut rolls = 0;

        while rolls < self.config.max_rolls && self.rules.is_terminal(&state).is_none() {
            let seat = state.current;
            let player = state.player(seat).id().clone();

            let roll = self.rules.roll_dice(&mut state, &player, &mut dice)?;
            rolls += 1;
            if roll.is_pass() {
                continue;
            }

            let token = self.policies[seat.index()]
                .choose(&state, &roll.available, &mut choices)
                .unwrap_or(roll.available[0]);
            self.rules.move_token(&mut state, &player, token)?;
        }

        debug!(seed, rolls, winner = ?state.winner, "simulated game");
        Ok(GameReport {
            seed,
            winner: state.winner,
            rolls,
            moves: state.history.len(),
            stats: state.stats.clone(),
        })
    }

    /// Play `games` games with seeds `seed_offset..seed_offset + games`.
    pub fn run_batch(&self, games: usize) -> Result<BatchReport, GameError> {
        let player_count = self.config.seats.len();
        let mut report = BatchReport {
            games,
            wins: SeatMap::with_value(player_count, 0),
            unfinished: 0,
            total_rolls: 0,
            total_captures: 0,
        };

        for game in 0..games as u64 {
            let result = self.play_game(self.config.seed_offset + game)?;
            match result.winner {
                Some(seat) => report.wins[seat] += 1,
                None => report.unfinished += 1,
            }
            report.total_rolls += u64::from(result.rolls);
            report.total_captures += result
                .stats
                .iter()
                .map(|(_, s)| u64::from(s.captures))
                .sum::<u64>();
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_policy_parse() {
        assert_eq!("random".parse::<SeatPolicy>(), Ok(SeatPolicy::Random));
        assert_eq!("Hard".parse::<SeatPolicy>(), Ok(SeatPolicy::Heuristic(Difficulty::Hard)));
        assert!("unbeatable".parse::<SeatPolicy>().is_err());
    }

    #[test]
    fn test_game_finishes_and_is_deterministic() {
        let sim = Simulator::new(SimulationConfig::new().with_seats(vec![
            SeatPolicy::Heuristic(Difficulty::Hard),
            SeatPolicy::Random,
        ]));

        let a = sim.play_game(11).unwrap();
        let b = sim.play_game(11).unwrap();

        assert!(a.winner.is_some());
        assert_eq!(a.winner, b.winner);
        assert_eq!(a.rolls, b.rolls);
        assert_eq!(a.stats[a.winner.unwrap()].tokens_finished, 4);
    }

    #[test]
    fn test_batch_counts_add_up() {
        let sim = Simulator::new(SimulationConfig::new().with_seats(vec![SeatPolicy::Random; 3]));
        let report = sim.run_batch(5).unwrap();

        let wins: u32 = report.wins.iter().map(|(_, w)| *w).sum();
        assert_eq!(wins as usize + report.unfinished, 5);
        assert!(report.mean_rolls() > 0.0);
    }

    #[test]
    #[should_panic(expected = "simulation needs 2-4 seats")]
    fn test_too_few_seats() {
        let _ = Simulator::new(SimulationConfig::new().with_seats(vec![SeatPolicy::Random]));
    }
}
