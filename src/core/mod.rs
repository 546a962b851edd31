//! Core game types: seats, players, tokens, board geometry, state, RNG.
//!
//! This module holds the data the rules engine operates on. Nothing here
//! decides legality; see `rules` for that.

pub mod action;
pub mod board;
pub mod player;
pub mod rng;
pub mod state;
pub mod token;

pub use action::{CapturedToken, Captures, MoveRecord};
pub use player::{Color, Difficulty, Player, PlayerId, Seat, SeatMap, MAX_PLAYERS, MIN_PLAYERS};
pub use rng::GameRng;
pub use state::{GameState, GameStatus, PlayerStats, TokenCensus};
pub use token::{Token, TokenId, TokenPosition, TOKENS_PER_PLAYER};
