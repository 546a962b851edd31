//! # rust-ludo
//!
//! An authoritative Ludo game service core: rules engine, bot opponents and
//! per-match session controller.
//!
//! ## Design Principles
//!
//! 1. **Server-Authoritative**: Clients only ask to roll or move. The dice,
//!    legality checks and turn order all live on the server.
//!
//! 2. **Pure Rules**: The rules engine does no I/O and keeps no state of its
//!    own. Sessions, bots, the simulator and tests all drive the same code.
//!
//! 3. **One Owner Per Match**: Each session's `GameState` is owned by a
//!    single actor task. Requests and bot turns are messages to that task.
//!
//! ## Architecture
//!
//! - **Tagged Positions**: A token is `Home`, `Track(step)` or `Finished`;
//!   there are no sentinel step values.
//!
//! - **Persistent History**: Move history is an `im-rs` vector, so state
//!   clones for bots and snapshots are O(1).
//!
//! - **Deterministic Randomness**: Dice and bot choices draw from separate
//!   seeded ChaCha streams, so a seeded session replays exactly.
//!
//! ## Modules
//!
//! - `core`: Seats, players, tokens, board geometry, state, RNG
//! - `rules`: Rolling, legal moves, captures, winning, replay
//! - `bot`: Difficulty profiles and move scoring
//! - `session`: Session actors, registry, events
//! - `rating`: Elo and forfeit adjustments, levels
//! - `storage`: Key-value backends and the user store
//! - `lobby`: Matchmaking queue, bot games, presence
//! - `sim`: Headless bot-vs-bot games
//! - `config`, `telemetry`: Service configuration and tracing setup

pub mod bot;
pub mod config;
pub mod core;
pub mod error;
pub mod lobby;
pub mod rating;
pub mod rules;
pub mod session;
pub mod sim;
pub mod storage;
pub mod telemetry;

// Re-export commonly used types
pub use crate::core::{
    Color, Difficulty, GameRng, GameState, GameStatus, MoveRecord, Player, PlayerId, PlayerStats,
    Seat, SeatMap, Token, TokenId, TokenPosition,
};

pub use crate::error::{GameError, IllegalMoveReason, RosterError};

pub use crate::rules::{LudoRules, MoveOutcome, PassReason, RollOutcome};

pub use crate::bot::{score_move, Bot, BotProfile, HeuristicPolicy, MovePolicy, RandomPolicy};

pub use crate::session::{
    EndReason, SessionController, SessionEvent, SessionId, SessionRegistry, SessionSpec,
    SessionSummary, StartedSession,
};

pub use crate::rating::{level_from_rating, RatingChange, RatingService};

pub use crate::storage::{KeyValueStore, KvUserStore, MemoryKvStore, StoreError, UserRecord, UserStore};

pub use crate::lobby::{create_bot_game, LobbyError, MatchPreferences, MatchmakingQueue, OnlineRegistry};

pub use crate::config::ServiceConfig;
