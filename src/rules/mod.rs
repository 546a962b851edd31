//! Ludo rules.
//!
//! `LudoRules` decides:
//! - Whether a roll is allowed and how it resolves
//! - Which tokens may move with the pending dice value
//! - Captures, finishing, winning and turn hand-over
//!
//! The engine does no I/O and holds no state of its own. Sessions, bots
//! and the simulator all call into it with the `GameState` they own.

pub mod engine;
pub mod outcome;
pub mod replay;

pub use engine::{landing, parse_token, LudoRules, PlannedMove, MAX_CONSECUTIVE_SIXES};
pub use outcome::{AvailableMoves, MoveOutcome, PassReason, RollOutcome};
pub use replay::replay;
