//! Headless bot-vs-bot matches.
//!
//! Plays complete games straight through the rules engine with no think
//! pauses and no session machinery. Used for balancing bot profiles,
//! benchmarking and as a large-scale check of engine invariants.

mod runner;

pub use runner::{BatchReport, GameReport, SeatPolicy, SimulationConfig, Simulator};
