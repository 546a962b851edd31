//! Game state for one match.
//!
//! ## GameState
//!
//! Everything observable about a match:
//! - Roster in seat order and each seat's four tokens
//! - Current seat, pending dice value, six streak
//! - Status, winner, turn counter
//! - Append-only move history and per-seat statistics
//!
//! The history uses an `im` persistent vector so the whole state clones in
//! O(1). The bot and snapshot events work on clones; only the rules engine
//! mutates the live copy.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::MoveRecord;
use super::player::{Color, Player, PlayerId, Seat, SeatMap, MAX_PLAYERS, MIN_PLAYERS};
use super::token::{Token, TokenId, TokenPosition, TOKENS_PER_PLAYER};

/// Match lifecycle. `Finished` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Playing,
    Finished,
}

/// Per-seat counters reported at the end of a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Opposing tokens this player sent home.
    pub captures: u32,
    /// This player's tokens sent home by opponents.
    pub tokens_captured: u32,
    /// Tokens that reached the finish cell.
    pub tokens_finished: u32,
    /// Dice rolls taken, including voided and passed ones.
    pub turns_played: u32,
}

/// Where a player's tokens are, summarised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenCensus {
    pub home: usize,
    pub open_path: usize,
    pub lane: usize,
    pub finished: usize,
}

impl TokenCensus {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.home + self.open_path + self.lane + self.finished
    }
}

/// Full state of one match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    roster: Vec<Player>,

    tokens: SeatMap<[Token; TOKENS_PER_PLAYER]>,

    /// Seat whose turn it is.
    pub current: Seat,

    /// Rolled value not yet consumed by a move or a pass.
    pub dice: Option<u8>,

    /// Most recent roll, kept for display after it is consumed.
    pub last_roll: Option<u8>,

    /// Sixes rolled and moved in the current unbroken turn sequence.
    pub consecutive_sixes: u8,

    pub status: GameStatus,

    pub winner: Option<Seat>,

    /// Turn counter (starts at 1, increments on every hand-over).
    pub turn_number: u32,

    /// Every successful move in order.
    pub history: Vector<MoveRecord>,

    pub stats: SeatMap<PlayerStats>,
}

impl GameState {
    /// Create the starting position for a seated roster.
    ///
    /// # Panics
    ///
    /// Panics if the roster has fewer than 2 or more than 4 players. The
    /// session layer validates rosters before constructing a game.
    #[must_use]
    pub fn new(roster: Vec<Player>) -> Self {
        let player_count = roster.len();
        assert!(
            (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count),
            "roster must have 2-4 players, got {player_count}"
        );

        Self {
            tokens: SeatMap::new(player_count, |seat| Token::starting_set(Color::for_seat(seat))),
            roster,
            current: Seat::new(0),
            dice: None,
            last_roll: None,
            consecutive_sixes: 0,
            status: GameStatus::Playing,
            winner: None,
            turn_number: 1,
            history: Vector::new(),
            stats: SeatMap::with_default(player_count),
        }
    }

    // === Roster ===

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    /// Players in seat order.
    #[must_use]
    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    #[must_use]
    pub fn player(&self, seat: Seat) -> &Player {
        &self.roster[seat.index()]
    }

    /// Seat of a player id, `None` if they are not at this table.
    #[must_use]
    pub fn seat_of(&self, player: &PlayerId) -> Option<Seat> {
        self.roster
            .iter()
            .position(|p| p.id() == player)
            .map(|i| Seat::new(i as u8))
    }

    #[must_use]
    pub fn current_player(&self) -> &Player {
        self.player(self.current)
    }

    /// Iterate over all seats.
    pub fn seats(&self) -> impl Iterator<Item = Seat> {
        Seat::all(self.player_count())
    }

    #[must_use]
    pub fn has_bots(&self) -> bool {
        self.roster.iter().any(Player::is_bot)
    }

    // === Tokens ===

    #[must_use]
    pub fn tokens(&self, seat: Seat) -> &[Token; TOKENS_PER_PLAYER] {
        &self.tokens[seat]
    }

    #[must_use]
    pub fn position(&self, seat: Seat, token: TokenId) -> TokenPosition {
        self.tokens[seat][token.index()].position
    }

    /// Put a token somewhere directly.
    ///
    /// Used by replay and for building scenarios. Regular play goes
    /// through the rules engine.
    pub fn place_token(&mut self, seat: Seat, token: TokenId, position: TokenPosition) {
        self.tokens[seat][token.index()].position = position;
    }

    /// All token positions, per seat.
    #[must_use]
    pub fn positions(&self) -> SeatMap<[TokenPosition; TOKENS_PER_PLAYER]> {
        SeatMap::new(self.player_count(), |seat| self.tokens[seat].map(|t| t.position))
    }

    #[must_use]
    pub fn census(&self, seat: Seat) -> TokenCensus {
        let mut census = TokenCensus::default();
        for token in &self.tokens[seat] {
            match token.position {
                TokenPosition::Home => census.home += 1,
                TokenPosition::Finished => census.finished += 1,
                p if p.is_open_path() => census.open_path += 1,
                _ => census.lane += 1,
            }
        }
        census
    }

    /// Tokens that are on the board (neither home nor finished).
    #[must_use]
    pub fn tokens_in_play(&self, seat: Seat) -> usize {
        self.tokens[seat]
            .iter()
            .filter(|t| matches!(t.position, TokenPosition::Track(_)))
            .count()
    }

    #[must_use]
    pub fn tokens_at_home(&self, seat: Seat) -> usize {
        self.tokens[seat].iter().filter(|t| t.position.is_home()).count()
    }

    #[must_use]
    pub fn all_finished(&self, seat: Seat) -> bool {
        self.tokens[seat].iter().all(|t| t.position.is_finished())
    }

    /// Opposing tokens standing on ring step `step`.
    pub fn opponents_at(&self, seat: Seat, step: u8) -> impl Iterator<Item = (Seat, TokenId)> + '_ {
        self.tokens
            .iter()
            .filter(move |(owner, _)| *owner != seat)
            .flat_map(move |(owner, tokens)| {
                tokens
                    .iter()
                    .filter(move |t| t.position == TokenPosition::Track(step))
                    .map(move |t| (owner, t.id))
            })
    }

    /// Opposing tokens on the open path, with their steps.
    pub fn opponent_steps(&self, seat: Seat) -> impl Iterator<Item = u8> + '_ {
        self.tokens
            .iter()
            .filter(move |(owner, _)| *owner != seat)
            .flat_map(|(_, tokens)| tokens.iter())
            .filter(|t| t.position.is_open_path())
            .filter_map(|t| t.position.step())
    }

    // === Progression ===

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// The winner's id once the match is over.
    #[must_use]
    pub fn winner_id(&self) -> Option<&PlayerId> {
        self.winner.map(|seat| self.player(seat).id())
    }

    /// Hand the turn to the next seat, clearing the dice and six streak.
    pub fn advance_turn(&mut self) {
        self.current = self.current.next(self.player_count());
        self.dice = None;
        self.consecutive_sixes = 0;
        self.turn_number += 1;
    }

    /// End the match with `seat` as winner.
    pub fn declare_winner(&mut self, seat: Seat) {
        self.winner = Some(seat);
        self.status = GameStatus::Finished;
        self.dice = None;
    }

    /// Append a move to history.
    pub fn record_move(&mut self, record: MoveRecord) {
        self.history.push_back(record);
    }
}
