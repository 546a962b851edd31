//! Player identification, seating and per-seat data storage.
//!
//! ## Seat
//!
//! Type-safe seat index for 2-4 players. Seat order is join order and
//! decides both turn order and token color.
//!
//! ## SeatMap
//!
//! Efficient per-seat data storage backed by `Vec` for O(1) access.
//! Supports iteration and indexing by `Seat`.
//!
//! ## Player
//!
//! Roster entries are a tagged union of humans and bots. Code that needs
//! to treat bots differently matches on the variant instead of checking a
//! flag.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Smallest table the engine will seat.
pub const MIN_PLAYERS: usize = 2;

/// Largest table the engine will seat (one per color).
pub const MAX_PLAYERS: usize = 4;

/// Seat index at the table.
///
/// Seats are 0-based: the first player to join sits at `Seat(0)` and
/// moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seat(pub u8);

impl Seat {
    /// Create a new seat.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat that plays after this one at a table of `player_count`.
    #[must_use]
    pub const fn next(self, player_count: usize) -> Self {
        Self(((self.0 as usize + 1) % player_count) as u8)
    }

    /// Iterate over all seats for a table with `player_count` players.
    ///
    /// ```
    /// use rust_ludo::core::Seat;
    ///
    /// let seats: Vec<_> = Seat::all(4).collect();
    /// assert_eq!(seats.len(), 4);
    /// assert_eq!(seats[0], Seat::new(0));
    /// assert_eq!(seats[3], Seat::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = Seat> {
        (0..player_count as u8).map(Seat)
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Token color. Assigned by seat: red, blue, green, yellow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    /// Colors in seating order.
    pub const ALL: [Color; MAX_PLAYERS] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    /// The color owned by `seat`.
    #[must_use]
    pub const fn for_seat(seat: Seat) -> Self {
        Self::ALL[seat.index()]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Blue => write!(f, "blue"),
            Self::Green => write!(f, "green"),
            Self::Yellow => write!(f, "yellow"),
        }
    }
}

/// External player identifier, issued by the auth layer.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Bot strength. Controls thinking delay and how often the bot ignores
/// its own scoring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

/// A seated participant. Immutable for the lifetime of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Player {
    /// A person driving their own turns.
    Human { id: PlayerId, name: String },
    /// A server-driven opponent.
    Bot {
        id: PlayerId,
        name: String,
        difficulty: Difficulty,
    },
}

impl Player {
    /// Create a human player.
    pub fn human(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Human {
            id: PlayerId::new(id),
            name: name.into(),
        }
    }

    /// Create a bot player.
    pub fn bot(id: impl Into<String>, name: impl Into<String>, difficulty: Difficulty) -> Self {
        Self::Bot {
            id: PlayerId::new(id),
            name: name.into(),
            difficulty,
        }
    }

    #[must_use]
    pub fn id(&self) -> &PlayerId {
        match self {
            Self::Human { id, .. } | Self::Bot { id, .. } => id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Human { name, .. } | Self::Bot { name, .. } => name,
        }
    }

    #[must_use]
    pub const fn is_bot(&self) -> bool {
        matches!(self, Self::Bot { .. })
    }

    /// Bot difficulty, `None` for humans.
    #[must_use]
    pub const fn difficulty(&self) -> Option<Difficulty> {
        match self {
            Self::Bot { difficulty, .. } => Some(*difficulty),
            Self::Human { .. } => None,
        }
    }
}

/// Per-seat data storage with O(1) access.
///
/// Backed by a `Vec<T>` with one entry per seat.
/// Use `SeatMap::new()` to create with a factory function,
/// or `SeatMap::with_value()` to initialize all entries to the same value.
///
/// ## Example
///
/// ```
/// use rust_ludo::core::{Seat, SeatMap};
///
/// let mut captures: SeatMap<u32> = SeatMap::with_value(4, 0);
/// captures[Seat::new(1)] += 1;
/// assert_eq!(captures[Seat::new(1)], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: Vec<T>,
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    ///
    /// The factory receives the `Seat` for each entry.
    pub fn new(player_count: usize, factory: impl Fn(Seat) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 seat");
        assert!(player_count <= MAX_PLAYERS, "At most 4 seats supported");

        let data = (0..player_count as u8).map(|i| factory(Seat(i))).collect();

        Self { data }
    }

    /// Create a new SeatMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Create a new SeatMap with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Get the number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (Seat, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over (Seat, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Seat, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over all seats.
    pub fn seats(&self) -> impl Iterator<Item = Seat> {
        (0..self.data.len() as u8).map(Seat)
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}
