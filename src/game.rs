//! Immutable game records (component C2).

use serde::{Deserialize, Serialize};

/// Index of a `Player` within a `Registry`'s flat player store.
pub type PlayerId = usize;

/// Which side of the board a player occupied in a given game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

/// The recorded outcome of a game. Draws are not part of this model (§9 open question).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Black,
    White,
}

/// One immutable, dated pairwise result. Referenced by stable index from exactly two
/// `PlayerDay` nodes — the black player's and the white player's — never owned by them
/// (§3, §9's cyclic-reference redesign note).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub black: PlayerId,
    pub white: PlayerId,
    pub winner: Winner,
    pub day: u32,
    /// Handicap in Elo points, added to the white side's effective strength for this game only
    /// (§4.1).
    pub handicap_elo: f64,
}

impl Game {
    pub fn new(
        black: PlayerId,
        white: PlayerId,
        winner: Winner,
        day: u32,
        handicap_elo: f64,
    ) -> Self {
        Self {
            black,
            white,
            winner,
            day,
            handicap_elo,
        }
    }

    /// Whether `player` won this game, given the color they held.
    pub fn player_won(&self, color: Color) -> bool {
        match (color, self.winner) {
            (Color::Black, Winner::Black) => true,
            (Color::White, Winner::White) => true,
            _ => false,
        }
    }

    /// The other side of this game.
    pub fn opponent(&self, color: Color) -> PlayerId {
        match color {
            Color::Black => self.white,
            Color::White => self.black,
        }
    }
}
