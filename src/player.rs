//! Player histories as sequences of `PlayerDay` nodes (components C3 and C4).

use serde::{Deserialize, Serialize};

use crate::game::{Color, PlayerId};

/// A reference, by stable index, to a `Game` in the registry's flat game store, tagged with
/// the color this player held in that game. Never owns the game (§3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameRef {
    pub game_index: usize,
    pub color: Color,
}

/// One time-indexed latent rating variable for a player on a day they played at least one game.
/// Created lazily on first game for that (player, day); invariant 3 of §3 holds: a history's day
/// list is sorted, unique, and contains exactly the days with at least one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDay {
    pub day: u32,
    /// Natural rating r; γ = e^r. Defaults to 0 for a newly created node.
    pub r: f64,
    pub games: Vec<GameRef>,
}

impl PlayerDay {
    fn new(day: u32) -> Self {
        Self {
            day,
            r: 0.0,
            games: Vec::new(),
        }
    }

    pub fn add_game(&mut self, game_index: usize, color: Color) {
        self.games.push(GameRef { game_index, color });
    }
}

/// A player's canonical name and the ordered sequence of `PlayerDay` nodes forming their
/// latent rating history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub history: Vec<PlayerDay>,
}

impl Player {
    pub fn new(name: String) -> Self {
        Self {
            name,
            history: Vec::new(),
        }
    }

    /// Index of the `PlayerDay` for `day` in `self.history`, if one has been created.
    pub fn day_index(&self, day: u32) -> Option<usize> {
        self.history.binary_search_by_key(&day, |node| node.day).ok()
    }

    /// Returns the index of the `PlayerDay` for `day`, creating it (in sorted position) if this
    /// is the first game for the player on that day.
    pub fn ensure_day(&mut self, day: u32) -> usize {
        match self.history.binary_search_by_key(&day, |node| node.day) {
            Ok(index) => index,
            Err(insert_at) => {
                self.history.insert(insert_at, PlayerDay::new(day));
                insert_at
            }
        }
    }

    /// The most recent `PlayerDay`, if the player has played at least one game.
    pub fn latest(&self) -> Option<&PlayerDay> {
        self.history.last()
    }

    /// The natural rating `PlayerDay` nodes adjacent to `index` are coupled to via the Wiener
    /// prior: `(prev_index, next_index)`, either side `None` at the ends of the history.
    pub fn neighbors(&self, index: usize) -> (Option<usize>, Option<usize>) {
        let prev = if index == 0 { None } else { Some(index - 1) };
        let next = if index + 1 < self.history.len() {
            Some(index + 1)
        } else {
            None
        };
        (prev, next)
    }
}
