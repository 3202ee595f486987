//! The registry and query surface (component C8): name → player lookup, game ingestion, rating
//! retrieval, and future-match prediction (§4.7). The single explicit instance a caller threads
//! through the driver — no hidden process-wide state (§9).

use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{WhrError, WhrResult};
use crate::game::{Color, Game, PlayerId, Winner};
use crate::iterate::{self, Convergence};
use crate::numerics::{natural_to_elo, win_probability, NATURAL_PER_ELO};
use crate::player::Player;
use crate::uncertainty;

/// One `[day, Elo, uncertainty-Elo]` sample, as `ratings_for_player` returns (§4.7).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSample {
    pub day: u32,
    pub elo: f64,
    pub uncertainty_elo: f64,
}

/// One `[day, Elo]` sample within an `OrderedRating`, with uncertainty omitted when `compact`
/// was requested rather than forced to a misleading numeric placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedSample {
    pub day: u32,
    pub elo: f64,
    pub uncertainty_elo: Option<f64>,
}

/// One row of `get_ordered_ratings`: a player and either just their latest rating sample
/// (`current = true`) or their full day-by-day history (`current = false`), sorted by the
/// player's most recent Elo descending.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedRating {
    pub name: String,
    pub samples: Vec<OrderedSample>,
}

impl OrderedRating {
    /// The rating that drove this row's position in the ordering — always the most recent
    /// sample, regardless of how many samples `current` asked for.
    pub fn latest(&self) -> &OrderedSample {
        self.samples
            .last()
            .expect("a player only appears in get_ordered_ratings once they have a PlayerDay")
    }
}

/// The process-wide container of §3/§4.7: every `Player` (flat, index-stable store), every
/// `Game` (flat, index-stable store — §9's cyclic-reference redesign note), and the run's
/// `Config`. Players are created on demand; games append monotonically; nothing is deleted
/// during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    config: Config,
    players: Vec<Player>,
    games: Vec<Game>,
}

impl Registry {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            players: Vec::new(),
            games: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Canonicalizes a name for lookup, folding case when `uncased` is configured (§6).
    fn canonical_name(&self, name: &str) -> String {
        if self.config.uncased {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    fn find_player(&self, name: &str) -> Option<PlayerId> {
        let canonical = self.canonical_name(name);
        self.players.iter().position(|p| p.name == canonical)
    }

    /// Looks up a player by name, creating one (in registry insertion order) if this is the
    /// first time it's been seen.
    fn ensure_player(&mut self, name: &str) -> PlayerId {
        let canonical = self.canonical_name(name);
        if let Some(id) = self.players.iter().position(|p| p.name == canonical) {
            return id;
        }
        self.players.push(Player::new(canonical));
        self.players.len() - 1
    }

    /// Creates one game: looks up or creates both players, looks up or creates their `PlayerDay`
    /// nodes on `day`, and appends a `Game` referenced by both sides (§4.7). Fails without
    /// mutating anything if `day` is non-positive.
    pub fn create_game(
        &mut self,
        black: &str,
        white: &str,
        winner: Winner,
        day: u32,
        handicap_elo: f64,
    ) -> WhrResult<()> {
        if day == 0 {
            return Err(WhrError::InputError(format!(
                "day must be a positive integer, got {day}"
            )));
        }
        if black.trim().is_empty() || white.trim().is_empty() {
            return Err(WhrError::InputError(
                "player names must be non-empty".to_string(),
            ));
        }

        let black_id = self.ensure_player(black);
        let white_id = self.ensure_player(white);

        let game_index = self.games.len();
        self.games
            .push(Game::new(black_id, white_id, winner, day, handicap_elo));

        let black_day = self.players[black_id].ensure_day(day);
        self.players[black_id].history[black_day].add_game(game_index, Color::Black);
        let white_day = self.players[white_id].ensure_day(day);
        self.players[white_id].history[white_day].add_game(game_index, Color::White);

        Ok(())
    }

    /// Parses and dispatches each line of the grammar of §6:
    /// `BLACK S WHITE S WINNER S DAY [S HANDICAP [S EXTRAS]]`. `EXTRAS` (and anything after it)
    /// is opaque and ignored. A malformed line is an `InputError`; nothing prior is undone.
    pub fn load_games<'a, I>(&mut self, lines: I, separator: char) -> WhrResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for line in lines {
            self.load_game_line(line, separator)?;
        }
        Ok(())
    }

    fn load_game_line(&mut self, line: &str, separator: char) -> WhrResult<()> {
        let mut fields = line.split(separator).map(str::trim);
        let black = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| WhrError::InputError(format!("missing black field: {line:?}")))?;
        let white = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| WhrError::InputError(format!("missing white field: {line:?}")))?;
        let winner_field = fields
            .next()
            .ok_or_else(|| WhrError::InputError(format!("missing winner field: {line:?}")))?;
        let winner = match winner_field.trim().to_ascii_uppercase().as_str() {
            "B" => Winner::Black,
            "W" => Winner::White,
            other => {
                return Err(WhrError::InputError(format!(
                    "winner must be B or W, got {other:?}"
                )))
            }
        };
        let day_field = fields
            .next()
            .ok_or_else(|| WhrError::InputError(format!("missing day field: {line:?}")))?;
        let day: u32 = day_field
            .trim()
            .parse()
            .map_err(|_| WhrError::InputError(format!("invalid day: {day_field:?}")))?;
        let handicap_elo = match fields.next() {
            Some(field) if !field.trim().is_empty() => field
                .trim()
                .parse()
                .map_err(|_| WhrError::InputError(format!("invalid handicap: {field:?}")))?,
            _ => 0.0,
        };
        // Any remaining fields are EXTRAS — opaque, ignored by the core (§6).

        self.create_game(black, white, winner, day, handicap_elo)
    }

    /// Runs `n` full Gauss–Seidel sweeps over every player (§4.5).
    pub fn iterate(&mut self, sweeps: u32) -> WhrResult<f64> {
        iterate::iterate(&mut self.players, &self.games, self.config.natural_w2(), sweeps)
    }

    /// Repeatedly sweeps until the convergence metric drops to `precision` or `time_limit`
    /// elapses (§4.5).
    pub fn auto_iterate(
        &mut self,
        time_limit: Option<Duration>,
        precision: f64,
        batch_size: u32,
    ) -> WhrResult<Convergence> {
        iterate::auto_iterate(
            &mut self.players,
            &self.games,
            self.config.natural_w2(),
            time_limit,
            precision,
            batch_size,
        )
    }

    /// Every `[day, Elo, uncertainty-Elo]` sample for `name`, in day order (§4.7). Fails with
    /// `UnknownPlayer` if the name has never been seen — unlike `probability_future_match`,
    /// which tolerates a missing player.
    pub fn ratings_for_player(&self, name: &str) -> WhrResult<Vec<RatingSample>> {
        let player_id = self
            .find_player(name)
            .ok_or_else(|| WhrError::UnknownPlayer(name.to_string()))?;
        let natural_w2 = self.config.natural_w2();
        let variances =
            uncertainty::player_day_variances(&self.players, &self.games, player_id, natural_w2);

        Ok(self.players[player_id]
            .history
            .iter()
            .zip(variances.iter())
            .map(|(node, variance)| RatingSample {
                day: node.day,
                elo: natural_to_elo(node.r),
                uncertainty_elo: uncertainty::uncertainty_elo(*variance),
            })
            .collect())
    }

    /// Players sorted by most-recent Elo descending, ties broken by ascending canonical name
    /// (§9's resolution of the tie-break open question). `current = true` reports only each
    /// player's latest `PlayerDay`; `current = false` reports their full day-by-day history.
    /// `compact` omits uncertainty from every reported sample either way (§4.7).
    pub fn get_ordered_ratings(&self, current: bool, compact: bool) -> Vec<OrderedRating> {
        let natural_w2 = self.config.natural_w2();
        let mut rows: Vec<OrderedRating> = self
            .players
            .iter()
            .enumerate()
            .filter_map(|(player_id, player)| {
                if player.history.is_empty() {
                    return None;
                }
                let variances = if compact {
                    None
                } else {
                    Some(uncertainty::player_day_variances(
                        &self.players,
                        &self.games,
                        player_id,
                        natural_w2,
                    ))
                };

                let build_sample = |index: usize| {
                    let node = &player.history[index];
                    OrderedSample {
                        day: node.day,
                        elo: natural_to_elo(node.r),
                        uncertainty_elo: variances
                            .as_ref()
                            .map(|v| uncertainty::uncertainty_elo(v[index])),
                    }
                };

                let samples = if current {
                    vec![build_sample(player.history.len() - 1)]
                } else {
                    (0..player.history.len()).map(build_sample).collect()
                };

                Some(OrderedRating {
                    name: player.name.clone(),
                    samples,
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            b.latest()
                .elo
                .partial_cmp(&a.latest().elo)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        rows
    }

    /// Bradley–Terry win probabilities for a hypothetical future game, using each player's most
    /// recent rating (or 0 — the prior mean — for a name never seen) and `handicap_elo` added to
    /// white's effective strength (§4.1, §4.7). Always returns a complementary pair.
    pub fn probability_future_match(
        &self,
        black: &str,
        white: &str,
        handicap_elo: f64,
    ) -> (f64, f64) {
        let black_r = self.latest_rating_or_prior(black);
        let white_r = self.latest_rating_or_prior(white) + handicap_elo * NATURAL_PER_ELO;

        let p_black = win_probability(black_r.exp(), white_r.exp());
        (p_black, 1.0 - p_black)
    }

    fn latest_rating_or_prior(&self, name: &str) -> f64 {
        self.find_player(name)
            .and_then(|id| self.players[id].latest())
            .map(|node| node.r)
            .unwrap_or(0.0)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Builds a `Registry`, applying a configuration validated the same way `Config::new` does
/// (§6). `warn!` surfaces a fault before it is returned, matching the driver's own convention.
pub fn new_registry(w2: f64, uncased: bool) -> WhrResult<Registry> {
    let config = Config::new(w2, uncased).map_err(|err| {
        warn!("new_registry: rejected configuration: {err}");
        err
    })?;
    info!("new_registry: w2 = {w2} Elo^2/day, uncased = {uncased}");
    Ok(Registry::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_game_rejects_day_zero() {
        let mut registry = Registry::default();
        let result = registry.create_game("a", "b", Winner::Black, 0, 0.0);
        assert!(matches!(result, Err(WhrError::InputError(_))));
        assert_eq!(registry.player_count(), 0);
    }

    #[test]
    fn create_game_appends_and_links_both_sides() {
        let mut registry = Registry::default();
        registry
            .create_game("shusaku", "shusai", Winner::Black, 1, 0.0)
            .unwrap();
        assert_eq!(registry.player_count(), 2);
        assert_eq!(registry.game_count(), 1);
    }

    #[test]
    fn load_games_matches_explicit_create_game_calls() {
        let mut a = Registry::default();
        a.load_games(["A B B 1", "A B W 2 0"], ' ').unwrap();

        let mut b = Registry::default();
        b.create_game("A", "B", Winner::Black, 1, 0.0).unwrap();
        b.create_game("A", "B", Winner::White, 2, 0.0).unwrap();

        assert_eq!(a.player_count(), b.player_count());
        assert_eq!(a.game_count(), b.game_count());
    }

    #[test]
    fn load_games_rejects_bad_winner() {
        let mut registry = Registry::default();
        let result = registry.load_games(["A B X 1"], ' ');
        assert!(matches!(result, Err(WhrError::InputError(_))));
    }

    #[test]
    fn ratings_for_player_fails_for_unknown_name() {
        let registry = Registry::default();
        assert!(matches!(
            registry.ratings_for_player("ghost"),
            Err(WhrError::UnknownPlayer(_))
        ));
    }

    #[test]
    fn probability_future_match_is_one_half_for_unknown_players() {
        let registry = Registry::default();
        let (p_black, p_white) = registry.probability_future_match("ghost_a", "ghost_b", 0.0);
        assert!((p_black - 0.5).abs() < 1e-12);
        assert!((p_white - 0.5).abs() < 1e-12);
    }

    #[test]
    fn probability_future_match_is_complementary() {
        let mut registry = Registry::default();
        registry
            .create_game("shusaku", "shusai", Winner::Black, 1, 0.0)
            .unwrap();
        registry.iterate(20).unwrap();
        let (p_black, p_white) = registry.probability_future_match("shusaku", "shusai", 0.0);
        assert!((p_black + p_white - 1.0).abs() < 1e-12);

        let (p_white_swapped, p_black_swapped) =
            registry.probability_future_match("shusai", "shusaku", 0.0);
        assert!((p_black - p_black_swapped).abs() < 1e-9);
        assert!((p_white - p_white_swapped).abs() < 1e-9);
    }

    #[test]
    fn case_folding_merges_players_when_uncased() {
        let mut registry = new_registry(300.0, true).unwrap();
        registry.create_game("Shu", "X", Winner::Black, 1, 0.0).unwrap();
        registry.create_game("SHU", "X", Winner::White, 2, 0.0).unwrap();
        assert_eq!(registry.player_count(), 2);
        let samples = registry.ratings_for_player("shu").unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn get_ordered_ratings_breaks_ties_by_ascending_name() {
        let mut registry = Registry::default();
        registry.create_game("zeta", "alpha", Winner::Black, 1, 0.0).unwrap();
        // alpha and zeta have not been rated by any sweep, so both sit at Elo 0 — a tie.
        let rows = registry.get_ordered_ratings(true, true);
        assert_eq!(rows[0].name, "alpha");
        assert_eq!(rows[1].name, "zeta");
    }

    #[test]
    fn get_ordered_ratings_compact_omits_uncertainty() {
        let mut registry = Registry::default();
        registry.create_game("a", "b", Winner::Black, 1, 0.0).unwrap();
        registry.iterate(10).unwrap();
        let rows = registry.get_ordered_ratings(true, true);
        assert!(rows
            .iter()
            .all(|r| r.samples.iter().all(|s| s.uncertainty_elo.is_none())));
        let rows = registry.get_ordered_ratings(true, false);
        assert!(rows
            .iter()
            .all(|r| r.samples.iter().all(|s| s.uncertainty_elo.is_some())));
    }

    #[test]
    fn current_false_reports_the_full_history_current_true_reports_only_the_latest() {
        let mut registry = Registry::default();
        registry.create_game("a", "b", Winner::Black, 1, 0.0).unwrap();
        registry.create_game("a", "b", Winner::White, 2, 0.0).unwrap();
        registry.iterate(10).unwrap();

        let current = registry.get_ordered_ratings(true, true);
        let row = current.iter().find(|r| r.name == "a").unwrap();
        assert_eq!(row.samples.len(), 1);
        assert_eq!(row.samples[0].day, 2);

        let full = registry.get_ordered_ratings(false, true);
        let row = full.iter().find(|r| r.name == "a").unwrap();
        assert_eq!(row.samples.len(), 2);
        assert_eq!(row.samples[0].day, 1);
        assert_eq!(row.samples[1].day, 2);
    }
}
