//! The tridiagonal Newton solver (component C5) — the hardest subsystem. For one player, builds
//! the gradient and tridiagonal Hessian of the negative log posterior across their entire
//! history, solves for the Newton step, and applies it (§4.4).

use ndarray::Array1;

use crate::error::{WhrError, WhrResult};
use crate::game::{Color, Game};
use crate::numerics::{win_probability, MAX_NATURAL_RATING, MIN_VARIANCE_TERM, NATURAL_PER_ELO};
use crate::player::Player;
use crate::tridiag::LdlFactorization;

/// The effective precision `a_i = 1 / (ω² · Δd_i)` of the Wiener-prior edge between two
/// consecutive days `Δd_i` apart (§4.3).
pub fn edge_precision(natural_w2: f64, delta_days: u32) -> f64 {
    1.0 / (natural_w2 * delta_days as f64)
}

/// Sum of per-game gradient and Hessian-diagonal contributions for one player on one of their
/// `PlayerDay` nodes (§4.4). Reads opponents' current ratings via shared borrows only — this is
/// the read-only phase of the solver's two-phase borrow pattern.
pub fn likelihood_terms_for_day(
    players: &[Player],
    games: &[Game],
    player_id: usize,
    day_index: usize,
) -> (f64, f64) {
    let node = &players[player_id].history[day_index];

    let mut gradient = 0.0;
    let mut hessian = 0.0;

    for game_ref in &node.games {
        let game = &games[game_ref.game_index];
        let opponent_id = game.opponent(game_ref.color);
        let opponent_day_index = players[opponent_id]
            .day_index(game.day)
            .expect("every game referenced by a PlayerDay has a matching PlayerDay on the opponent's side for the same day");
        let opponent_r = players[opponent_id].history[opponent_day_index].r;

        let handicap_natural = game.handicap_elo * NATURAL_PER_ELO;
        let (gamma_self, gamma_opp) = match game_ref.color {
            // Handicap is an additive bonus to white's effective strength for this game (§4.1).
            Color::White => ((node.r + handicap_natural).exp(), opponent_r.exp()),
            Color::Black => (node.r.exp(), (opponent_r + handicap_natural).exp()),
        };

        let s = win_probability(gamma_self, gamma_opp);
        let outcome_win = game.player_won(game_ref.color);

        gradient += s - if outcome_win { 1.0 } else { 0.0 };
        hessian += (s * (1.0 - s)).max(MIN_VARIANCE_TERM);
    }

    (gradient, hessian)
}

/// Assembles the tridiagonal `(diagonal, off_diagonal, gradient)` triple for one player's entire
/// history: likelihood terms per day, plus the Wiener-prior coupling between consecutive days
/// (§4.3–§4.4). A single-day history naturally yields an empty off-diagonal and a 1×1 system —
/// no special case is needed.
fn assemble_tridiagonal(
    players: &[Player],
    games: &[Game],
    player_id: usize,
    natural_w2: f64,
) -> (Array1<f64>, Array1<f64>, Array1<f64>) {
    let history = &players[player_id].history;
    let n = history.len();

    let mut diag = Array1::zeros(n);
    let mut grad = Array1::zeros(n);
    for day_index in 0..n {
        let (g, h) = likelihood_terms_for_day(players, games, player_id, day_index);
        grad[day_index] = g;
        diag[day_index] = h;
    }

    let mut off = Array1::zeros(n.saturating_sub(1));
    for i in 0..n.saturating_sub(1) {
        let delta_days = history[i + 1].day - history[i].day;
        let a = edge_precision(natural_w2, delta_days);
        off[i] = -a;
        diag[i] += a;
        diag[i + 1] += a;
        let r_i = history[i].r;
        let r_next = history[i + 1].r;
        grad[i] += a * (r_i - r_next);
        grad[i + 1] += a * (r_next - r_i);
    }

    (diag, off, grad)
}

/// Runs one Newton update for a single player: build terms, factor, solve, apply. Returns the
/// largest absolute rating change across that player's history, for convergence tracking.
///
/// Two-phase borrow: term assembly above only needs shared access to `players` (including
/// `player_id`'s own history, read alongside everyone else's); the mutable borrow below is
/// scoped to just `player_id`'s nodes, so the two never overlap.
pub fn solve_player(
    players: &mut [Player],
    games: &[Game],
    player_id: usize,
    natural_w2: f64,
) -> WhrResult<f64> {
    let n = players[player_id].history.len();
    if n == 0 {
        return Ok(0.0);
    }

    let (diag, off, grad) = assemble_tridiagonal(players, games, player_id, natural_w2);
    let factorization = LdlFactorization::factor(&diag, &off);
    let delta = factorization.solve(&grad);

    let mut max_abs_delta = 0.0_f64;
    for (day_index, node) in players[player_id].history.iter_mut().enumerate() {
        node.r -= delta[day_index];
        max_abs_delta = max_abs_delta.max(delta[day_index].abs());
        if node.r.abs() > MAX_NATURAL_RATING {
            return Err(WhrError::NumericalFault {
                value: node.r,
                bound: MAX_NATURAL_RATING,
            });
        }
    }

    Ok(max_abs_delta)
}
