//! Laplace-approximation uncertainty computer (component C7). Reuses the same tridiagonal
//! assembly as the solver — the diagonal of `H⁻¹` is computed from the same factorization, not
//! cached between calls (§4.6).

use ndarray::Array1;

use crate::game::Game;
use crate::numerics::ELO_PER_NATURAL;
use crate::player::Player;
use crate::solver::likelihood_terms_for_day;
use crate::tridiag::LdlFactorization;

/// The natural-scale rating variance at every `PlayerDay` of one player, freshly recomputed from
/// their current ratings and the current ratings of everyone they played.
pub fn player_day_variances(
    players: &[Player],
    games: &[Game],
    player_id: usize,
    natural_w2: f64,
) -> Array1<f64> {
    let history = &players[player_id].history;
    let n = history.len();

    let mut diag = Array1::zeros(n);
    for day_index in 0..n {
        let (_g, h) = likelihood_terms_for_day(players, games, player_id, day_index);
        diag[day_index] = h;
    }

    let mut off = Array1::zeros(n.saturating_sub(1));
    for i in 0..n.saturating_sub(1) {
        let delta_days = history[i + 1].day - history[i].day;
        let a = crate::solver::edge_precision(natural_w2, delta_days);
        off[i] = -a;
        diag[i] += a;
        diag[i + 1] += a;
    }

    LdlFactorization::factor(&diag, &off).diagonal_variances()
}

/// Converts a natural-scale variance to an Elo-scale standard deviation.
pub fn uncertainty_elo(natural_variance: f64) -> f64 {
    natural_variance.max(0.0).sqrt() * ELO_PER_NATURAL
}
