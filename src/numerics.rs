//! Stable numeric primitives shared across the rating engine (component C1).

/// Natural-rating → Elo conversion factor: `Elo = r * ELO_PER_NATURAL`.
pub const ELO_PER_NATURAL: f64 = 400.0 / std::f64::consts::LN_10;

/// Elo → natural-rating conversion factor: `r = elo * NATURAL_PER_ELO`.
pub const NATURAL_PER_ELO: f64 = std::f64::consts::LN_10 / 400.0;

/// Floor on `s(1-s)` in the Hessian diagonal; keeps a player's tridiagonal system strictly
/// positive definite even when a day's games are all against equal-strength opponents with a
/// saturated outcome (spec edge case 3).
pub const MIN_VARIANCE_TERM: f64 = 1e-12;

/// Natural-rating sanity bound beyond which a sweep reports a numerical fault (~8700 Elo).
pub const MAX_NATURAL_RATING: f64 = 50.0;

/// Numerically stable logistic function: branches on the sign of `x` so the exponential argument
/// never overflows, and the result is well-defined (never NaN) for any finite or infinite `x`.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

pub fn elo_to_natural(elo: f64) -> f64 {
    elo * NATURAL_PER_ELO
}

pub fn natural_to_elo(r: f64) -> f64 {
    r * ELO_PER_NATURAL
}

/// Bradley–Terry win probability of a player with strength `gamma_self` against `gamma_opp`,
/// both already expressed as `exp(r)` with any handicap folded in.
///
/// The `0/0` that would otherwise arise when both strengths underflow to zero (deeply negative
/// ratings) is clamped to the uninformative `0.5` rather than propagating a NaN into the solver.
pub fn win_probability(gamma_self: f64, gamma_opp: f64) -> f64 {
    let denom = gamma_self + gamma_opp;
    if denom <= 0.0 || !denom.is_finite() {
        return if gamma_self.is_infinite() && gamma_opp.is_finite() {
            1.0
        } else if gamma_opp.is_infinite() && gamma_self.is_finite() {
            0.0
        } else {
            0.5
        };
    }
    gamma_self / denom
}
