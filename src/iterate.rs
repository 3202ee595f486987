//! The iteration driver (component C6): sweeps every player once per round, and auto-iterates
//! in batches to a convergence precision or a wall-clock budget (§4.5, §5).

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::error::WhrResult;
use crate::game::Game;
use crate::player::Player;
use crate::solver::solve_player;

/// Runs `sweeps` full Gauss–Seidel sweeps over every player, in registry (insertion) order —
/// the fixed, stable order §4.5 requires for debuggability. Each player's Newton update reads
/// opponents' ratings as written by everyone earlier in the same sweep and by all prior sweeps.
///
/// Returns the largest absolute rating change observed across all sweeps.
pub fn iterate(players: &mut [Player], games: &[Game], natural_w2: f64, sweeps: u32) -> WhrResult<f64> {
    let mut max_abs_delta = 0.0_f64;
    for _ in 0..sweeps {
        for player_id in 0..players.len() {
            let delta = solve_player(players, games, player_id, natural_w2).map_err(|err| {
                warn!("iterate: player {player_id} triggered a numerical fault: {err}");
                err
            })?;
            max_abs_delta = max_abs_delta.max(delta);
        }
    }
    Ok(max_abs_delta)
}

/// Whether `auto_iterate` reached its precision target or exhausted its time budget first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    Converged,
    TimedOut,
}

impl Convergence {
    pub fn converged(self) -> bool {
        matches!(self, Convergence::Converged)
    }
}

/// Repeatedly runs `iterate(batch_size)` until the convergence metric (max |Δr| observed in the
/// most recent batch) drops to `precision` or `time_limit` elapses (§4.5). `time_limit = None`
/// means no wall-clock bound — the caller is trusting the model's convexity to terminate.
///
/// Wall-clock is checked only at batch boundaries: an overrun of up to `batch_size` sweeps past
/// the deadline is the intentional cost of not calling a clock syscall inside the hot loop (§5).
pub fn auto_iterate(
    players: &mut [Player],
    games: &[Game],
    natural_w2: f64,
    time_limit: Option<Duration>,
    precision: f64,
    batch_size: u32,
) -> WhrResult<Convergence> {
    let start = Instant::now();
    let mut batches = 0_u64;
    loop {
        let metric = iterate(players, games, natural_w2, batch_size)?;
        batches += 1;
        debug!(
            "auto_iterate: batch {batches} ({batch_size} sweeps each) complete, max |Δr| = {metric:.6}"
        );

        if metric <= precision {
            info!(
                "auto_iterate: converged after {batches} batch(es), max |Δr| = {metric:.6} <= {precision}"
            );
            return Ok(Convergence::Converged);
        }

        if let Some(limit) = time_limit {
            if start.elapsed() >= limit {
                info!(
                    "auto_iterate: time budget of {limit:?} exhausted after {batches} batch(es), max |Δr| = {metric:.6}"
                );
                return Ok(Convergence::TimedOut);
            }
        }
    }
}
