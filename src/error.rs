//! Single error sum type for the crate (component C9, §7), replacing any exception-driven
//! control flow the distilled source relied on.

use thiserror::Error;

/// Everything that can go wrong at the crate's public boundary.
#[derive(Debug, Error)]
pub enum WhrError {
    /// A malformed game, line, or configuration value. The offending operation is rejected and
    /// nothing is mutated.
    #[error("invalid input: {0}")]
    InputError(String),

    /// A query referenced a player name not present in the registry.
    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    /// A sweep pushed a rating past the sanity bound; iteration halts rather than continuing on
    /// corrupted state.
    #[error("numerical fault: rating magnitude {value} exceeded sanity bound {bound}")]
    NumericalFault { value: f64, bound: f64 },

    /// A persistence round-trip detected a format mismatch or truncated/corrupt stream.
    #[error("persistence error: {0}")]
    PersistenceError(String),
}

pub type WhrResult<T> = Result<T, WhrError>;
