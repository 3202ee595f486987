//! Whole-History Rating: a Bayesian dynamic rating model in which each player's skill is a
//! latent time series and observed games provide Bradley–Terry likelihood evidence (§1).
//!
//! The crate is library-only — no CLI surface (§6). A caller builds a [`Registry`], feeds it
//! dated game results via [`Registry::create_game`] or [`Registry::load_games`], runs
//! [`Registry::iterate`] or [`Registry::auto_iterate`] to convergence, then queries ratings,
//! uncertainty, and future-match probabilities.

pub mod config;
pub mod error;
pub mod game;
pub mod iterate;
pub mod numerics;
pub mod persistence;
pub mod player;
pub mod registry;
pub mod solver;
pub mod tridiag;
pub mod uncertainty;

pub use config::Config;
pub use error::{WhrError, WhrResult};
pub use game::{Color, Game, PlayerId, Winner};
pub use iterate::Convergence;
pub use player::{Player, PlayerDay};
pub use registry::{new_registry, OrderedRating, OrderedSample, RatingSample, Registry};
