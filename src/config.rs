//! Fixed configuration record (component C11), replacing the "dynamic configuration dictionary"
//! the distilled source used — see the redesign note in §9 of SPEC_FULL.md.

use serde::{Deserialize, Serialize};

use crate::error::{WhrError, WhrResult};
use crate::numerics::NATURAL_PER_ELO;

/// Default per-day rating-variance anchor, in Elo² units, matching the historical WHR reference
/// implementations this model is distilled from.
pub const DEFAULT_W2: f64 = 300.0;

/// The finite, recognized set of options a [`crate::Registry`] can be constructed with (§6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rating-variance-per-day anchor, in Elo² units.
    pub w2: f64,
    /// When true, player-name lookup folds case.
    pub uncased: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            w2: DEFAULT_W2,
            uncased: false,
        }
    }
}

impl Config {
    /// Builds a validated `Config`. `w2` must be a positive, finite number.
    pub fn new(w2: f64, uncased: bool) -> WhrResult<Self> {
        if !w2.is_finite() || w2 <= 0.0 {
            return Err(WhrError::InputError(format!(
                "w2 must be a positive finite number, got {w2}"
            )));
        }
        Ok(Self { w2, uncased })
    }

    /// Builds a `Config` from key/value pairs, as a loader reading a text config file might.
    /// An unrecognized key is an `InputError` rather than being silently ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> WhrResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Config::default();
        for (key, value) in pairs {
            match key {
                "w2" => {
                    let parsed: f64 = value
                        .parse()
                        .map_err(|_| WhrError::InputError(format!("invalid w2 value: {value}")))?;
                    config = Config::new(parsed, config.uncased)?;
                }
                "uncased" => {
                    let parsed: bool = value.parse().map_err(|_| {
                        WhrError::InputError(format!("invalid uncased value: {value}"))
                    })?;
                    config.uncased = parsed;
                }
                other => {
                    return Err(WhrError::InputError(format!(
                        "unrecognized configuration key: {other}"
                    )));
                }
            }
        }
        Ok(config)
    }

    /// The Wiener-prior per-day variance, converted from the configured Elo² anchor to the
    /// natural-rating scale used internally: `w2_natural = w2_elo * (ln(10)/400)^2`.
    pub fn natural_w2(&self) -> f64 {
        self.w2 * NATURAL_PER_ELO.powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec() {
        let config = Config::default();
        assert_eq!(config.w2, 300.0);
        assert!(!config.uncased);
    }

    #[test]
    fn rejects_non_positive_w2() {
        assert!(Config::new(0.0, false).is_err());
        assert!(Config::new(-5.0, false).is_err());
        assert!(Config::new(f64::NAN, false).is_err());
    }

    #[test]
    fn from_pairs_rejects_unknown_key() {
        let result = Config::from_pairs([("bogus", "1")]);
        assert!(matches!(result, Err(WhrError::InputError(_))));
    }

    #[test]
    fn from_pairs_parses_recognized_keys() {
        let config = Config::from_pairs([("w2", "400"), ("uncased", "true")]).unwrap();
        assert_eq!(config.w2, 400.0);
        assert!(config.uncased);
    }

    #[test]
    fn natural_w2_is_scaled_by_elo_to_natural_factor_squared() {
        let config = Config::default();
        let expected = 300.0 * NATURAL_PER_ELO.powi(2);
        assert!((config.natural_w2() - expected).abs() < 1e-15);
    }
}
