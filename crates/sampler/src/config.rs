#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::draw::{ConfiguredDraws, ReseedingDraws, SeededDraws};

/// Batch size from which `Sampler` switches to the rayon path.
pub const DEFAULT_PARALLEL_MIN_ROWS: usize = 1024;

/// Fixed seed for reproducible runs.
pub const ENV_SEED: &str = "SAMPLING_ID_SEED";
/// `1`/`true` to reseed from entropy on every draw.
pub const ENV_RESEED: &str = "SAMPLING_ID_RESEED";
/// Override for `parallel_min_rows`.
pub const ENV_PARALLEL_MIN_ROWS: &str = "SAMPLING_ID_PARALLEL_MIN_ROWS";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON did not match `SamplerConfig`.
    #[error("invalid sampler config: {0}")]
    Json(#[from] serde_json::Error),
    /// An environment variable held an unusable value.
    #[error("invalid value {value:?} for {key}")]
    Env {
        /// variable name
        key: &'static str,
        /// offending value
        value: String,
    },
    /// A fixed seed and per-draw reseeding were both requested.
    #[error("SAMPLING_ID_SEED and SAMPLING_ID_RESEED are mutually exclusive")]
    ConflictingStrategy,
}

/// How thresholds are generated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawStrategy {
    /// One ChaCha8 generator seeded with `seed`.
    Seeded {
        /// generator seed
        seed: u64,
    },
    /// One ChaCha8 generator seeded from OS entropy.
    #[default]
    Entropy,
    /// A fresh entropy-seeded generator per draw.
    Reseed,
}

impl DrawStrategy {
    /// Construct the draw source for this strategy.
    pub fn build(&self) -> ConfiguredDraws {
        match *self {
            DrawStrategy::Seeded { seed } => ConfiguredDraws::Seeded(SeededDraws::from_seed(seed)),
            DrawStrategy::Entropy => ConfiguredDraws::Seeded(SeededDraws::from_entropy()),
            DrawStrategy::Reseed => ConfiguredDraws::Reseeding(ReseedingDraws),
        }
    }
}

/// Sampler configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// threshold generator
    pub strategy: DrawStrategy,
    /// batches with at least this many rows are sampled on the rayon pool
    pub parallel_min_rows: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            strategy: DrawStrategy::default(),
            parallel_min_rows: DEFAULT_PARALLEL_MIN_ROWS,
        }
    }
}

impl SamplerConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read `SAMPLING_ID_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with variables supplied by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        let seed = match lookup(ENV_SEED) {
            Some(v) => Some(v.trim().parse::<u64>().map_err(|_| ConfigError::Env {
                key: ENV_SEED,
                value: v,
            })?),
            None => None,
        };
        let reseed = match lookup(ENV_RESEED) {
            Some(v) => parse_flag(&v).ok_or(ConfigError::Env {
                key: ENV_RESEED,
                value: v,
            })?,
            None => false,
        };
        cfg.strategy = match (seed, reseed) {
            (Some(_), true) => return Err(ConfigError::ConflictingStrategy),
            (Some(seed), false) => DrawStrategy::Seeded { seed },
            (None, true) => DrawStrategy::Reseed,
            (None, false) => DrawStrategy::Entropy,
        };

        if let Some(v) = lookup(ENV_PARALLEL_MIN_ROWS) {
            cfg.parallel_min_rows = v.trim().parse().map_err(|_| ConfigError::Env {
                key: ENV_PARALLEL_MIN_ROWS,
                value: v,
            })?;
        }
        Ok(cfg)
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = SamplerConfig::default();
        assert_eq!(cfg.strategy, DrawStrategy::Entropy);
        assert_eq!(cfg.parallel_min_rows, DEFAULT_PARALLEL_MIN_ROWS);
    }

    #[test]
    fn json_with_missing_fields_uses_defaults() {
        let cfg = SamplerConfig::from_json(r#"{"parallel_min_rows": 8}"#).unwrap();
        assert_eq!(cfg.strategy, DrawStrategy::Entropy);
        assert_eq!(cfg.parallel_min_rows, 8);

        let cfg = SamplerConfig::from_json(r#"{"strategy": "reseed"}"#).unwrap();
        assert_eq!(cfg.strategy, DrawStrategy::Reseed);
    }

    #[test]
    fn json_seeded_strategy() {
        let cfg = SamplerConfig::from_json(r#"{"strategy": {"seeded": {"seed": 42}}}"#).unwrap();
        assert_eq!(cfg.strategy, DrawStrategy::Seeded { seed: 42 });
    }

    #[test]
    fn json_errors_are_reported() {
        let err = SamplerConfig::from_json(r#"{"strategy": "sometimes"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn env_seed_and_threshold() {
        let cfg = SamplerConfig::from_lookup(lookup(&[
            (ENV_SEED, "17"),
            (ENV_PARALLEL_MIN_ROWS, " 64 "),
        ]))
        .unwrap();
        assert_eq!(cfg.strategy, DrawStrategy::Seeded { seed: 17 });
        assert_eq!(cfg.parallel_min_rows, 64);
    }

    #[test]
    fn env_reseed_flag() {
        let cfg = SamplerConfig::from_lookup(lookup(&[(ENV_RESEED, "true")])).unwrap();
        assert_eq!(cfg.strategy, DrawStrategy::Reseed);
        let cfg = SamplerConfig::from_lookup(lookup(&[(ENV_RESEED, "0")])).unwrap();
        assert_eq!(cfg.strategy, DrawStrategy::Entropy);
    }

    #[test]
    fn env_bad_values_rejected() {
        let err = SamplerConfig::from_lookup(lookup(&[(ENV_SEED, "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: ENV_SEED, .. }));
        let err = SamplerConfig::from_lookup(lookup(&[(ENV_RESEED, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: ENV_RESEED, .. }));
        let err = SamplerConfig::from_lookup(lookup(&[(ENV_SEED, "1"), (ENV_RESEED, "1")])).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingStrategy));
    }

    #[test]
    fn seeded_strategy_builds_reproducible_source() {
        use crate::draw::DrawSource;
        let strategy = DrawStrategy::Seeded { seed: 3 };
        let mut a = strategy.build();
        let mut b = strategy.build();
        assert_eq!(a.next_draw(), b.next_draw());
        assert!(matches!(DrawStrategy::Reseed.build(), ConfiguredDraws::Reseeding(_)));
    }
}
