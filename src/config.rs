//! Seed values and animation timings, loadable from TOML.
//!
//! Every section uses `#[serde(default)]`, so a file only needs the keys it overrides:
//!
//! ```
//! use bst_viz::Config;
//!
//! let config = Config::from_toml_str("[animation]\nspeed_ms = 250\n").unwrap();
//!
//! assert_eq!(config.animation.speed_ms, 250);
//! assert_eq!(config.seed.len(), 15);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Values inserted, in this order, when a session starts.
pub const DEFAULT_SEED: [i64; 15] = [50, 25, 75, 15, 35, 65, 85, 10, 20, 30, 40, 60, 70, 80, 90];

/// Everything a session can be configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Values inserted, in order, when a session starts.
    pub seed: Vec<i64>,
    /// Playback pacing.
    pub animation: AnimationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_vec(),
            animation: AnimationConfig::default(),
        }
    }
}

impl Config {
    /// Load a config from a TOML file. Missing keys use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.animation.validate()
    }
}

/// Pacing of the animations. All durations are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Traversal step length, also the length of each traversal edge transition.
    pub speed_ms: u64,
    /// Search steps last `speed_ms / search_speedup`.
    pub search_speedup: f64,
    /// Search edge transitions last `speed_ms / search_edge_speedup`.
    pub search_edge_speedup: f64,
    /// How long a finished search path stays up before being cleared.
    pub search_linger_ms: u64,
    /// How long a freshly inserted node is flashed.
    pub flash_ms: u64,
    /// Auto-advance interval of stepped playback.
    pub stepper_interval_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed_ms: 1000,
            search_speedup: 1.1,
            search_edge_speedup: 1.2,
            search_linger_ms: 900,
            flash_ms: 800,
            stepper_interval_ms: 1000,
        }
    }
}

impl AnimationConfig {
    /// Length of one traversal step and of its edge transition.
    pub fn traversal_step(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    /// Length of one search step. Falls back to the traversal step if the speedup puts it out of
    /// range, which [`AnimationConfig::validate`] rejects.
    pub fn search_step(&self) -> Duration {
        scale(self.traversal_step(), self.search_speedup.recip())
            .unwrap_or_else(|| self.traversal_step())
    }

    /// Length of one search edge transition, with the same fallback as
    /// [`AnimationConfig::search_step`].
    pub fn search_edge(&self) -> Duration {
        scale(self.traversal_step(), self.search_edge_speedup.recip())
            .unwrap_or_else(|| self.traversal_step())
    }

    /// Ratio of a search edge transition to a search step.
    pub fn search_edge_ratio(&self) -> f64 {
        self.search_speedup / self.search_edge_speedup
    }

    /// How long a finished search path stays up.
    pub fn search_linger(&self) -> Duration {
        Duration::from_millis(self.search_linger_ms)
    }

    /// How long an inserted node stays flashed.
    pub fn flash(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }

    /// Auto-advance interval of stepped playback.
    pub fn stepper_interval(&self) -> Duration {
        Duration::from_millis(self.stepper_interval_ms)
    }

    /// Checks that both speedups are positive and give search timings a [`Duration`] can hold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, factor) in [
            ("search_speedup", self.search_speedup),
            ("search_edge_speedup", self.search_edge_speedup),
        ] {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {factor}"
                )));
            }
            if scale(self.traversal_step(), factor.recip()).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "{name} = {factor} puts speed_ms / {name} out of range"
                )));
            }
        }
        if scale(self.search_step(), self.search_edge_ratio()).is_none() {
            return Err(ConfigError::Invalid(format!(
                "search_speedup / search_edge_speedup = {} is out of range",
                self.search_edge_ratio()
            )));
        }
        Ok(())
    }
}

/// `base * factor`, or `None` when the result is negative, not a number or too long.
pub(crate) fn scale(base: Duration, factor: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(base.as_secs_f64() * factor).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.animation.traversal_step(), Duration::from_millis(1000));
        assert_eq!(
            config.animation.search_step().as_micros(),
            Duration::from_millis(1000).div_f64(1.1).as_micros()
        );
        assert_eq!(config.animation.search_linger(), Duration::from_millis(900));
        assert_eq!(config.animation.flash(), Duration::from_millis(800));
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml_str("seed = [3, 1, 2]\n").unwrap();

        assert_eq!(config.seed, [3, 1, 2]);
        assert_eq!(config.animation, AnimationConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_rejects_non_positive_speedup() {
        let err = Config::from_toml_str("[animation]\nsearch_speedup = 0.0\n").unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_speedup_that_overflows() {
        for toml in [
            "[animation]\nsearch_edge_speedup = 1e-300\n",
            "[animation]\nsearch_speedup = 1e-300\n",
        ] {
            let err = Config::from_toml_str(toml).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{toml}");
        }
    }

    #[test]
    fn test_unchecked_speedup_falls_back() {
        let animation = AnimationConfig {
            search_speedup: 1e-300,
            search_edge_speedup: f64::NAN,
            ..AnimationConfig::default()
        };

        assert!(animation.validate().is_err());
        assert_eq!(animation.search_step(), animation.traversal_step());
        assert_eq!(animation.search_edge(), animation.traversal_step());
    }

    #[test]
    fn test_search_edge_length() {
        let animation = AnimationConfig::default();

        assert_eq!(animation.search_edge().as_millis(), 833);
    }

    #[test]
    fn test_rejects_bad_toml() {
        let err = Config::from_toml_str("seed = \"fifty\"").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let mut config = Config::default();
        config.animation.speed_ms = 400;
        let text = toml::to_string(&config).unwrap();

        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
