use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::report::Sampling;

/// Dataset location.
pub const DATA_PATH_VAR: &str = "HOTEL_INSIGHTS_DATA";
/// Seed of the lead-time / ADR sample.
pub const SAMPLE_SEED_VAR: &str = "HOTEL_INSIGHTS_SAMPLE_SEED";
/// Used when `HOTEL_INSIGHTS_DATA` is unset.
pub const DEFAULT_DATA_PATH: &str = "hotel_booking_cleaned.csv";

// ---------------------------------------------------------------------------
// Process configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
    pub sampling: Sampling,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            sampling: Sampling::default(),
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup; unset keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();
        if let Some(path) = lookup(DATA_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(seed) = lookup(SAMPLE_SEED_VAR) {
            config.sampling.seed = seed
                .trim()
                .parse()
                .with_context(|| format!("{SAMPLE_SEED_VAR}={seed:?} is not an unsigned integer"))?;
        }
        Ok(config)
    }
}
