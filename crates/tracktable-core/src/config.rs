//! Table configuration that downstream crates can serialize/deserialize.
//!
//! Precedence, lowest first: [`TableConfig::default`], environment variables
//! ([`TableConfig::from_env`]), a config file merged by the caller, then
//! command-line flags.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::query::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page when a request does not say.
    pub default_page_size: usize,

    /// Artificial latency added by the service wrapper before each fetch.
    pub latency_ms: u64,

    /// Probability in [0, 1] that a simulated fetch fails as unavailable.
    pub failure_rate: f64,

    /// Optional seed for the failure injector; unseeded runs use entropy.
    pub seed: Option<u64>,

    /// Retries after the first failed fetch.
    pub retry_attempts: usize,

    /// Fixed delay between retries.
    pub retry_delay_ms: u64,

    /// Debounce hint for UI collaborators issuing search/filter queries.
    pub debounce_ms: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            latency_ms: 1_800,
            failure_rate: 0.0,
            seed: None,
            retry_attempts: 2,
            retry_delay_ms: 1_000,
            debounce_ms: 300,
        }
    }
}

impl TableConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TRACKTABLE_PAGE_SIZE`: default page size
    /// - `TRACKTABLE_LATENCY_MS`: simulated latency
    /// - `TRACKTABLE_FAILURE_RATE`: simulated failure probability
    /// - `TRACKTABLE_SEED`: failure injector seed
    /// - `TRACKTABLE_RETRY_ATTEMPTS`: retries after a failed fetch
    /// - `TRACKTABLE_RETRY_DELAY_MS`: delay between retries
    /// - `TRACKTABLE_DEBOUNCE_MS`: debounce hint
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`TableConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("TRACKTABLE_PAGE_SIZE").and_then(|s| s.parse().ok()) {
            cfg.default_page_size = v;
        }
        if let Some(v) = lookup("TRACKTABLE_LATENCY_MS").and_then(|s| s.parse().ok()) {
            cfg.latency_ms = v;
        }
        if let Some(v) = lookup("TRACKTABLE_FAILURE_RATE").and_then(|s| s.parse().ok()) {
            cfg.failure_rate = v;
        }
        if let Some(v) = lookup("TRACKTABLE_SEED").and_then(|s| s.parse().ok()) {
            cfg.seed = Some(v);
        }
        if let Some(v) = lookup("TRACKTABLE_RETRY_ATTEMPTS").and_then(|s| s.parse().ok()) {
            cfg.retry_attempts = v;
        }
        if let Some(v) = lookup("TRACKTABLE_RETRY_DELAY_MS").and_then(|s| s.parse().ok()) {
            cfg.retry_delay_ms = v;
        }
        if let Some(v) = lookup("TRACKTABLE_DEBOUNCE_MS").and_then(|s| s.parse().ok()) {
            cfg.debounce_ms = v;
        }

        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(Error::Config("default_page_size must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(Error::Config(format!(
                "failure_rate must be within [0, 1], got {}",
                self.failure_rate
            )));
        }
        Ok(())
    }
}
