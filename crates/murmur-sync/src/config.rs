use std::str::FromStr;
use std::time::Duration;

use murmur_store::StoreConfig;

use crate::error::ConfigError;

/// Simulated network characteristics.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyConfig {
    pub min_latency: Duration,
    pub max_latency: Duration,
    /// Probability in `[0, 1]` that an operation is rejected.
    pub failure_rate: f64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            min_latency: Duration::from_millis(250),
            max_latency: Duration::from_millis(750),
            failure_rate: 0.0,
        }
    }
}

impl LatencyConfig {
    /// No delay and no failures.
    pub fn instant() -> Self {
        Self {
            min_latency: Duration::ZERO,
            max_latency: Duration::ZERO,
            failure_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulatorConfig {
    pub store: StoreConfig,
    pub latency: LatencyConfig,
}

impl SimulatorConfig {
    /// Read `MURMUR_*` variables from the process environment.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse::<u64, _>(&lookup, "MURMUR_MIN_LATENCY_MS")? {
            config.latency.min_latency = Duration::from_millis(ms);
        }
        if let Some(ms) = parse::<u64, _>(&lookup, "MURMUR_MAX_LATENCY_MS")? {
            config.latency.max_latency = Duration::from_millis(ms);
        }
        if let Some(rate) = parse(&lookup, "MURMUR_FAILURE_RATE")? {
            config.latency.failure_rate = rate;
        }
        if let Some(size) = parse(&lookup, "MURMUR_MAX_PAGE_SIZE")? {
            config.store.max_page_size = size;
        }
        if let Some(factor) = parse(&lookup, "MURMUR_OVERSIZE_FACTOR")? {
            config.store.oversize_factor = factor;
        }
        if let Some(seed) = parse(&lookup, "MURMUR_SEED")? {
            config.store.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.latency.max_latency < self.latency.min_latency {
            return Err(ConfigError::OutOfRange {
                var: "MURMUR_MAX_LATENCY_MS",
                reason: "must not be below the minimum latency",
            });
        }
        if !(0.0..=1.0).contains(&self.latency.failure_rate) {
            return Err(ConfigError::OutOfRange {
                var: "MURMUR_FAILURE_RATE",
                reason: "must be between 0 and 1",
            });
        }
        if self.store.max_page_size == 0 {
            return Err(ConfigError::OutOfRange {
                var: "MURMUR_MAX_PAGE_SIZE",
                reason: "must be at least 1",
            });
        }
        if self.store.oversize_factor == 0 {
            return Err(ConfigError::OutOfRange {
                var: "MURMUR_OVERSIZE_FACTOR",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

fn parse<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
