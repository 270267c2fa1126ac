use std::time::Duration;

use rand::Rng;

use crate::config::LatencyConfig;

/// Emulates a network round-trip for each backend operation.
#[derive(Debug, Clone)]
pub struct LatencySimulator {
    config: LatencyConfig,
}

impl LatencySimulator {
    pub fn new(config: LatencyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LatencyConfig {
        &self.config
    }

    /// Uniform draw from `[min_latency, max_latency]`.
    pub fn next_delay(&self) -> Duration {
        let min = self.config.min_latency.as_millis() as u64;
        let max = self.config.max_latency.as_millis() as u64;
        if max <= min {
            return self.config.min_latency;
        }
        Duration::from_millis(rand::rng().random_range(min..=max))
    }

    /// Whether the current operation should be rejected.
    pub fn should_fail(&self) -> bool {
        let rate = self.config.failure_rate.clamp(0.0, 1.0);
        rate > 0.0 && rand::rng().random_bool(rate)
    }

    /// Suspend for one simulated round-trip. Always yields at least once.
    pub async fn round_trip(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
    }
}
