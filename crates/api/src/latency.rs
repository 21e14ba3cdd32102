//! Simulated network latency.

use std::time::Duration;

use rand::Rng;

use crate::config::LatencyConfig;

/// Pick a delay uniformly from `[min, max]`.
#[must_use]
pub fn pick_delay(range: LatencyConfig) -> Duration {
    if range.max <= range.min {
        return range.min;
    }
    rand::rng().random_range(range.min..=range.max)
}

/// Sleep for a random delay within `range`.
pub async fn simulate_latency(range: LatencyConfig) {
    let delay = pick_delay(range);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
