//! Randomized pacing between actions and wallets

use crate::config::SleepRange;
use rand::Rng;
use std::time::Duration;

/// Sample a delay uniformly from `range`
///
/// Values outside what a `Duration` can hold saturate rather than panic.
pub fn sample_delay(range: &SleepRange) -> Duration {
    let sampleable =
        range.min_secs.is_finite() && range.max_secs.is_finite() && range.max_secs > range.min_secs;
    let secs = if sampleable {
        rand::thread_rng().gen_range(range.min_secs..=range.max_secs)
    } else {
        range.min_secs
    };
    to_duration(secs)
}

fn to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Sleep for a random delay drawn from `range`
pub async fn pause(range: &SleepRange) {
    let delay = sample_delay(range);
    if delay.is_zero() {
        return;
    }
    tracing::info!(seconds = delay.as_secs_f64(), "Sleeping");
    tokio::time::sleep(delay).await;
}
