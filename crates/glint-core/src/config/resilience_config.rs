use serde::{Deserialize, Serialize};

use super::defaults;

/// Retry, timeout, and circuit-breaker configuration for the remote tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Total attempts per request, the first call included.
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles for each retry after that.
    pub initial_backoff_ms: u64,
    /// Hard deadline for a single classifier call.
    pub call_timeout_ms: u64,
    /// Failure ratio above which the breaker opens.
    pub failure_ratio: f64,
    /// Length of the rolling window the ratio is computed over.
    pub sample_window_secs: u64,
    /// Minimum samples in the window before the breaker may open.
    pub min_samples: usize,
    /// How long an open breaker refuses calls before a half-open trial.
    pub open_duration_secs: u64,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::DEFAULT_MAX_ATTEMPTS,
            initial_backoff_ms: defaults::DEFAULT_INITIAL_BACKOFF_MS,
            call_timeout_ms: defaults::DEFAULT_CALL_TIMEOUT_MS,
            failure_ratio: defaults::DEFAULT_FAILURE_RATIO,
            sample_window_secs: defaults::DEFAULT_SAMPLE_WINDOW_SECS,
            min_samples: defaults::DEFAULT_MIN_SAMPLES,
            open_duration_secs: defaults::DEFAULT_OPEN_DURATION_SECS,
        }
    }
}
