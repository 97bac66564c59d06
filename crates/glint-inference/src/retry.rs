//! Bounded retry with exponential backoff for transient failures.

use std::future::Future;
use std::time::Duration;

use glint_core::config::ResilienceConfig;
use glint_core::errors::{GlintError, GlintResult};
use tracing::{debug, warn};

/// Run `call` up to `config.max_attempts` times.
///
/// Only transient errors are retried; anything else, a circuit-open
/// error included, returns immediately. The backoff starts at
/// `initial_backoff_ms` and doubles per retry.
pub async fn with_retry<T, F, Fut>(
    config: &ResilienceConfig,
    operation: &str,
    mut call: F,
) -> GlintResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = GlintResult<T>>,
{
    let mut backoff = Duration::from_millis(config.initial_backoff_ms);
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match call().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation, attempt, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if e.is_transient() && attempt < config.max_attempts => {
                warn!(
                    operation,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "transient failure, backing off"
                );
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2);
            }
            Err(e) => {
                report_final(operation, attempt, &e);
                return Err(e);
            }
        }
    }
}

fn report_final(operation: &str, attempt: u32, error: &GlintError) {
    if error.is_transient() {
        warn!(operation, attempt, error = %error, "attempts exhausted");
    } else {
        debug!(operation, attempt, error = %error, "non-retryable failure");
    }
}
