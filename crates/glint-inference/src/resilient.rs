//! Resilience wrapper around a bare classifier.
//!
//! Layering, outermost first: retry loop, breaker consult, hard
//! timeout, bare call. Each attempt consults the breaker again, so a
//! circuit that opens mid-sequence aborts the remaining attempts.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use glint_core::config::ResilienceConfig;
use glint_core::errors::{GlintError, GlintResult, InferenceError};
use glint_core::models::{Classification, ClassifyInput};
use glint_core::traits::IClassifier;

use crate::breaker::{BreakerState, CircuitBreaker};
use crate::retry;

pub struct ResilientClassifier {
    inner: Arc<dyn IClassifier>,
    breaker: CircuitBreaker,
    config: ResilienceConfig,
}

impl ResilientClassifier {
    pub fn new(inner: Arc<dyn IClassifier>, config: ResilienceConfig) -> Self {
        Self {
            breaker: CircuitBreaker::new(config.clone()),
            inner,
            config,
        }
    }

    /// Breaker state, for logs and usage summaries.
    pub fn breaker_state(&self) -> BreakerState {
        self.breaker.state()
    }

    /// Classify with the full retry schedule, also reporting how many
    /// attempts were dispatched past the breaker.
    ///
    /// Cost accounting wants the dispatch count, not the attempt count:
    /// an attempt the breaker refuses never reaches the service and
    /// costs nothing.
    pub async fn classify_counted(
        &self,
        input: &ClassifyInput,
    ) -> (GlintResult<Classification>, u32) {
        let dispatched = AtomicU32::new(0);
        let result = retry::with_retry(&self.config, "classify", || {
            self.classify_once(input, &dispatched)
        })
        .await;
        (result, dispatched.load(Ordering::Relaxed))
    }

    /// One guarded attempt: breaker consult, then the call under a
    /// hard deadline.
    ///
    /// A rejection is a well-formed answer from a healthy service, so
    /// it counts as breaker success; everything else counts against
    /// the failure ratio.
    async fn classify_once(
        &self,
        input: &ClassifyInput,
        dispatched: &AtomicU32,
    ) -> GlintResult<Classification> {
        self.breaker.check()?;
        dispatched.fetch_add(1, Ordering::Relaxed);

        let deadline = Duration::from_millis(self.config.call_timeout_ms);
        match tokio::time::timeout(deadline, self.inner.classify(input)).await {
            Ok(Ok(classification)) => {
                self.breaker.record_success();
                Ok(classification)
            }
            Ok(Err(e)) => {
                if matches!(
                    &e,
                    GlintError::InferenceError(InferenceError::Rejected { .. })
                ) {
                    self.breaker.record_success();
                } else {
                    self.breaker.record_failure();
                }
                Err(e)
            }
            Err(_) => {
                self.breaker.record_failure();
                Err(InferenceError::Timeout {
                    elapsed_ms: self.config.call_timeout_ms,
                }
                .into())
            }
        }
    }
}

#[async_trait]
impl IClassifier for ResilientClassifier {
    async fn classify(&self, input: &ClassifyInput) -> GlintResult<Classification> {
        self.classify_counted(input).await.0
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
