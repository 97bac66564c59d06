//! Tier 3: remote classification behind the resilience wrapper.

use std::sync::Arc;

use tracing::debug;

use glint_core::config::ResilienceConfig;
use glint_core::models::{ClassifyInput, Score, TierKind, TierResolution};
use glint_core::traits::IClassifier;
use glint_core::GlintResult;
use glint_inference::{BreakerState, ResilientClassifier};

/// Remote-classification tier.
///
/// Wraps the bare classifier in retry, hard timeout, and circuit
/// breaking, and reports how many attempts were actually dispatched so
/// the caller can account for cost.
pub struct RemoteTier {
    classifier: ResilientClassifier,
}

impl RemoteTier {
    pub fn new(classifier: Arc<dyn IClassifier>, config: ResilienceConfig) -> Self {
        Self {
            classifier: ResilientClassifier::new(classifier, config),
        }
    }

    pub fn breaker_state(&self) -> BreakerState {
        self.classifier.breaker_state()
    }

    /// Classify `input`, returning the resolution or the error that
    /// survived the retry schedule, plus the dispatched-attempt count.
    pub async fn resolve(&self, input: &ClassifyInput) -> (GlintResult<TierResolution>, u32) {
        let (result, dispatched) = self.classifier.classify_counted(input).await;
        let result = result.map(|classification| {
            debug!(
                gl_code = %classification.gl_code,
                score = classification.score,
                "remote tier answered"
            );
            TierResolution {
                gl_code: classification.gl_code,
                score: Score::new(classification.score),
                source: TierKind::Remote,
                matched_key: None,
            }
        });
        (result, dispatched)
    }
}
