use serde::{Deserialize, Serialize};

use super::defaults;

/// Suppression rule configuration.
///
/// A pattern is auto-suppressed when `reject_count > max_reject_count`, or
/// when it has at least `min_feedback_samples` judgements and its accuracy
/// sits below `min_accuracy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppressionConfig {
    /// Rejections beyond this count suppress the pattern outright.
    pub max_reject_count: u64,
    /// Minimum feedback sample size before accuracy is trusted.
    pub min_feedback_samples: u64,
    /// Accuracy floor; below it a sufficiently-sampled pattern is suppressed.
    pub min_accuracy: f64,
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self {
            max_reject_count: defaults::DEFAULT_MAX_REJECT_COUNT,
            min_feedback_samples: defaults::DEFAULT_MIN_FEEDBACK_SAMPLES,
            min_accuracy: defaults::DEFAULT_MIN_ACCURACY,
        }
    }
}
