//! The suppression rule: when a pattern has earned its way out of serving.

use glint_core::config::SuppressionConfig;
use glint_core::models::Pattern;

/// Whether a pattern's feedback record warrants automatic suppression.
///
/// Two independent triggers: an outright rejection count past the cap, or a
/// demonstrated accuracy below the floor once enough feedback has
/// accumulated to trust the ratio. Patterns with no feedback are never
/// suppressed here.
///
/// This only decides entry into suppression. Leaving it is always explicit:
/// a manual reactivation or a rebuild.
pub fn should_suppress(pattern: &Pattern, config: &SuppressionConfig) -> bool {
    if pattern.reject_count > config.max_reject_count {
        return true;
    }
    match pattern.accuracy() {
        Some(accuracy) => {
            pattern.feedback_samples() >= config.min_feedback_samples
                && accuracy < config.min_accuracy
        }
        None => false,
    }
}
