use serde::{Deserialize, Serialize};

use super::defaults;

/// Decision-policy cut-offs.
///
/// Scores below `low_threshold` are Low, scores at or above `high_threshold`
/// are High, everything between is Medium.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Lower band cut-off.
    pub low_threshold: f64,
    /// Upper band cut-off.
    pub high_threshold: f64,
    /// Score served by the exact tier before any feedback exists.
    pub bootstrap_score: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            low_threshold: defaults::DEFAULT_LOW_THRESHOLD,
            high_threshold: defaults::DEFAULT_HIGH_THRESHOLD,
            bootstrap_score: defaults::DEFAULT_BOOTSTRAP_SCORE,
        }
    }
}
