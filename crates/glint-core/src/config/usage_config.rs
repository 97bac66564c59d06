use serde::{Deserialize, Serialize};

use super::defaults;

/// Usage-tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Ring-buffer capacity; oldest records fall off first.
    pub max_records: usize,
    /// Window used when a summary is requested without one.
    pub default_window_secs: u64,
    /// Cost units attributed to one remote classifier call.
    pub remote_call_cost: f64,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            max_records: defaults::DEFAULT_USAGE_MAX_RECORDS,
            default_window_secs: defaults::DEFAULT_USAGE_WINDOW_SECS,
            remote_call_cost: defaults::DEFAULT_REMOTE_CALL_COST,
        }
    }
}
