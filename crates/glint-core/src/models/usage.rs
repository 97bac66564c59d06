use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::TierKind;

/// One tier invocation, as recorded by the usage tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierUsageRecord {
    /// Which tier ran.
    pub tier: TierKind,
    /// When the invocation finished.
    pub recorded_at: DateTime<Utc>,
    /// Wall-clock duration of the invocation.
    pub latency_ms: f64,
    /// Abstract cost of the invocation. Cache lookups are near zero;
    /// remote calls carry the configured per-call cost.
    pub cost_units: f64,
    /// Whether the invocation produced an answer or a clean miss, as
    /// opposed to failing.
    pub success: bool,
}

impl TierUsageRecord {
    pub fn new(tier: TierKind, latency_ms: f64, cost_units: f64, success: bool) -> Self {
        Self {
            tier,
            recorded_at: Utc::now(),
            latency_ms,
            cost_units,
            success,
        }
    }
}

/// Aggregated usage for one tier over a summary window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierUsage {
    /// Invocations recorded in the window.
    pub calls: u64,
    /// Invocations that failed.
    pub failures: u64,
    /// Sum of cost units.
    pub total_cost: f64,
    /// Mean latency across invocations, 0.0 when there were none.
    pub avg_latency_ms: f64,
}

/// Per-tier usage over a rolling window, plus the request count that lets
/// operators spot a stalled pipeline (requests moving, no tier records).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSummary {
    /// Window length the summary covers, in seconds.
    pub window_secs: u64,
    /// When the summary was computed.
    pub generated_at: DateTime<Utc>,
    /// Categorization requests that entered the pipeline in the window.
    pub requests_processed: u64,
    pub exact: TierUsage,
    pub semantic: TierUsage,
    pub remote: TierUsage,
}

impl UsageSummary {
    pub fn tier(&self, kind: TierKind) -> &TierUsage {
        match kind {
            TierKind::Exact => &self.exact,
            TierKind::Semantic => &self.semantic,
            TierKind::Remote => &self.remote,
        }
    }

    /// Total cost across all tiers in the window.
    pub fn total_cost(&self) -> f64 {
        self.exact.total_cost + self.semantic.total_cost + self.remote.total_cost
    }

    /// Total tier invocations recorded in the window.
    pub fn total_calls(&self) -> u64 {
        self.exact.calls + self.semantic.calls + self.remote.calls
    }
}
