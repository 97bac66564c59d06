//! Operational alerting over usage summaries.

use serde::Serialize;
use tracing::warn;

use glint_core::models::UsageSummary;

/// An operational condition worth paging over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "alert")]
pub enum UsageAlert {
    /// Requests entered the pipeline but no tier ever ran. Seen in the
    /// field when the categorization worker is wired up wrong or dead.
    PipelineStalled { window_secs: u64, requests: u64 },
}

/// Evaluate a summary and return every alert it trips.
pub fn evaluate(summary: &UsageSummary) -> Vec<UsageAlert> {
    let mut alerts = Vec::new();
    if summary.requests_processed > 0 && summary.total_calls() == 0 {
        warn!(
            event = "pipeline_stalled",
            window_secs = summary.window_secs,
            requests = summary.requests_processed,
            "requests processed but no tier records in window"
        );
        alerts.push(UsageAlert::PipelineStalled {
            window_secs: summary.window_secs,
            requests: summary.requests_processed,
        });
    }
    alerts
}
