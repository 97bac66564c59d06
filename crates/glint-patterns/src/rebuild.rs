//! Rebuild: reconstruct the whole pattern set from confirmed history.
//!
//! The live store accumulates state from unconfirmed traffic; rebuild
//! throws that away and recomputes everything from human-verified rows,
//! then replays the feedback log for tallies and re-derives suppression.
//! Manual reactivations survive: feedback from before a pattern's
//! `reactivated_at` stays forgiven, exactly as it is on the live path.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use glint_core::config::SuppressionConfig;
use glint_core::models::{FeedbackEvent, FeedbackKind, HistoryEntry, Pattern};

use crate::suppression::should_suppress;

/// What a rebuild did, for logs and operator dashboards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RebuildReport {
    pub patterns_rebuilt: usize,
    pub history_entries_scanned: usize,
    pub feedback_events_replayed: usize,
    pub auto_suppressed: usize,
    pub overrides_preserved: usize,
}

struct KeyAccumulator {
    count: u64,
    amount_sum: f64,
    latest: DateTime<Utc>,
    latest_gl_code: String,
    earliest: DateTime<Utc>,
}

/// Recompute the pattern set from confirmed history plus the feedback log.
///
/// `previous` supplies only what history cannot: original creation times
/// and manual-override markers. Keys without any confirmed history do not
/// survive, overridden or not. An empty history yields an empty set.
pub fn rebuild_patterns(
    history: &[HistoryEntry],
    feedback: &[FeedbackEvent],
    previous: &[Pattern],
    config: &SuppressionConfig,
) -> (Vec<Pattern>, RebuildReport) {
    let mut report = RebuildReport::default();

    let prior: HashMap<&str, &Pattern> =
        previous.iter().map(|p| (p.key.as_str(), p)).collect();

    let mut accumulators: HashMap<&str, KeyAccumulator> = HashMap::new();
    for entry in history.iter().filter(|e| e.confirmed) {
        report.history_entries_scanned += 1;
        match accumulators.get_mut(entry.key.as_str()) {
            Some(acc) => {
                acc.count += 1;
                acc.amount_sum += entry.amount;
                if entry.recorded_at >= acc.latest {
                    acc.latest = entry.recorded_at;
                    acc.latest_gl_code = entry.gl_code.clone();
                }
                if entry.recorded_at < acc.earliest {
                    acc.earliest = entry.recorded_at;
                }
            }
            None => {
                accumulators.insert(
                    entry.key.as_str(),
                    KeyAccumulator {
                        count: 1,
                        amount_sum: entry.amount,
                        latest: entry.recorded_at,
                        latest_gl_code: entry.gl_code.clone(),
                        earliest: entry.recorded_at,
                    },
                );
            }
        }
    }

    let now = Utc::now();
    let mut patterns: Vec<Pattern> = Vec::with_capacity(accumulators.len());
    for (key, acc) in accumulators {
        let prior_pattern = prior.get(key);
        let overridden = prior_pattern.map(|p| p.manual_override).unwrap_or(false);
        let reactivated_at = prior_pattern.and_then(|p| p.reactivated_at);
        // Feedback forgiven by a manual reactivation stays forgiven.
        let replay_cutoff = if overridden { reactivated_at } else { None };

        let mut confirm_count = 0u64;
        let mut reject_count = 0u64;
        for event in feedback.iter().filter(|e| e.key == key) {
            if let Some(cutoff) = replay_cutoff {
                if event.recorded_at <= cutoff {
                    continue;
                }
            }
            report.feedback_events_replayed += 1;
            match event.kind {
                FeedbackKind::Confirmed => confirm_count += 1,
                FeedbackKind::Rejected => reject_count += 1,
            }
        }

        let mut pattern = Pattern {
            key: key.to_string(),
            gl_code: acc.latest_gl_code,
            average_amount: acc.amount_sum / acc.count as f64,
            occurrence_count: acc.count,
            confirm_count,
            reject_count,
            suppressed: false,
            manual_override: false,
            reactivated_at,
            created_at: prior_pattern.map(|p| p.created_at).unwrap_or(acc.earliest),
            last_updated: now,
        };

        if should_suppress(&pattern, config) {
            // Post-reactivation evidence can still condemn an overridden
            // pattern; the override only covers what came before it.
            pattern.suppressed = true;
            report.auto_suppressed += 1;
        } else if overridden {
            pattern.manual_override = true;
            report.overrides_preserved += 1;
        }

        patterns.push(pattern);
    }

    report.patterns_rebuilt = patterns.len();
    info!(
        patterns = report.patterns_rebuilt,
        scanned = report.history_entries_scanned,
        replayed = report.feedback_events_replayed,
        suppressed = report.auto_suppressed,
        overrides = report.overrides_preserved,
        "pattern rebuild complete"
    );
    (patterns, report)
}
