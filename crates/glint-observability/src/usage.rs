//! In-memory usage tracking.
//!
//! [`UsageTracker`] keeps an append-only ring of tier invocation records
//! plus a parallel ring of request arrivals. Both are bounded by
//! `max_records`; the oldest entries fall off first. Durable usage rows
//! are the storage collaborator's job, fed by the engine alongside this
//! tracker.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use glint_core::config::UsageConfig;
use glint_core::models::{TierKind, TierUsage, TierUsageRecord, UsageSummary};

struct TrackerInner {
    records: VecDeque<TierUsageRecord>,
    requests: VecDeque<DateTime<Utc>>,
}

/// Tracks tier invocations and request arrivals for cost and
/// operational reporting.
pub struct UsageTracker {
    inner: Mutex<TrackerInner>,
    total_requests: AtomicU64,
    config: UsageConfig,
}

impl UsageTracker {
    pub fn new(config: UsageConfig) -> Self {
        Self {
            inner: Mutex::new(TrackerInner {
                records: VecDeque::new(),
                requests: VecDeque::new(),
            }),
            total_requests: AtomicU64::new(0),
            config,
        }
    }

    /// Count one categorization request entering the pipeline.
    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let mut inner = self.inner.lock();
        inner.requests.push_back(Utc::now());
        while inner.requests.len() > self.config.max_records {
            inner.requests.pop_front();
        }
    }

    /// Append one tier invocation record.
    pub fn record(&self, record: TierUsageRecord) {
        let mut inner = self.inner.lock();
        inner.records.push_back(record);
        while inner.records.len() > self.config.max_records {
            inner.records.pop_front();
        }
    }

    /// Requests counted since the tracker was created, regardless of
    /// window or ring capacity.
    pub fn requests_total(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Window used when the caller does not pass one.
    pub fn default_window_secs(&self) -> u64 {
        self.config.default_window_secs
    }

    /// Cost attributed to one remote classifier call.
    pub fn remote_call_cost(&self) -> f64 {
        self.config.remote_call_cost
    }

    /// Aggregate per-tier usage over the trailing window.
    pub fn summary(&self, window_secs: u64) -> UsageSummary {
        let cutoff = Utc::now() - Duration::seconds(window_secs as i64);
        let inner = self.inner.lock();

        let mut summary = UsageSummary {
            window_secs,
            generated_at: Utc::now(),
            requests_processed: inner.requests.iter().filter(|t| **t >= cutoff).count() as u64,
            exact: TierUsage::default(),
            semantic: TierUsage::default(),
            remote: TierUsage::default(),
        };

        // Accumulate latency sums in avg_latency_ms, then divide once.
        for record in inner.records.iter().filter(|r| r.recorded_at >= cutoff) {
            let slot = match record.tier {
                TierKind::Exact => &mut summary.exact,
                TierKind::Semantic => &mut summary.semantic,
                TierKind::Remote => &mut summary.remote,
            };
            slot.calls += 1;
            if !record.success {
                slot.failures += 1;
            }
            slot.total_cost += record.cost_units;
            slot.avg_latency_ms += record.latency_ms;
        }
        for slot in [
            &mut summary.exact,
            &mut summary.semantic,
            &mut summary.remote,
        ] {
            if slot.calls > 0 {
                slot.avg_latency_ms /= slot.calls as f64;
            }
        }
        summary
    }

    /// Nearest-rank latency percentile for one tier over the trailing
    /// window, or `None` when the tier has no records in it.
    pub fn latency_percentile(
        &self,
        tier: TierKind,
        window_secs: u64,
        percentile: f64,
    ) -> Option<f64> {
        let cutoff = Utc::now() - Duration::seconds(window_secs as i64);
        let inner = self.inner.lock();
        let mut latencies: Vec<f64> = inner
            .records
            .iter()
            .filter(|r| r.tier == tier && r.recorded_at >= cutoff)
            .map(|r| r.latency_ms)
            .collect();
        if latencies.is_empty() {
            return None;
        }
        latencies.sort_by(|a, b| a.total_cmp(b));
        let percentile = percentile.clamp(0.0, 1.0);
        let rank = ((percentile * latencies.len() as f64).ceil() as usize).max(1) - 1;
        Some(latencies[rank.min(latencies.len() - 1)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with_capacity(max_records: usize) -> UsageTracker {
        UsageTracker::new(UsageConfig {
            max_records,
            ..UsageConfig::default()
        })
    }

    #[test]
    fn summary_aggregates_per_tier() {
        let tracker = tracker_with_capacity(100);
        tracker.record_request();
        tracker.record_request();
        tracker.record(TierUsageRecord::new(TierKind::Exact, 0.3, 0.0, true));
        tracker.record(TierUsageRecord::new(TierKind::Remote, 800.0, 1.0, true));
        tracker.record(TierUsageRecord::new(TierKind::Remote, 1200.0, 1.0, false));

        let summary = tracker.summary(3600);
        assert_eq!(summary.requests_processed, 2);
        assert_eq!(summary.exact.calls, 1);
        assert_eq!(summary.exact.failures, 0);
        assert_eq!(summary.semantic.calls, 0);
        assert_eq!(summary.remote.calls, 2);
        assert_eq!(summary.remote.failures, 1);
        assert!((summary.remote.total_cost - 2.0).abs() < 1e-9);
        assert!((summary.remote.avg_latency_ms - 1000.0).abs() < 1e-9);
        assert_eq!(summary.total_calls(), 3);
        assert!((summary.total_cost() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn ring_drops_the_oldest_records() {
        let tracker = tracker_with_capacity(3);
        for i in 0..5 {
            tracker.record(TierUsageRecord::new(TierKind::Exact, i as f64, 0.0, true));
        }

        let summary = tracker.summary(3600);
        assert_eq!(summary.exact.calls, 3);
        // Latencies 0 and 1 fell off; 2, 3, 4 remain.
        assert!((summary.exact.avg_latency_ms - 3.0).abs() < 1e-9);
    }

    #[test]
    fn window_excludes_stale_records() {
        let tracker = tracker_with_capacity(100);
        let mut stale = TierUsageRecord::new(TierKind::Remote, 900.0, 1.0, true);
        stale.recorded_at = Utc::now() - Duration::hours(2);
        tracker.record(stale);
        tracker.record(TierUsageRecord::new(TierKind::Remote, 100.0, 1.0, true));

        let hour = tracker.summary(3600);
        assert_eq!(hour.remote.calls, 1);
        assert!((hour.remote.avg_latency_ms - 100.0).abs() < 1e-9);

        let wide = tracker.summary(3 * 3600);
        assert_eq!(wide.remote.calls, 2);
    }

    #[test]
    fn lifetime_request_counter_counts_everything() {
        let tracker = tracker_with_capacity(100);
        tracker.record_request();
        tracker.record_request();
        assert_eq!(tracker.requests_total(), 2);
        assert_eq!(tracker.summary(3600).requests_processed, 2);
    }

    #[test]
    fn latency_percentiles_use_nearest_rank() {
        let tracker = tracker_with_capacity(100);
        for latency in [10.0, 20.0, 30.0, 40.0] {
            tracker.record(TierUsageRecord::new(TierKind::Remote, latency, 1.0, true));
        }

        assert_eq!(
            tracker.latency_percentile(TierKind::Remote, 3600, 0.5),
            Some(20.0)
        );
        assert_eq!(
            tracker.latency_percentile(TierKind::Remote, 3600, 0.95),
            Some(40.0)
        );
        assert_eq!(
            tracker.latency_percentile(TierKind::Remote, 3600, 1.0),
            Some(40.0)
        );
        assert_eq!(tracker.latency_percentile(TierKind::Exact, 3600, 0.5), None);
    }
}
