//! Rolling-window circuit breaker for the remote classifier.
//!
//! State machine:
//!
//! ```text
//!   Closed ──(ratio over threshold)──> Open
//!   Open ──(cooldown elapsed)────────> HalfOpen
//!   HalfOpen ──(probe succeeds)──────> Closed
//!   HalfOpen ──(probe fails)─────────> Open
//! ```
//!
//! Outcomes are sampled into a rolling time window; the breaker opens
//! when the window holds at least `min_samples` outcomes and the
//! failure ratio strictly exceeds `failure_ratio`.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use glint_core::config::ResilienceConfig;
use glint_core::errors::InferenceError;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Calls flow through; outcomes are sampled.
    Closed,
    /// Calls are refused until the cooldown elapses.
    Open,
    /// Cooldown elapsed; a single probe call is allowed through.
    HalfOpen,
}

impl fmt::Display for BreakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half_open"),
        }
    }
}

struct BreakerInner {
    /// Rolling outcome samples, oldest first. `true` marks success.
    samples: VecDeque<(Instant, bool)>,
    /// Set while the breaker is open or half-open.
    opened_at: Option<Instant>,
    /// Set while a half-open probe is in flight.
    probe_started_at: Option<Instant>,
}

impl BreakerInner {
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some((t, _)) = self.samples.front() {
            if now.duration_since(*t) > window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    fn failure_count(&self) -> usize {
        self.samples.iter().filter(|(_, ok)| !ok).count()
    }
}

/// Shared breaker guarding one remote dependency.
pub struct CircuitBreaker {
    inner: Mutex<BreakerInner>,
    config: ResilienceConfig,
}

impl CircuitBreaker {
    pub fn new(config: ResilienceConfig) -> Self {
        Self {
            inner: Mutex::new(BreakerInner {
                samples: VecDeque::new(),
                opened_at: None,
                probe_started_at: None,
            }),
            config,
        }
    }

    /// Consult the breaker before a call.
    ///
    /// Returns `Ok` when the call may proceed. While half-open, only
    /// one probe is admitted at a time; a probe slot older than the
    /// call timeout belongs to a dropped caller and is reclaimed.
    pub fn check(&self) -> Result<(), InferenceError> {
        let mut inner = self.inner.lock();
        if let Some(remaining) = self.remaining_cooldown(&inner) {
            return Err(InferenceError::CircuitOpen {
                remaining_secs: remaining.as_millis().div_ceil(1000) as u64,
            });
        }
        if inner.opened_at.is_some() {
            if let Some(started) = inner.probe_started_at {
                let probe_ttl = Duration::from_millis(self.config.call_timeout_ms);
                if started.elapsed() < probe_ttl {
                    return Err(InferenceError::CircuitOpen { remaining_secs: 0 });
                }
            }
            inner.probe_started_at = Some(Instant::now());
            debug!("circuit half-open, admitting probe");
        }
        Ok(())
    }

    /// Record a successful call.
    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        if inner.opened_at.is_some() {
            if inner.probe_started_at.is_some() {
                inner.opened_at = None;
                inner.probe_started_at = None;
                inner.samples.clear();
                info!("probe succeeded, circuit closed");
            }
            // Late result from a call admitted before the trip.
            return;
        }
        let now = Instant::now();
        inner.samples.push_back((now, true));
        inner.prune(now, Duration::from_secs(self.config.sample_window_secs));
    }

    /// Record a failed call and open the breaker if the window says so.
    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        if inner.opened_at.is_some() {
            if inner.probe_started_at.is_some() {
                inner.opened_at = Some(Instant::now());
                inner.probe_started_at = None;
                inner.samples.clear();
                warn!(
                    cooldown_secs = self.config.open_duration_secs,
                    "probe failed, circuit reopened"
                );
            }
            return;
        }

        let now = Instant::now();
        inner.samples.push_back((now, false));
        inner.prune(now, Duration::from_secs(self.config.sample_window_secs));

        let total = inner.samples.len();
        if total < self.config.min_samples {
            return;
        }
        let failures = inner.failure_count();
        let ratio = failures as f64 / total as f64;
        if ratio > self.config.failure_ratio {
            inner.opened_at = Some(now);
            inner.probe_started_at = None;
            inner.samples.clear();
            warn!(
                failures,
                total,
                cooldown_secs = self.config.open_duration_secs,
                "failure ratio exceeded, circuit opened"
            );
        }
    }

    /// Current state, for logs and usage summaries.
    pub fn state(&self) -> BreakerState {
        let inner = self.inner.lock();
        if self.remaining_cooldown(&inner).is_some() {
            BreakerState::Open
        } else if inner.opened_at.is_some() {
            BreakerState::HalfOpen
        } else {
            BreakerState::Closed
        }
    }

    fn remaining_cooldown(&self, inner: &BreakerInner) -> Option<Duration> {
        let opened_at = inner.opened_at?;
        let cooldown = Duration::from_secs(self.config.open_duration_secs);
        let elapsed = opened_at.elapsed();
        if elapsed < cooldown {
            Some(cooldown - elapsed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker() -> CircuitBreaker {
        CircuitBreaker::new(ResilienceConfig::default())
    }

    async fn advance(secs: u64) {
        tokio::time::advance(Duration::from_secs(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn new_breaker_is_closed() {
        let b = breaker();
        assert_eq!(b.state(), BreakerState::Closed);
        assert!(b.check().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn failures_below_min_samples_never_trip() {
        let b = breaker();
        for _ in 0..4 {
            b.record_failure();
        }
        assert_eq!(b.state(), BreakerState::Closed);
        assert!(b.check().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn opens_when_ratio_strictly_exceeded() {
        let b = breaker();
        b.record_success();
        b.record_success();
        for _ in 0..5 {
            b.record_failure();
        }
        // Trips once the window holds 5 samples at 3 failures to 2.
        assert_eq!(b.state(), BreakerState::Open);
        let err = b.check().unwrap_err();
        assert!(matches!(err, InferenceError::CircuitOpen { remaining_secs } if remaining_secs > 0));
    }

    #[tokio::test(start_paused = true)]
    async fn exact_ratio_does_not_trip() {
        let b = breaker();
        for _ in 0..5 {
            b.record_success();
        }
        for _ in 0..5 {
            b.record_failure();
        }
        // Exactly 0.5 is not over the threshold.
        assert_eq!(b.state(), BreakerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_samples_age_out_of_the_window() {
        let b = breaker();
        for _ in 0..4 {
            b.record_failure();
        }
        advance(31).await;
        for _ in 0..4 {
            b.record_failure();
        }
        // The first four fell out of the 30s window.
        assert_eq!(b.state(), BreakerState::Closed);

        b.record_failure();
        assert_eq!(b.state(), BreakerState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn half_open_admits_one_probe_then_closes_on_success() {
        let b = breaker();
        for _ in 0..5 {
            b.record_failure();
        }
        assert_eq!(b.state(), BreakerState::Open);

        advance(61).await;
        assert_eq!(b.state(), BreakerState::HalfOpen);

        assert!(b.check().is_ok());
        // Second caller while the probe is in flight.
        assert!(b.check().is_err());

        b.record_success();
        assert_eq!(b.state(), BreakerState::Closed);

        // Recovery forgets old tallies; one fresh failure is not enough.
        b.record_failure();
        assert_eq!(b.state(), BreakerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_failure_reopens_for_a_full_cooldown() {
        let b = breaker();
        for _ in 0..5 {
            b.record_failure();
        }
        advance(61).await;
        assert!(b.check().is_ok());
        b.record_failure();

        assert_eq!(b.state(), BreakerState::Open);
        advance(59).await;
        assert_eq!(b.state(), BreakerState::Open);
        advance(2).await;
        assert_eq!(b.state(), BreakerState::HalfOpen);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_probe_slot_is_reclaimed() {
        let b = breaker();
        for _ in 0..5 {
            b.record_failure();
        }
        advance(61).await;
        assert!(b.check().is_ok());

        // The probe caller vanished without reporting an outcome.
        advance(11).await;
        assert!(b.check().is_ok());
    }
}
