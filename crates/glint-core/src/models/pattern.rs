use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A learned association between a normalized expense key and a GL code.
///
/// Patterns accumulate two independent kinds of evidence: occurrences
/// (how often the key has been seen, with a running mean of amounts) and
/// human feedback (confirm/reject tallies that drive accuracy and
/// suppression).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    /// Normalized key this pattern is stored under.
    pub key: String,
    /// General-ledger code the key currently maps to.
    pub gl_code: String,
    /// Running mean of every amount observed for this key.
    pub average_amount: f64,
    /// Number of times the key has been observed.
    pub occurrence_count: u64,
    /// Times a human confirmed a prediction served from this pattern.
    pub confirm_count: u64,
    /// Times a human rejected a prediction served from this pattern.
    pub reject_count: u64,
    /// Suppressed patterns never serve lookups until reactivated or rebuilt.
    pub suppressed: bool,
    /// Set by manual reactivation. Rebuild honors it instead of re-deriving
    /// suppression; a later rejection that re-trips the rule clears it.
    pub manual_override: bool,
    /// When the pattern was last manually reactivated. Feedback from before
    /// this instant is forgiven during rebuild.
    pub reactivated_at: Option<DateTime<Utc>>,
    /// When the pattern was first created.
    pub created_at: DateTime<Utc>,
    /// Last mutation of any field.
    pub last_updated: DateTime<Utc>,
}

impl Pattern {
    /// Create a fresh pattern from its first observation.
    pub fn new(key: impl Into<String>, gl_code: impl Into<String>, amount: f64) -> Self {
        let now = Utc::now();
        Self {
            key: key.into(),
            gl_code: gl_code.into(),
            average_amount: amount,
            occurrence_count: 1,
            confirm_count: 0,
            reject_count: 0,
            suppressed: false,
            manual_override: false,
            reactivated_at: None,
            created_at: now,
            last_updated: now,
        }
    }

    /// Total human feedback received for this pattern.
    pub fn feedback_samples(&self) -> u64 {
        self.confirm_count + self.reject_count
    }

    /// Share of feedback that confirmed the pattern, or `None` before any
    /// feedback exists. Always within [0.0, 1.0].
    pub fn accuracy(&self) -> Option<f64> {
        let samples = self.feedback_samples();
        if samples == 0 {
            None
        } else {
            Some(self.confirm_count as f64 / samples as f64)
        }
    }

    /// Fold one more observation into the occurrence count and running mean.
    pub fn record_occurrence(&mut self, amount: f64) {
        self.occurrence_count += 1;
        let n = self.occurrence_count as f64;
        self.average_amount += (amount - self.average_amount) / n;
        self.last_updated = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pattern_counts_its_first_observation() {
        let p = Pattern::new("starbucks", "6400-Meals", 5.75);
        assert_eq!(p.occurrence_count, 1);
        assert_eq!(p.average_amount, 5.75);
        assert!(!p.suppressed);
        assert_eq!(p.accuracy(), None);
    }

    #[test]
    fn running_mean_tracks_observations() {
        let mut p = Pattern::new("starbucks", "6400-Meals", 4.0);
        p.record_occurrence(6.0);
        assert_eq!(p.occurrence_count, 2);
        assert!((p.average_amount - 5.0).abs() < 1e-9);
        p.record_occurrence(8.0);
        assert!((p.average_amount - 6.0).abs() < 1e-9);
    }

    #[test]
    fn accuracy_reflects_feedback_tallies() {
        let mut p = Pattern::new("uber", "6410-Travel", 25.0);
        p.confirm_count = 3;
        p.reject_count = 1;
        assert_eq!(p.feedback_samples(), 4);
        assert!((p.accuracy().unwrap() - 0.75).abs() < 1e-9);
    }
}
