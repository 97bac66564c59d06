//! PatternStore: concurrent per-key pattern state via DashMap.

use std::sync::Arc;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use glint_core::config::SuppressionConfig;
use glint_core::errors::StoreError;
use glint_core::models::{FeedbackKind, Pattern};
use glint_core::traits::IExpenseStore;
use glint_core::GlintResult;

use crate::suppression::should_suppress;

/// Thread-safe pattern store.
///
/// All mutation happens under the owning key's map entry, so two requests
/// for the same key serialize on that entry alone while unrelated keys
/// proceed in parallel. When a repository is attached, every mutation is
/// written through after the entry lock is released.
pub struct PatternStore {
    patterns: DashMap<String, Pattern>,
    config: SuppressionConfig,
    repository: Option<Arc<dyn IExpenseStore>>,
}

impl PatternStore {
    /// Create an in-memory store.
    pub fn new(config: SuppressionConfig) -> Self {
        Self {
            patterns: DashMap::new(),
            config,
            repository: None,
        }
    }

    /// Create a store that writes every mutation through to `repository`.
    pub fn with_repository(config: SuppressionConfig, repository: Arc<dyn IExpenseStore>) -> Self {
        Self {
            patterns: DashMap::new(),
            config,
            repository: Some(repository),
        }
    }

    /// Hydrate the map from the attached repository. Returns how many
    /// patterns were loaded; a no-op without a repository.
    pub fn load_from_repository(&self) -> GlintResult<usize> {
        let Some(repository) = &self.repository else {
            return Ok(0);
        };
        let patterns = repository.load_patterns()?;
        let count = patterns.len();
        self.patterns.clear();
        for pattern in patterns {
            self.patterns.insert(pattern.key.clone(), pattern);
        }
        debug!(count, "pattern store hydrated from repository");
        Ok(count)
    }

    /// Get a pattern by key (cloned snapshot).
    pub fn get(&self, key: &str) -> Option<Pattern> {
        self.patterns.get(key).map(|r| r.clone())
    }

    /// Record one observation of `key` resolving to `gl_code`.
    ///
    /// Creates the pattern on first sight; otherwise bumps the occurrence
    /// count, folds the amount into the running mean, and moves the pattern
    /// to `gl_code` if it differed (the freshest signal wins).
    pub fn upsert(&self, key: &str, gl_code: &str, amount: f64) -> GlintResult<Pattern> {
        let updated = match self.patterns.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let pattern = occupied.get_mut();
                if pattern.gl_code != gl_code {
                    debug!(
                        key = %pattern.key,
                        from = %pattern.gl_code,
                        to = %gl_code,
                        "pattern moved to a new gl code"
                    );
                    pattern.gl_code = gl_code.to_string();
                }
                pattern.record_occurrence(amount);
                pattern.clone()
            }
            Entry::Vacant(vacant) => {
                let pattern = Pattern::new(key, gl_code, amount);
                vacant.insert(pattern.clone());
                pattern
            }
        };
        self.persist(&updated)?;
        Ok(updated)
    }

    /// Apply one feedback tally and re-evaluate suppression.
    ///
    /// Suppression is entered here and only here; it never reverses itself,
    /// a pattern leaves it through [`PatternStore::reactivate`] or rebuild.
    pub fn record_feedback(&self, key: &str, kind: FeedbackKind) -> GlintResult<Pattern> {
        let updated = {
            let mut entry =
                self.patterns
                    .get_mut(key)
                    .ok_or_else(|| StoreError::PatternNotFound {
                        key: key.to_string(),
                    })?;
            match kind {
                FeedbackKind::Confirmed => entry.confirm_count += 1,
                FeedbackKind::Rejected => entry.reject_count += 1,
            }
            entry.last_updated = Utc::now();
            if !entry.suppressed && should_suppress(entry.value(), &self.config) {
                entry.suppressed = true;
                // Fresh evidence beats a stale manual override.
                entry.manual_override = false;
                info!(
                    key = %entry.key,
                    rejects = entry.reject_count,
                    samples = entry.feedback_samples(),
                    "pattern suppressed"
                );
            }
            entry.clone()
        };
        self.persist(&updated)?;
        Ok(updated)
    }

    /// Point a pattern at a corrected GL code without counting an
    /// occurrence. Used when a rejection carries the right answer.
    pub fn correct_code(&self, key: &str, gl_code: &str) -> GlintResult<Pattern> {
        let updated = {
            let mut entry =
                self.patterns
                    .get_mut(key)
                    .ok_or_else(|| StoreError::PatternNotFound {
                        key: key.to_string(),
                    })?;
            if entry.gl_code != gl_code {
                debug!(key = %entry.key, from = %entry.gl_code, to = %gl_code, "pattern corrected");
                entry.gl_code = gl_code.to_string();
                entry.last_updated = Utc::now();
            }
            entry.clone()
        };
        self.persist(&updated)?;
        Ok(updated)
    }

    /// Manually lift suppression.
    ///
    /// Clears the feedback tallies so the stale record cannot re-trip the
    /// rule on the next event, and marks the pattern as a manual override
    /// so rebuild keeps it serving.
    pub fn reactivate(&self, key: &str) -> GlintResult<Pattern> {
        let updated = {
            let mut entry =
                self.patterns
                    .get_mut(key)
                    .ok_or_else(|| StoreError::PatternNotFound {
                        key: key.to_string(),
                    })?;
            let now = Utc::now();
            entry.suppressed = false;
            entry.manual_override = true;
            entry.confirm_count = 0;
            entry.reject_count = 0;
            entry.reactivated_at = Some(now);
            entry.last_updated = now;
            info!(key = %entry.key, "pattern manually reactivated");
            entry.clone()
        };
        self.persist(&updated)?;
        Ok(updated)
    }

    /// Explicitly remove a pattern. Nothing in the engine removes patterns
    /// implicitly; suppression exists for that.
    pub fn remove(&self, key: &str) -> GlintResult<bool> {
        let removed = self.patterns.remove(key).is_some();
        if removed {
            if let Some(repository) = &self.repository {
                repository.delete_pattern(key)?;
            }
            info!(key, "pattern removed");
        }
        Ok(removed)
    }

    /// Snapshot of all patterns, sorted by key. Suppressed patterns are
    /// filtered out unless asked for.
    pub fn list(&self, include_suppressed: bool) -> Vec<Pattern> {
        let mut out: Vec<Pattern> = self
            .patterns
            .iter()
            .filter(|r| include_suppressed || !r.suppressed)
            .map(|r| r.clone())
            .collect();
        out.sort_by(|a, b| a.key.cmp(&b.key));
        out
    }

    /// Replace the entire pattern set, map and repository both. Used by
    /// rebuild and bulk warm-up.
    pub fn replace_all(&self, patterns: Vec<Pattern>) -> GlintResult<usize> {
        if let Some(repository) = &self.repository {
            repository.replace_patterns(&patterns)?;
        }
        self.patterns.clear();
        let count = patterns.len();
        for pattern in patterns {
            self.patterns.insert(pattern.key.clone(), pattern);
        }
        info!(count, "pattern store replaced");
        Ok(count)
    }

    /// Number of patterns, suppressed included.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn persist(&self, pattern: &Pattern) -> GlintResult<()> {
        if let Some(repository) = &self.repository {
            repository.save_pattern(pattern)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PatternStore {
        PatternStore::new(SuppressionConfig::default())
    }

    #[test]
    fn upsert_creates_then_accumulates() {
        let s = store();
        let first = s.upsert("starbucks", "6400-Meals", 4.0).unwrap();
        assert_eq!(first.occurrence_count, 1);
        assert_eq!(first.average_amount, 4.0);

        let second = s.upsert("starbucks", "6400-Meals", 6.0).unwrap();
        assert_eq!(second.occurrence_count, 2);
        assert!((second.average_amount - 5.0).abs() < 1e-9);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn upsert_with_new_code_moves_the_pattern() {
        let s = store();
        s.upsert("zoom", "6500-Software", 15.0).unwrap();
        let moved = s.upsert("zoom", "6510-Subscriptions", 15.0).unwrap();
        assert_eq!(moved.gl_code, "6510-Subscriptions");
        assert_eq!(moved.occurrence_count, 2);
    }

    #[test]
    fn feedback_on_unknown_key_is_an_error() {
        let s = store();
        let err = s
            .record_feedback("ghost", FeedbackKind::Confirmed)
            .unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn fourth_rejection_suppresses() {
        let s = store();
        s.upsert("flaky vendor", "6400-Meals", 10.0).unwrap();
        for _ in 0..3 {
            let p = s
                .record_feedback("flaky vendor", FeedbackKind::Rejected)
                .unwrap();
            assert!(!p.suppressed);
        }
        let p = s
            .record_feedback("flaky vendor", FeedbackKind::Rejected)
            .unwrap();
        assert!(p.suppressed);
    }

    #[test]
    fn suppression_does_not_reverse_on_later_confirms() {
        let s = store();
        s.upsert("flaky vendor", "6400-Meals", 10.0).unwrap();
        for _ in 0..4 {
            s.record_feedback("flaky vendor", FeedbackKind::Rejected)
                .unwrap();
        }
        let p = s
            .record_feedback("flaky vendor", FeedbackKind::Confirmed)
            .unwrap();
        assert!(p.suppressed, "confirms alone must not lift suppression");
    }

    #[test]
    fn reactivate_clears_suppression_and_tallies() {
        let s = store();
        s.upsert("flaky vendor", "6400-Meals", 10.0).unwrap();
        for _ in 0..4 {
            s.record_feedback("flaky vendor", FeedbackKind::Rejected)
                .unwrap();
        }
        let p = s.reactivate("flaky vendor").unwrap();
        assert!(!p.suppressed);
        assert!(p.manual_override);
        assert_eq!(p.feedback_samples(), 0);

        // One new rejection is nowhere near the rule again.
        let p = s
            .record_feedback("flaky vendor", FeedbackKind::Rejected)
            .unwrap();
        assert!(!p.suppressed);
    }

    #[test]
    fn retripping_the_rule_clears_the_manual_override() {
        let s = store();
        s.upsert("flaky vendor", "6400-Meals", 10.0).unwrap();
        for _ in 0..4 {
            s.record_feedback("flaky vendor", FeedbackKind::Rejected)
                .unwrap();
        }
        s.reactivate("flaky vendor").unwrap();
        for _ in 0..4 {
            s.record_feedback("flaky vendor", FeedbackKind::Rejected)
                .unwrap();
        }
        let p = s.get("flaky vendor").unwrap();
        assert!(p.suppressed);
        assert!(!p.manual_override);
    }

    #[test]
    fn list_filters_suppressed_by_default() {
        let s = store();
        s.upsert("good vendor", "6400-Meals", 10.0).unwrap();
        s.upsert("bad vendor", "6400-Meals", 10.0).unwrap();
        for _ in 0..4 {
            s.record_feedback("bad vendor", FeedbackKind::Rejected)
                .unwrap();
        }
        let visible = s.list(false);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].key, "good vendor");
        let all = s.list(true);
        assert_eq!(all.len(), 2);
        // Sorted by key.
        assert_eq!(all[0].key, "bad vendor");
    }

    #[test]
    fn remove_is_explicit_and_reports_absence() {
        let s = store();
        s.upsert("starbucks", "6400-Meals", 4.0).unwrap();
        assert!(s.remove("starbucks").unwrap());
        assert!(!s.remove("starbucks").unwrap());
        assert!(s.get("starbucks").is_none());
    }
}
