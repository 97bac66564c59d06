use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::score::Score;
use crate::config::PolicyConfig;

/// Which stage of the pipeline produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierKind {
    /// Exact key match against the pattern store.
    Exact,
    /// Cosine-similarity match against the embedding index.
    Semantic,
    /// Remote model classification.
    Remote,
}

impl TierKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TierKind::Exact => "exact",
            TierKind::Semantic => "semantic",
            TierKind::Remote => "remote",
        }
    }

    /// Inverse of [`TierKind::as_str`], for decoding stored rows.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(TierKind::Exact),
            "semantic" => Some(TierKind::Semantic),
            "remote" => Some(TierKind::Remote),
            _ => None,
        }
    }
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful answer from one tier, before policy is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierResolution {
    /// GL code the tier suggests.
    pub gl_code: String,
    /// The tier's confidence signal.
    pub score: Score,
    /// Which tier produced this resolution.
    pub source: TierKind,
    /// For semantic matches, the stored key whose vector matched.
    pub matched_key: Option<String>,
}

/// Confidence band a score falls into, per the decision policy cut-offs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl ConfidenceBand {
    /// Map a score to its band using the configured cut-offs.
    pub fn from_score(score: Score, policy: &PolicyConfig) -> Self {
        let value = score.value();
        if value >= policy.high_threshold {
            ConfidenceBand::High
        } else if value >= policy.low_threshold {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfidenceBand::Low => "low",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::High => "high",
        };
        f.write_str(s)
    }
}

/// What the caller should do with a categorization result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorizationAction {
    /// High confidence: apply the code without human review.
    AutoApply,
    /// Medium confidence: apply the code but queue it for review.
    FlagForReview,
    /// No suggestion worth applying. Any retained suggestion is advisory.
    LeaveUncategorized,
    /// Classification is temporarily refusing calls. Not a no-match;
    /// callers should queue the expense and retry later.
    Unavailable,
}

/// Final result of one categorization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizationOutcome {
    /// Unique id for this request, present in every log line it produced.
    pub request_id: Uuid,
    /// Normalized key the description resolved to.
    pub key: String,
    /// The winning tier's suggestion, when any tier resolved. Retained even
    /// for low-confidence results so callers can display it as a hint.
    pub suggestion: Option<TierResolution>,
    /// Band the suggestion's score fell into, when a suggestion exists.
    pub band: Option<ConfidenceBand>,
    /// What the caller should do.
    pub action: CategorizationAction,
    /// When the pipeline finished with this request.
    pub resolved_at: DateTime<Utc>,
}

impl CategorizationOutcome {
    /// True when the pipeline produced a code the caller should apply.
    pub fn is_applied(&self) -> bool {
        matches!(
            self.action,
            CategorizationAction::AutoApply | CategorizationAction::FlagForReview
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_policy_cutoffs() {
        let policy = PolicyConfig::default();
        assert_eq!(
            ConfidenceBand::from_score(Score::new(0.82), &policy),
            ConfidenceBand::High
        );
        assert_eq!(
            ConfidenceBand::from_score(Score::new(0.75), &policy),
            ConfidenceBand::High
        );
        assert_eq!(
            ConfidenceBand::from_score(Score::new(0.60), &policy),
            ConfidenceBand::Medium
        );
        assert_eq!(
            ConfidenceBand::from_score(Score::new(0.50), &policy),
            ConfidenceBand::Medium
        );
        assert_eq!(
            ConfidenceBand::from_score(Score::new(0.49), &policy),
            ConfidenceBand::Low
        );
    }

    #[test]
    fn tier_kind_display_matches_wire_names() {
        assert_eq!(TierKind::Exact.to_string(), "exact");
        assert_eq!(TierKind::Semantic.to_string(), "semantic");
        assert_eq!(TierKind::Remote.to_string(), "remote");
    }
}
