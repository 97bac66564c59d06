//! Decision policy: scores to bands to caller actions.
//!
//! Banding itself lives on [`ConfidenceBand::from_score`]; this module
//! maps bands to actions and assembles the final outcome shapes.

use chrono::Utc;
use uuid::Uuid;

use glint_core::config::PolicyConfig;
use glint_core::models::{
    CategorizationAction, CategorizationOutcome, ConfidenceBand, TierResolution,
};

/// Action for a band: high confidence applies silently, medium applies
/// but queues for review, low keeps the suggestion advisory only.
pub fn action_for_band(band: ConfidenceBand) -> CategorizationAction {
    match band {
        ConfidenceBand::High => CategorizationAction::AutoApply,
        ConfidenceBand::Medium => CategorizationAction::FlagForReview,
        ConfidenceBand::Low => CategorizationAction::LeaveUncategorized,
    }
}

/// Wire name of an action, for structured logs.
pub fn action_name(action: CategorizationAction) -> &'static str {
    match action {
        CategorizationAction::AutoApply => "auto_apply",
        CategorizationAction::FlagForReview => "flag_for_review",
        CategorizationAction::LeaveUncategorized => "leave_uncategorized",
        CategorizationAction::Unavailable => "unavailable",
    }
}

/// Outcome for a tier resolution, banded per `policy`. The suggestion
/// is retained whatever the band; a low score only demotes the action.
pub fn resolved(
    request_id: Uuid,
    key: &str,
    resolution: TierResolution,
    policy: &PolicyConfig,
) -> CategorizationOutcome {
    let band = ConfidenceBand::from_score(resolution.score, policy);
    CategorizationOutcome {
        request_id,
        key: key.to_string(),
        suggestion: Some(resolution),
        band: Some(band),
        action: action_for_band(band),
        resolved_at: Utc::now(),
    }
}

/// Outcome when every tier missed: no suggestion, no band.
pub fn unresolved(request_id: Uuid, key: &str) -> CategorizationOutcome {
    CategorizationOutcome {
        request_id,
        key: key.to_string(),
        suggestion: None,
        band: None,
        action: CategorizationAction::LeaveUncategorized,
        resolved_at: Utc::now(),
    }
}

/// Outcome when classification is refusing calls. Distinct from a
/// no-match so callers can queue the expense and retry later.
pub fn unavailable(request_id: Uuid, key: &str) -> CategorizationOutcome {
    CategorizationOutcome {
        request_id,
        key: key.to_string(),
        suggestion: None,
        band: None,
        action: CategorizationAction::Unavailable,
        resolved_at: Utc::now(),
    }
}
