//! Feedback processing: human judgements flowing back into the store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use glint_core::models::{FeedbackEvent, FeedbackKind, Pattern};
use glint_core::traits::IExpenseStore;
use glint_core::GlintResult;

use crate::store::PatternStore;

/// What one feedback submission did to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackOutcome {
    /// The event as appended to the feedback log.
    pub event: FeedbackEvent,
    /// Pattern state after tallies (and any correction) were applied.
    pub pattern: Pattern,
    /// Whether this event pushed the pattern into suppression.
    pub newly_suppressed: bool,
}

/// Applies confirm/reject feedback to the pattern store and keeps the
/// durable logs consistent with it.
pub struct FeedbackManager {
    store: Arc<PatternStore>,
    repository: Option<Arc<dyn IExpenseStore>>,
}

impl FeedbackManager {
    pub fn new(store: Arc<PatternStore>, repository: Option<Arc<dyn IExpenseStore>>) -> Self {
        Self { store, repository }
    }

    /// Record a human judgement on a served prediction.
    ///
    /// `predicted == actual` counts as a confirmation; anything else is a
    /// rejection that also teaches the store the corrected code right away.
    /// History rows for the expense are confirmed (or corrected and then
    /// confirmed) so rebuild sees human-verified truth.
    pub fn submit(&self, key: &str, predicted: &str, actual: &str) -> GlintResult<FeedbackOutcome> {
        let event = FeedbackEvent::new(key, predicted, actual);
        let was_suppressed = self
            .store
            .get(key)
            .map(|p| p.suppressed)
            .unwrap_or(false);

        let pattern = match event.kind {
            FeedbackKind::Confirmed => self.store.record_feedback(key, FeedbackKind::Confirmed)?,
            FeedbackKind::Rejected => {
                self.store.record_feedback(key, FeedbackKind::Rejected)?;
                self.store.correct_code(key, actual)?
            }
        };

        if let Some(repository) = &self.repository {
            repository.append_feedback(&event)?;
            match event.kind {
                FeedbackKind::Confirmed => {
                    repository.confirm_history(key, predicted)?;
                }
                FeedbackKind::Rejected => {
                    repository.correct_history(key, predicted, actual)?;
                }
            }
        }

        let newly_suppressed = pattern.suppressed && !was_suppressed;
        info!(
            key,
            kind = ?event.kind,
            accuracy = ?pattern.accuracy(),
            newly_suppressed,
            "feedback applied"
        );
        Ok(FeedbackOutcome {
            event,
            pattern,
            newly_suppressed,
        })
    }
}
