use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a human judged a served prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    /// The predicted code matched what the human chose.
    Confirmed,
    /// The human chose a different code.
    Rejected,
}

impl FeedbackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackKind::Confirmed => "confirmed",
            FeedbackKind::Rejected => "rejected",
        }
    }

    /// Inverse of [`FeedbackKind::as_str`], for decoding stored rows.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(FeedbackKind::Confirmed),
            "rejected" => Some(FeedbackKind::Rejected),
            _ => None,
        }
    }
}

/// One human judgement on a prediction, as appended to the feedback log.
///
/// The log is replayed during rebuild to reconstruct confirm/reject tallies,
/// so events are immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEvent {
    /// UUID v4 identifier.
    pub id: Uuid,
    /// Normalized key the prediction was served for.
    pub key: String,
    /// GL code the system predicted.
    pub predicted_gl_code: String,
    /// GL code the human settled on.
    pub actual_gl_code: String,
    /// Confirmed or rejected.
    pub kind: FeedbackKind,
    /// When the judgement was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl FeedbackEvent {
    /// Build an event, deriving the kind from predicted/actual equality.
    pub fn new(
        key: impl Into<String>,
        predicted_gl_code: impl Into<String>,
        actual_gl_code: impl Into<String>,
    ) -> Self {
        let predicted = predicted_gl_code.into();
        let actual = actual_gl_code.into();
        let kind = if predicted == actual {
            FeedbackKind::Confirmed
        } else {
            FeedbackKind::Rejected
        };
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            predicted_gl_code: predicted,
            actual_gl_code: actual,
            kind,
            recorded_at: Utc::now(),
        }
    }
}
