pub mod classification;
pub mod embedding_record;
pub mod feedback;
pub mod history;
pub mod outcome;
pub mod pattern;
pub mod score;
pub mod usage;

pub use classification::{Classification, ClassifyInput};
pub use embedding_record::EmbeddingRecord;
pub use feedback::{FeedbackEvent, FeedbackKind};
pub use history::{HistoricalExpense, HistoryEntry};
pub use outcome::{
    CategorizationAction, CategorizationOutcome, ConfidenceBand, TierKind, TierResolution,
};
pub use pattern::Pattern;
pub use score::Score;
pub use usage::{TierUsage, TierUsageRecord, UsageSummary};
