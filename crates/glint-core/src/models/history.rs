use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One categorized expense in the durable history log.
///
/// Every resolved categorization appends an unconfirmed entry. Feedback
/// later confirms it (or corrects its code and confirms it), and rebuild
/// scans only confirmed entries, so the store can always be reconstructed
/// from human-verified truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// UUID v4 identifier.
    pub id: Uuid,
    /// Normalized key of the expense.
    pub key: String,
    /// Raw description as submitted.
    pub description: String,
    /// Expense amount.
    pub amount: f64,
    /// GL code on record for this expense.
    pub gl_code: String,
    /// Whether a human has verified the code.
    pub confirmed: bool,
    /// When the entry was appended.
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        gl_code: impl Into<String>,
        confirmed: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            description: description.into(),
            amount,
            gl_code: gl_code.into(),
            confirmed,
            recorded_at: Utc::now(),
        }
    }
}

/// An already-coded expense row from an external system, used to warm the
/// pattern store and embedding index before any live traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalExpense {
    /// When the expense occurred.
    pub occurred_at: DateTime<Utc>,
    /// Raw transaction description.
    pub description: String,
    /// Vendor name, when the source system tracked one separately.
    pub vendor: Option<String>,
    /// Expense amount.
    pub amount: f64,
    /// GL code assigned in the source system. Treated as confirmed truth.
    pub gl_code: String,
    /// Department the expense was booked under.
    pub department: Option<String>,
}
