use serde::{Deserialize, Serialize};

/// What the remote classifier is asked to categorize.
///
/// Carries the raw description rather than the normalized key: the model
/// benefits from the detail the normalizer strips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyInput {
    /// Raw transaction description.
    pub description: String,
    /// Expense amount, an additional signal for the model.
    pub amount: f64,
}

/// A remote classifier's answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// GL code the model assigned.
    pub gl_code: String,
    /// Model confidence in [0.0, 1.0].
    pub score: f64,
}
