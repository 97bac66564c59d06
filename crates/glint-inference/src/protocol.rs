//! Versioned wire protocol for the remote classifier, JSON over HTTP.

use chrono::{DateTime, Utc};
use glint_core::errors::InferenceError;
use glint_core::models::{Classification, ClassifyInput};
use serde::{Deserialize, Serialize};

/// Current protocol version.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Request envelope sent to the classifier endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// Protocol version for forward compatibility.
    pub version: String,
    /// Unique request ID for tracing.
    pub request_id: String,
    /// Timestamp of the request.
    pub timestamp: DateTime<Utc>,
    /// Expense description, as captured upstream.
    pub description: String,
    /// Expense amount.
    pub amount: f64,
}

/// Response envelope returned by the classifier endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Protocol version.
    pub version: String,
    /// Echoed request ID.
    pub request_id: String,
    /// Whether the classifier produced a result.
    pub success: bool,
    /// Error message if `success` is false.
    pub error: Option<String>,
    /// The classification, present on success.
    pub classification: Option<Classification>,
}

impl ClassifyRequest {
    /// Build a request envelope for one expense.
    pub fn new(input: &ClassifyInput) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            description: input.description.clone(),
            amount: input.amount,
        }
    }
}

impl ClassifyResponse {
    /// Create a success response.
    pub fn ok(request_id: String, classification: Classification) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            request_id,
            success: true,
            error: None,
            classification: Some(classification),
        }
    }

    /// Create an error response.
    pub fn err(request_id: String, error: String) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            request_id,
            success: false,
            error: Some(error),
            classification: None,
        }
    }

    /// Unwrap the envelope into a classification.
    ///
    /// A success flag without a classification, or a non-finite score,
    /// is a protocol violation rather than a classifier rejection.
    pub fn into_classification(self) -> Result<Classification, InferenceError> {
        if !self.success {
            return Err(InferenceError::Rejected {
                message: self
                    .error
                    .unwrap_or_else(|| "classifier gave no reason".to_string()),
            });
        }
        let classification = self.classification.ok_or_else(|| InferenceError::Protocol {
            message: format!("success response {} carried no classification", self.request_id),
        })?;
        if !classification.score.is_finite() {
            return Err(InferenceError::Protocol {
                message: format!("non-finite score in response {}", self.request_id),
            });
        }
        Ok(classification)
    }
}
