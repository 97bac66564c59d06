use async_trait::async_trait;

use crate::errors::GlintResult;
use crate::models::{Classification, ClassifyInput};

/// External classification capability, the last resort of the pipeline.
///
/// Implementations perform one bare call. Retries, timeouts, and circuit
/// breaking are layered on top by the resilience wrapper, so errors here
/// should map cleanly onto the inference error taxonomy.
#[async_trait]
pub trait IClassifier: Send + Sync {
    /// Classify one expense into a GL code with a confidence score.
    async fn classify(&self, input: &ClassifyInput) -> GlintResult<Classification>;

    /// Human-readable classifier name.
    fn name(&self) -> &str;
}
