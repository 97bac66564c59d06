use async_trait::async_trait;

use crate::errors::GlintResult;

/// External embedding capability.
///
/// Vector generation happens outside the engine; implementations wrap
/// whatever service or model produces the vectors. Returned vectors are not
/// assumed to be normalized, the similarity layer normalizes on intake.
#[async_trait]
pub trait IEmbedder: Send + Sync {
    /// Embed a single text, returning a vector of floats.
    async fn embed(&self, text: &str) -> GlintResult<Vec<f32>>;

    /// The dimensionality of vectors produced by this embedder.
    fn dimensions(&self) -> usize;

    /// Human-readable embedder name.
    fn name(&self) -> &str;
}
