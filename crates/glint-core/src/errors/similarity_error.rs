/// Errors from the embedding and similarity layer.
#[derive(Debug, thiserror::Error)]
pub enum SimilarityError {
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    #[error("embedding failed: {message}")]
    EmbeddingFailed { message: String },
}
