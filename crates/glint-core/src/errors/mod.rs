pub mod inference_error;
pub mod similarity_error;
pub mod store_error;

pub use inference_error::InferenceError;
pub use similarity_error::SimilarityError;
pub use store_error::StoreError;

/// Top-level error type. Subsystem errors convert into it with `?`.
#[derive(Debug, thiserror::Error)]
pub enum GlintError {
    #[error("store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("similarity error: {0}")]
    SimilarityError(#[from] SimilarityError),

    #[error("inference error: {0}")]
    InferenceError(#[from] InferenceError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigError(#[from] toml::de::Error),

    /// A cross-component invariant broke mid-request, e.g. a similarity hit
    /// referencing a pattern that no longer exists. Fatal to the single
    /// request only.
    #[error("data inconsistency: {message}")]
    DataInconsistency { message: String },
}

impl GlintError {
    /// Whether the underlying failure is worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            GlintError::InferenceError(e) => e.is_transient(),
            _ => false,
        }
    }
}

pub type GlintResult<T> = Result<T, GlintError>;
