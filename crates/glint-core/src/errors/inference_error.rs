/// Errors from the remote classification layer.
///
/// Transient variants are retried; everything else aborts the attempt loop
/// immediately.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("transient classifier failure: {message}")]
    Transient { message: String },

    #[error("classifier call timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("categorization unavailable: circuit open for {remaining_secs}s")]
    CircuitOpen { remaining_secs: u64 },

    #[error("classifier rejected the request: {message}")]
    Rejected { message: String },

    #[error("malformed classifier response: {message}")]
    Protocol { message: String },
}

impl InferenceError {
    /// Whether a retry has any chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            InferenceError::Transient { .. } | InferenceError::Timeout { .. }
        )
    }
}
