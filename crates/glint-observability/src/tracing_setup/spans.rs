//! Span definitions per operation: categorize, feedback, rebuild, warm.
//!
//! Each span carries duration, result, and metadata via the `tracing` crate.

/// Create a categorization span.
#[macro_export]
macro_rules! categorize_span {
    ($request_id:expr, $key:expr) => {
        tracing::info_span!("glint.categorize", request_id = %$request_id, key = %$key)
    };
}

/// Create a feedback span.
#[macro_export]
macro_rules! feedback_span {
    ($key:expr) => {
        tracing::info_span!("glint.feedback", key = %$key)
    };
}

/// Create a rebuild span.
#[macro_export]
macro_rules! rebuild_span {
    ($entries:expr) => {
        tracing::info_span!("glint.rebuild", entries = $entries)
    };
}

/// Create a cache-warming span.
#[macro_export]
macro_rules! warm_span {
    ($rows:expr) => {
        tracing::info_span!("glint.warm", rows = $rows)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const CATEGORIZE: &str = "glint.categorize";
    pub const FEEDBACK: &str = "glint.feedback";
    pub const REBUILD: &str = "glint.rebuild";
    pub const WARM: &str = "glint.warm";
}
