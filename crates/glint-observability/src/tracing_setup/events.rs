//! Structured log events for key pipeline operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a resolved categorization.
pub fn categorization_resolved(request_id: &str, key: &str, tier: &str, gl_code: &str) {
    tracing::info!(
        event = "categorization_resolved",
        request_id = %request_id,
        key = %key,
        tier = %tier,
        gl_code = %gl_code,
        "categorization resolved"
    );
}

/// Log a categorization every tier missed on.
pub fn categorization_unresolved(request_id: &str, key: &str, action: &str) {
    tracing::info!(
        event = "categorization_unresolved",
        request_id = %request_id,
        key = %key,
        action = %action,
        "categorization unresolved"
    );
}

/// Log a feedback submission.
pub fn feedback_received(key: &str, kind: &str) {
    tracing::info!(
        event = "feedback_received",
        key = %key,
        kind = %kind,
        "feedback received"
    );
}

/// Log a manual pattern reactivation.
pub fn pattern_reactivated(key: &str) {
    tracing::info!(
        event = "pattern_reactivated",
        key = %key,
        "pattern reactivated"
    );
}

/// Log a completed pattern rebuild.
pub fn rebuild_completed(patterns: usize, embeddings: usize) {
    tracing::info!(
        event = "rebuild_completed",
        patterns = patterns,
        embeddings = embeddings,
        "pattern rebuild completed"
    );
}

/// Log a cache-warming import.
pub fn history_import_completed(rows: usize, patterns: usize) {
    tracing::info!(
        event = "history_import_completed",
        rows = rows,
        patterns = patterns,
        "historical expense import completed"
    );
}
