use glint_core::errors::*;

#[test]
fn store_error_pattern_not_found_carries_key() {
    let err = StoreError::PatternNotFound {
        key: "starbucks".into(),
    };
    assert!(err.to_string().contains("starbucks"));
}

#[test]
fn store_error_migration_failed_carries_version() {
    let err = StoreError::MigrationFailed {
        version: 2,
        reason: "syntax error".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("2"));
    assert!(msg.contains("syntax error"));
}

#[test]
fn similarity_error_dimension_mismatch_carries_values() {
    let err = SimilarityError::DimensionMismatch {
        expected: 1536,
        actual: 768,
    };
    let msg = err.to_string();
    assert!(msg.contains("1536"));
    assert!(msg.contains("768"));
}

#[test]
fn inference_error_circuit_open_carries_remaining_time() {
    let err = InferenceError::CircuitOpen { remaining_secs: 42 };
    let msg = err.to_string();
    assert!(msg.contains("unavailable"));
    assert!(msg.contains("42"));
}

// --- Transience classification ---

#[test]
fn transient_and_timeout_are_retryable() {
    assert!(InferenceError::Transient {
        message: "503".into()
    }
    .is_transient());
    assert!(InferenceError::Timeout { elapsed_ms: 10_000 }.is_transient());
}

#[test]
fn circuit_open_and_rejection_are_not_retryable() {
    assert!(!InferenceError::CircuitOpen { remaining_secs: 60 }.is_transient());
    assert!(!InferenceError::Rejected {
        message: "unsupported currency".into()
    }
    .is_transient());
    assert!(!InferenceError::Protocol {
        message: "missing gl_code field".into()
    }
    .is_transient());
}

// --- From impls ---

#[test]
fn store_error_converts_to_glint_error() {
    let store_err = StoreError::SqliteError {
        message: "disk full".into(),
    };
    let glint_err: GlintError = store_err.into();
    assert!(matches!(glint_err, GlintError::StoreError(_)));
}

#[test]
fn similarity_error_converts_to_glint_error() {
    let sim_err = SimilarityError::DimensionMismatch {
        expected: 1536,
        actual: 3,
    };
    let glint_err: GlintError = sim_err.into();
    assert!(matches!(glint_err, GlintError::SimilarityError(_)));
}

#[test]
fn inference_error_converts_to_glint_error_and_keeps_transience() {
    let inf_err = InferenceError::Transient {
        message: "connection reset".into(),
    };
    let glint_err: GlintError = inf_err.into();
    assert!(glint_err.is_transient());

    let open: GlintError = InferenceError::CircuitOpen { remaining_secs: 60 }.into();
    assert!(!open.is_transient());
}

#[test]
fn serialization_error_converts_to_glint_error() {
    let json_err = serde_json::from_str::<String>("not valid json").unwrap_err();
    let glint_err: GlintError = json_err.into();
    assert!(matches!(glint_err, GlintError::SerializationError(_)));
}

#[test]
fn data_inconsistency_is_not_transient() {
    let err = GlintError::DataInconsistency {
        message: "match references missing pattern".into(),
    };
    assert!(!err.is_transient());
    assert!(err.to_string().contains("missing pattern"));
}
