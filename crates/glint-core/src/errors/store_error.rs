/// Storage-layer errors for pattern, history, and usage persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("pattern not found: {key}")]
    PatternNotFound { key: String },

    #[error("no repository attached: {operation} requires durable storage")]
    RepositoryUnavailable { operation: String },
}
