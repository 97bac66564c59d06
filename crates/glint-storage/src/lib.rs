//! # glint-storage
//!
//! SQLite persistence behind [`glint_core::traits::IExpenseStore`].
//! One write connection serialized behind a mutex, a small pool of
//! read connections, WAL mode throughout, and `user_version`-driven
//! migrations.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use glint_core::errors::{GlintError, StoreError};

/// Wrap a low-level SQLite failure into the storage error type.
pub(crate) fn to_storage_err(message: String) -> GlintError {
    StoreError::SqliteError { message }.into()
}
