//! Query modules, one per table family. All functions take a bare
//! `&Connection` so they compose under the caller's transaction.

pub mod embedding_ops;
pub mod feedback_ops;
pub mod history_ops;
pub mod pattern_ops;
pub mod usage_ops;
