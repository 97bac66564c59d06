//! # glint-inference
//!
//! Remote classification tier: the HTTP classifier client plus the
//! resilience layers that keep a flaky endpoint from taking the
//! pipeline down with it.
//!
//! - [`HttpClassifier`]: bare JSON-over-HTTP classify calls
//! - [`retry::with_retry`]: bounded retries with exponential backoff
//! - [`CircuitBreaker`]: rolling-window failure tracking
//! - [`ResilientClassifier`]: the assembled wrapper used by the engine

pub mod breaker;
pub mod client;
pub mod protocol;
pub mod resilient;
pub mod retry;

pub use breaker::{BreakerState, CircuitBreaker};
pub use client::HttpClassifier;
pub use protocol::{ClassifyRequest, ClassifyResponse, PROTOCOL_VERSION};
pub use resilient::ResilientClassifier;
pub use retry::with_retry;
