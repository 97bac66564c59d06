//! # glint-observability
//!
//! Operational visibility for the categorization pipeline:
//!
//! - [`usage`]: the in-memory tier usage ring and windowed summaries
//! - [`alerting`]: alert evaluation over summaries (pipeline stalls)
//! - [`tracing_setup`]: subscriber init, span macros, structured events

pub mod alerting;
pub mod tracing_setup;
pub mod usage;

pub use alerting::UsageAlert;
pub use tracing_setup::{init_tracing, init_tracing_with_filter};
pub use usage::UsageTracker;
