/// Glint system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sentinel key produced by the normalizer when a description has no
/// alphabetic content at all. Stored and matched like any other key.
pub const UNKNOWN_KEY: &str = "unknown";

/// Maximum batch size for bulk warm-up imports.
pub const MAX_WARM_BATCH_SIZE: usize = 1000;
