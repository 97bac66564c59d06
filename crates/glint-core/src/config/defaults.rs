//! Default values for every tunable. Config files override these per field.

// Suppression
pub const DEFAULT_MAX_REJECT_COUNT: u64 = 3;
pub const DEFAULT_MIN_FEEDBACK_SAMPLES: u64 = 5;
pub const DEFAULT_MIN_ACCURACY: f64 = 0.30;

// Similarity
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.85;
pub const DEFAULT_EMBED_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_EMBED_CACHE_TTL_SECS: u64 = 3_600;

// Resilience
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 1_000;
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_FAILURE_RATIO: f64 = 0.5;
pub const DEFAULT_SAMPLE_WINDOW_SECS: u64 = 30;
pub const DEFAULT_MIN_SAMPLES: usize = 5;
pub const DEFAULT_OPEN_DURATION_SECS: u64 = 60;

// Decision policy
pub const DEFAULT_LOW_THRESHOLD: f64 = 0.50;
pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.75;
pub const DEFAULT_BOOTSTRAP_SCORE: f64 = 0.60;

// Usage tracking
pub const DEFAULT_USAGE_MAX_RECORDS: usize = 50_000;
pub const DEFAULT_USAGE_WINDOW_SECS: u64 = 3_600;
pub const DEFAULT_REMOTE_CALL_COST: f64 = 1.0;

// Remote classifier
pub const DEFAULT_REMOTE_ENDPOINT: &str = "http://127.0.0.1:8787/v1/classify";
