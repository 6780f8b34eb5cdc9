//! Application configuration constants.
//! Tuning and thresholds in one place.

// ---- Health decision ----

/// Error rate (errors / processed) below which a run is a successful load.
pub const NORMAL_ERROR_RATE: f64 = 0.01;

// ---- Streaming channel cap ----

/// Raw-line channel capacity between the decode thread and the worker pool.
/// Bounded so a slow writer stage backpressures decompression handoff instead
/// of buffering a whole file's lines twice.
pub const LINE_CHANNEL_CAP: usize = 10_000;

// ---- Cache client ----

/// IO timeout for memcached operations (seconds). Bounds every `set` so one
/// unresponsive partition cannot stall the run.
pub const CACHE_TIMEOUT_SECS: u64 = 10;

/// TCP connect timeout when building the partition table at startup (seconds).
pub const CACHE_CONNECT_TIMEOUT_SECS: u64 = 5;

// ---- File lifecycle ----

/// Prefix applied to a file's base name after it is fully drained. Dot-prefixed
/// files are excluded from discovery on the next run.
pub const PROCESSED_PREFIX: &str = ".";
