//! Public and internal types for the memcload API and pipeline.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::utils::config::NORMAL_ERROR_RATE;

/// One line of decompressed input, prior to parsing. Empty records are valid
/// and skipped by the parser.
pub type RawRecord = Vec<u8>;

/// Device-identifier category. One cache partition per variant.
///
/// Explicit enumerated set; a record with a type outside it is a parse
/// failure, never routed anywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Idfa,
    Gaid,
    Adid,
    Dvid,
}

impl DeviceType {
    pub const ALL: [DeviceType; 4] = [
        DeviceType::Idfa,
        DeviceType::Gaid,
        DeviceType::Adid,
        DeviceType::Dvid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Idfa => "idfa",
            DeviceType::Gaid => "gaid",
            DeviceType::Adid => "adid",
            DeviceType::Dvid => "dvid",
        }
    }

    /// Parse a device-type field. `None` for anything outside the fixed set.
    pub fn parse(s: &str) -> Option<DeviceType> {
        match s {
            "idfa" => Some(DeviceType::Idfa),
            "gaid" => Some(DeviceType::Gaid),
            "adid" => Some(DeviceType::Adid),
            "dvid" => Some(DeviceType::Dvid),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// memcached `host:port` per device type. Built once from the CLI; explicit
/// mapping instead of iterating config fields by name.
#[derive(Clone, Debug)]
pub struct PartitionAddrs {
    pub idfa: String,
    pub gaid: String,
    pub adid: String,
    pub dvid: String,
}

impl PartitionAddrs {
    pub fn addr(&self, device: DeviceType) -> &str {
        match device {
            DeviceType::Idfa => &self.idfa,
            DeviceType::Gaid => &self.gaid,
            DeviceType::Adid => &self.adid,
            DeviceType::Dvid => &self.dvid,
        }
    }
}

impl Default for PartitionAddrs {
    fn default() -> Self {
        Self {
            idfa: "127.0.0.1:33013".to_string(),
            gaid: "127.0.0.1:33014".to_string(),
            adid: "127.0.0.1:33015".to_string(),
            dvid: "127.0.0.1:33016".to_string(),
        }
    }
}

/// Full options for a load run (CLI and lib).
#[derive(Clone, Debug)]
pub struct Opts {
    /// Glob for input files, e.g. `/data/appsinstalled/*.tsv.gz`.
    pub pattern: String,
    /// Parse and count without writing to memcached.
    pub dry_run: bool,
    /// Worker threads per file.
    pub workers: usize,
    /// Per-device-type memcached addresses.
    pub addrs: PartitionAddrs,
    /// Verbose output.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            pattern: "/data/appsinstalled/*.tsv.gz".to_string(),
            dry_run: false,
            workers: 30,
            addrs: PartitionAddrs::default(),
            verbose: false,
        }
    }
}

/// One parsed appsinstalled event (transient, in-memory only).
///
/// `lat`/`lon` are `None` when the source fields were unparseable; a bad
/// coordinate does not discard the event. `apps` holds only the tokens that
/// parsed as `u32`, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct AppsInstalled {
    pub device_type: DeviceType,
    pub device_id: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub apps: Vec<u32>,
}

impl AppsInstalled {
    /// Cache key: device type and device id concatenated with no separator.
    /// Fixed rule; every reader of the cache depends on it.
    pub fn cache_key(&self) -> String {
        format!("{}{}", self.device_type.as_str(), self.device_id)
    }
}

/// Output of parse + encode: ready for the writer, consumed exactly once.
#[derive(Clone, Debug)]
pub struct EncodedRecord {
    pub cache_key: String,
    pub partition: DeviceType,
    pub payload: Vec<u8>,
}

/// Process-wide write accounting, shared by all workers. Relaxed atomic
/// increments (only the end-of-run totals are read) so no updates are lost
/// under concurrency.
#[derive(Debug, Default)]
pub struct RunCounters {
    processed: AtomicU64,
    errors: AtomicU64,
}

impl RunCounters {
    pub fn add_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

/// End-of-run totals and the health decision derived from them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadSummary {
    /// Files fully drained (and so marked processed, rename permitting).
    pub files: usize,
    pub processed: u64,
    pub errors: u64,
}

impl LoadSummary {
    /// `errors / processed`, or `None` when nothing was processed.
    pub fn error_rate(&self) -> Option<f64> {
        (self.processed > 0).then(|| self.errors as f64 / self.processed as f64)
    }

    /// Advisory health signal: an empty run counts as successful; otherwise
    /// the rate must stay under [`NORMAL_ERROR_RATE`].
    pub fn is_acceptable(&self) -> bool {
        match self.error_rate() {
            None => true,
            Some(rate) => rate < NORMAL_ERROR_RATE,
        }
    }
}
