//! Cache partitions and the writer stage.
//!
//! [`CacheStore`] is the seam between the pipeline and memcached: production
//! uses [`MemcacheStore`], dry runs a [`NoopStore`] table, tests a recording
//! mock. [`write_record`] is the single place run counters are incremented.

use anyhow::{Context, Result};
use log::{debug, error, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{DeviceType, EncodedRecord, PartitionAddrs, RunCounters};
use crate::utils::config::{CACHE_CONNECT_TIMEOUT_SECS, CACHE_TIMEOUT_SECS};

/// One cache partition: `set` either stores the value or fails for that
/// record only. Implementations must be safe for concurrent use; every worker
/// shares the same handle.
pub trait CacheStore: Send + Sync {
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// memcached-backed store. The client keeps a connection pool internally and
/// is documented safe for concurrent use, so one handle per partition is
/// shared across the worker pool.
pub struct MemcacheStore {
    client: memcache::Client,
}

impl MemcacheStore {
    /// Connect to one partition. Eager: a dead address fails here, at
    /// startup, not mid-run.
    pub fn connect(addr: &str) -> Result<Self> {
        let url = format!(
            "memcache://{addr}?timeout={CACHE_TIMEOUT_SECS}&connect_timeout={CACHE_CONNECT_TIMEOUT_SECS}"
        );
        let client = memcache::Client::connect(url)
            .with_context(|| format!("connect to memcached at {addr}"))?;
        Ok(Self { client })
    }
}

impl CacheStore for MemcacheStore {
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.client
            .set(key, value, 0)
            .with_context(|| format!("memcached set for key {key}"))?;
        Ok(())
    }
}

/// Store that accepts everything and writes nothing. Backs the dry-run table
/// so `--dry` needs no live memcached.
pub struct NoopStore;

impl CacheStore for NoopStore {
    fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// Device type → cache handle. Built once at startup, read-only afterwards;
/// workers share it without locking.
pub struct PartitionTable {
    stores: HashMap<DeviceType, Arc<dyn CacheStore>>,
}

impl PartitionTable {
    /// Connect every partition. Any connect failure aborts the run before
    /// processing begins.
    pub fn connect(addrs: &PartitionAddrs) -> Result<Self> {
        let mut stores: HashMap<DeviceType, Arc<dyn CacheStore>> = HashMap::new();
        for device in DeviceType::ALL {
            let addr = addrs.addr(device);
            let store = MemcacheStore::connect(addr)
                .with_context(|| format!("init {device} partition"))?;
            debug!("Connected {} partition at {}", device, addr);
            stores.insert(device, Arc::new(store));
        }
        Ok(Self { stores })
    }

    /// Table mapping every device type to a [`NoopStore`], for dry runs.
    pub fn noop() -> Self {
        let stores = DeviceType::ALL
            .into_iter()
            .map(|device| (device, Arc::new(NoopStore) as Arc<dyn CacheStore>))
            .collect();
        Self { stores }
    }

    /// Build from explicit handles (tests, or partial tables to exercise the
    /// config-drift path).
    pub fn from_stores(stores: HashMap<DeviceType, Arc<dyn CacheStore>>) -> Self {
        Self { stores }
    }

    pub fn get(&self, device: DeviceType) -> Option<&Arc<dyn CacheStore>> {
        self.stores.get(&device)
    }
}

/// Writer stage: send one encoded record to its partition.
///
/// Counting contract: every attempt (dry or real) increments `processed`
/// exactly once; every failed write increments `errors` exactly once. All
/// failures are non-fatal, the next record proceeds.
pub fn write_record(
    record: &EncodedRecord,
    table: &PartitionTable,
    counters: &RunCounters,
    dry_run: bool,
) {
    counters.add_processed();
    if dry_run {
        debug!("Dry run: skipped set for key {}", record.cache_key);
        return;
    }
    let Some(store) = table.get(record.partition) else {
        // Unexpected device type in the table means config or data drift.
        error!(
            "No cache partition configured for {} (key {}), dropping record",
            record.partition, record.cache_key
        );
        counters.add_error();
        return;
    };
    match store.set(&record.cache_key, &record.payload) {
        Ok(()) => debug!("Saved key {}", record.cache_key),
        Err(err) => {
            warn!("Error saving key {}: {err:#}", record.cache_key);
            counters.add_error();
        }
    }
}
