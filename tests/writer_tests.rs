use memcload::cache::{CacheStore, PartitionTable, write_record};
use memcload::types::{DeviceType, EncodedRecord, LoadSummary, RunCounters};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;

/// Records every set; optionally fails each call.
#[derive(Default)]
struct MockStore {
    sets: Mutex<Vec<(String, Vec<u8>)>>,
    fail: bool,
}

impl MockStore {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn set_count(&self) -> usize {
        self.sets.lock().unwrap().len()
    }
}

impl CacheStore for MockStore {
    fn set(&self, key: &str, value: &[u8]) -> memcload::Result<()> {
        if self.fail {
            anyhow::bail!("mock store failure");
        }
        self.sets
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_vec()));
        Ok(())
    }
}

fn table_with(device: DeviceType, store: Arc<MockStore>) -> PartitionTable {
    let mut stores: HashMap<DeviceType, Arc<dyn CacheStore>> = HashMap::new();
    stores.insert(device, store);
    PartitionTable::from_stores(stores)
}

fn record(device: DeviceType, key: &str) -> EncodedRecord {
    EncodedRecord {
        cache_key: key.to_string(),
        partition: device,
        payload: vec![1, 2, 3],
    }
}

// --- write_record counting contract ---

#[test]
fn test_write_success_counts_processed_only() {
    let store = Arc::new(MockStore::default());
    let table = table_with(DeviceType::Idfa, Arc::clone(&store));
    let counters = RunCounters::default();

    write_record(&record(DeviceType::Idfa, "idfadev1"), &table, &counters, false);

    assert_eq!(counters.processed(), 1);
    assert_eq!(counters.errors(), 0);
    let sets = store.sets.lock().unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].0, "idfadev1");
    assert_eq!(sets[0].1, vec![1, 2, 3]);
}

#[test]
fn test_write_failure_counts_error_and_continues() {
    let store = Arc::new(MockStore::failing());
    let table = table_with(DeviceType::Gaid, Arc::clone(&store));
    let counters = RunCounters::default();

    write_record(&record(DeviceType::Gaid, "gaiddev1"), &table, &counters, false);
    write_record(&record(DeviceType::Gaid, "gaiddev2"), &table, &counters, false);

    assert_eq!(counters.processed(), 2);
    assert_eq!(counters.errors(), 2);
}

#[test]
fn test_dry_run_counts_without_network_call() {
    // A failing store proves no set happens: dry run never reaches it.
    let store = Arc::new(MockStore::failing());
    let table = table_with(DeviceType::Adid, Arc::clone(&store));
    let counters = RunCounters::default();

    write_record(&record(DeviceType::Adid, "adiddev1"), &table, &counters, true);

    assert_eq!(counters.processed(), 1);
    assert_eq!(counters.errors(), 0);
    assert_eq!(store.set_count(), 0);
}

#[test]
fn test_missing_partition_is_a_record_error() {
    let store = Arc::new(MockStore::default());
    let table = table_with(DeviceType::Idfa, Arc::clone(&store));
    let counters = RunCounters::default();

    write_record(&record(DeviceType::Dvid, "dviddev1"), &table, &counters, false);

    assert_eq!(counters.processed(), 1);
    assert_eq!(counters.errors(), 1);
    assert_eq!(store.set_count(), 0);
}

// --- counters under concurrency ---

#[test]
fn test_counters_no_lost_updates() {
    const WORKERS: usize = 8;
    const PER_WORKER: usize = 500;

    let table = Arc::new(PartitionTable::noop());
    let counters = Arc::new(RunCounters::default());

    let handles: Vec<_> = (0..WORKERS)
        .map(|w| {
            let table = Arc::clone(&table);
            let counters = Arc::clone(&counters);
            thread::spawn(move || {
                for i in 0..PER_WORKER {
                    let rec = record(DeviceType::Idfa, &format!("idfadev{w}x{i}"));
                    write_record(&rec, &table, &counters, false);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(counters.processed(), (WORKERS * PER_WORKER) as u64);
    assert_eq!(counters.errors(), 0);
}

// --- error-rate decision ---

#[test]
fn test_error_rate_zero_is_successful() {
    let summary = LoadSummary {
        files: 1,
        processed: 100,
        errors: 0,
    };
    assert_eq!(summary.error_rate(), Some(0.0));
    assert!(summary.is_acceptable());
}

#[test]
fn test_error_rate_above_threshold_is_failed() {
    let summary = LoadSummary {
        files: 1,
        processed: 100,
        errors: 2,
    };
    assert_eq!(summary.error_rate(), Some(0.02));
    assert!(!summary.is_acceptable());
}

#[test]
fn test_error_rate_at_threshold_is_failed() {
    let summary = LoadSummary {
        files: 1,
        processed: 100,
        errors: 1,
    };
    assert_eq!(summary.error_rate(), Some(0.01));
    assert!(!summary.is_acceptable());
}

#[test]
fn test_empty_run_has_undefined_rate_and_is_successful() {
    let summary = LoadSummary {
        files: 0,
        processed: 0,
        errors: 0,
    };
    assert_eq!(summary.error_rate(), None);
    assert!(summary.is_acceptable());
}
