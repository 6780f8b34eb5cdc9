//! memcload: concurrent loader for appsinstalled logs into memcached partitions.

pub mod cache;
pub mod engine;
pub mod parse;
pub mod payload;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use std::sync::Arc;

use cache::PartitionTable;

/// Result alias used by public memcload API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: drain every file matching `opts.pattern` into `table`
/// and return the run totals. Drained files are renamed with the processed
/// marker; files that fail to open or decompress are skipped and left in
/// place.
///
/// Lib callers get no Ctrl-C handling; the pipeline runs to completion. Use
/// [`pipeline::run_load`] directly to pass your own stop channel.
pub fn load_files(opts: &Opts, table: Arc<PartitionTable>) -> Result<LoadSummary> {
    // Held until the run finishes so the stop signal never fires.
    let (_stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);
    pipeline::run_load(opts, table, stop_rx)
}
