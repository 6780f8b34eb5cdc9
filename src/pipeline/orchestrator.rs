//! Run orchestration: discovery, per-file decode + worker pool, lifecycle,
//! and the end-of-run summary.

use anyhow::{Result, anyhow};
use crossbeam_channel::{Receiver, TryRecvError, bounded};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::cache::PartitionTable;
use crate::types::{LoadSummary, Opts, RawRecord, RunCounters};
use crate::utils::config::LINE_CHANNEL_CAP;

use super::context::PipelineContext;
use super::decode::{discover_files, spawn_decode_thread};
use super::lifecycle::mark_processed;
use super::worker::spawn_line_workers;

/// Run one full load: discover files, drain each through the pipeline, mark
/// drained files processed, and return the totals.
///
/// Only discovery can fail here (fatal configuration error). File-level
/// failures are logged and skipped; the run continues with the remaining
/// files. `stop` aborts between files and unwinds in-flight stages.
pub fn run_load(opts: &Opts, table: Arc<PartitionTable>, stop: Receiver<()>) -> Result<LoadSummary> {
    let files = discover_files(&opts.pattern)?;
    if files.is_empty() {
        info!("No input files match {}", opts.pattern);
    }

    let counters = Arc::new(RunCounters::default());
    let ctx = PipelineContext {
        table,
        counters: Arc::clone(&counters),
        dry_run: opts.dry_run,
        stop,
    };

    // Zero workers would drop every receiver up front and drain files into
    // nothing while still marking them processed.
    let workers = opts.workers.max(1);

    let mut drained = 0_usize;
    for path in &files {
        info!("Found file: {}", path.display());
        match process_file(path, workers, &ctx) {
            Ok(records) => {
                // A file interrupted by the stop signal was not fully drained
                // and must stay un-renamed so the next run picks it up.
                if stop_fired(&ctx.stop) {
                    warn!("Stop signal received, leaving {} unmarked", path.display());
                    break;
                }
                drained += 1;
                debug!("Drained {} records from {}", records, path.display());
                match mark_processed(path) {
                    Ok(new_path) => info!("Renamed file: {}", new_path.display()),
                    Err(err) => warn!("Can not rename file: {err:#}"),
                }
            }
            Err(err) => warn!("Skipping {}: {err:#}", path.display()),
        }
        if stop_fired(&ctx.stop) {
            warn!("Stop signal received, aborting remaining files");
            break;
        }
    }

    Ok(LoadSummary {
        files: drained,
        processed: counters.processed(),
        errors: counters.errors(),
    })
}

/// True once the stop sender has been dropped (the channel never carries a
/// message, disconnect is the broadcast).
fn stop_fired(stop: &Receiver<()>) -> bool {
    matches!(stop.try_recv(), Err(TryRecvError::Disconnected))
}

/// Drain one file: decode thread → bounded line channel → worker pool.
///
/// Join order is the drain guarantee: the decode thread returning means every
/// record was handed off (or the run was stopped), and joining the workers
/// after the channel closes means every record was consumed. Only then may
/// the caller rename the file. Returns the record count sent downstream.
fn process_file(path: &Path, workers: usize, ctx: &PipelineContext) -> Result<usize> {
    let (line_tx, line_rx) = bounded::<RawRecord>(LINE_CHANNEL_CAP);

    let decode_handle = spawn_decode_thread(path.to_path_buf(), line_tx, ctx.stop.clone());
    let worker_handles = spawn_line_workers(line_rx, ctx, workers);

    let decoded = decode_handle
        .join()
        .map_err(|_| anyhow!("decode thread panicked"))?;
    for handle in worker_handles {
        let _ = handle.join();
    }
    decoded
}
