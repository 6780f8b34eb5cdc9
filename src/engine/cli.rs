//! CLI run handler: load by default; --dry counts records without writing.

use anyhow::Result;
use crossbeam_channel::bounded;
use log::{error, info, warn};
use std::sync::{Arc, Mutex};

use crate::cache::PartitionTable;
use crate::engine::arg_parser::Cli;
use crate::pipeline::run_load;
use crate::types::LoadSummary;
use crate::utils::config::NORMAL_ERROR_RATE;
use crate::utils::setup_logging;

/// Run a full load. Startup failures (bad glob, dead partition address) are
/// fatal; everything past startup soft-fails and is reflected in the summary.
/// The exit code stays 0 regardless of error rate; the classification is an
/// advisory log signal for operators.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = cli.to_opts();
    setup_logging(opts.verbose);

    let table = if opts.dry_run {
        warn!("RUNNING IN DRY MODE. NO RECORDS WILL BE WRITTEN TO MEMCACHE.");
        PartitionTable::noop()
    } else {
        PartitionTable::connect(&opts.addrs)?
    };

    // Broadcast stop: the handler drops the only sender, which closes the
    // channel and wakes every blocked send/receive in the pipeline.
    let (stop_tx, stop_rx) = bounded::<()>(0);
    let stop_cell = Arc::new(Mutex::new(Some(stop_tx)));
    {
        let cell = Arc::clone(&stop_cell);
        if let Err(err) = ctrlc::set_handler(move || {
            let _ = cell.lock().unwrap().take();
        }) {
            warn!("Could not install Ctrl-C handler: {err}");
        }
    }

    let summary = run_load(&opts, Arc::new(table), stop_rx)?;
    log_summary(&summary);
    Ok(())
}

fn log_summary(summary: &LoadSummary) {
    match summary.error_rate() {
        None => info!("Nothing processed. Successful (empty) load"),
        Some(rate) if summary.is_acceptable() => {
            info!("Acceptable error rate ({rate:.4}). Successful load");
        }
        Some(rate) => {
            error!("High error rate ({rate:.4} >= {NORMAL_ERROR_RATE}). Failed load");
        }
    }
    info!(
        "Files drained: {}, processed records: {}, errors: {}",
        summary.files, summary.processed, summary.errors
    );
}
