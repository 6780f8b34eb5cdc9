//! Worker pool: pull a raw record, parse, write. Parse failures are logged
//! and dropped here without touching counters; accounting lives in the
//! writer.

use crossbeam_channel::{Receiver, select};
use log::warn;
use std::thread::{self, JoinHandle};

use crate::cache::write_record;
use crate::parse::parse_line;
use crate::types::RawRecord;

use super::context::PipelineContext;

fn line_worker_loop(line_rx: Receiver<RawRecord>, ctx: PipelineContext) {
    loop {
        let raw = select! {
            recv(line_rx) -> msg => match msg {
                Ok(raw) => raw,
                Err(_) => break, // channel drained and closed
            },
            recv(ctx.stop) -> _ => break,
        };
        match parse_line(&raw) {
            Ok(Some(record)) => write_record(&record, &ctx.table, &ctx.counters, ctx.dry_run),
            Ok(None) => {} // empty record, valid input
            Err(err) => warn!("Dropping record: {err}"),
        }
    }
}

/// Spawn `workers` threads consuming `line_rx`. Workers exit when the channel
/// closes (decode done and drained) or the stop signal fires.
pub fn spawn_line_workers(
    line_rx: Receiver<RawRecord>,
    ctx: &PipelineContext,
    workers: usize,
) -> Vec<JoinHandle<()>> {
    (0..workers)
        .map(|_| {
            let line_rx = line_rx.clone();
            let ctx = ctx.clone();
            thread::spawn(move || line_worker_loop(line_rx, ctx))
        })
        .collect()
}
