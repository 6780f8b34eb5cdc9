//! memcload CLI: load appsinstalled logs into memcached; use --dry to count without writing.

use anyhow::Result;
use clap::Parser;
use memcload::engine::Cli;
use memcload::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
