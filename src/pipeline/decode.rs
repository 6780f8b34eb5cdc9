//! Source discovery and the gzip decode stage.
//!
//! Each file is decompressed fully into memory (bounds memory by file size,
//! not run size), then split on newlines and streamed to the workers through
//! a bounded channel so consumption starts before the split finishes.

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, select};
use flate2::read::GzDecoder;
use glob::MatchOptions;
use log::warn;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crate::types::RawRecord;

/// Resolve the input glob. An invalid pattern is a fatal configuration error;
/// an empty match set is a valid (empty) run. `*` does not match a leading
/// dot, so files already carrying the processed marker are not rediscovered.
pub fn discover_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let paths = glob::glob_with(pattern, options)
        .with_context(|| format!("invalid glob pattern {pattern:?}"))?;
    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => files.push(path),
            Err(err) => warn!("Skipping unreadable match: {err}"),
        }
    }
    Ok(files)
}

/// Open and fully decompress one gzip file. Open failures, a bad magic, and
/// truncated streams all surface here as file-level errors.
fn read_gz_bytes(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut decoder = GzDecoder::new(file);
    let mut content = Vec::new();
    decoder
        .read_to_end(&mut content)
        .with_context(|| format!("decompress {}", path.display()))?;
    Ok(content)
}

/// Spawn the decode stage for one file: decompress, split on `\n`, send each
/// raw record to `line_tx`. Every send selects against `stop` so a shutdown
/// never deadlocks on a full channel. Returns the number of records sent;
/// an `Err` means the file must be skipped (and not renamed).
pub fn spawn_decode_thread(
    path: PathBuf,
    line_tx: Sender<RawRecord>,
    stop: Receiver<()>,
) -> JoinHandle<Result<usize>> {
    thread::spawn(move || -> Result<usize> {
        let content = read_gz_bytes(&path)?;
        let mut count = 0_usize;
        for line in content.split(|&b| b == b'\n') {
            select! {
                send(line_tx, line.to_vec()) -> res => {
                    if res.is_err() {
                        break;
                    }
                    count += 1;
                }
                recv(stop) -> _ => break,
            }
        }
        drop(line_tx);
        Ok(count)
    })
}
