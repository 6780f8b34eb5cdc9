//! Shared context handed to every pipeline thread.

use crossbeam_channel::Receiver;
use std::sync::Arc;

use crate::cache::PartitionTable;
use crate::types::RunCounters;

/// Everything a worker needs: the read-only partition table, the shared
/// counters, the dry-run switch, and the broadcast stop signal.
///
/// `stop` never carries a message; dropping its sender closes the channel and
/// every `select!` arm receiving on it fires at once. Cloned per worker.
#[derive(Clone)]
pub struct PipelineContext {
    pub table: Arc<PartitionTable>,
    pub counters: Arc<RunCounters>,
    pub dry_run: bool,
    pub stop: Receiver<()>,
}
