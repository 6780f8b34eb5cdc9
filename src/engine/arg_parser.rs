use clap::Parser;

use crate::types::{Opts, PartitionAddrs};

struct DefaultArgs;

impl DefaultArgs {
    pub const PATTERN: &'static str = "/data/appsinstalled/*.tsv.gz";
    pub const WORKERS: &'static str = "30";
    pub const IDFA: &'static str = "127.0.0.1:33013";
    pub const GAID: &'static str = "127.0.0.1:33014";
    pub const ADID: &'static str = "127.0.0.1:33015";
    pub const DVID: &'static str = "127.0.0.1:33016";
}

/// Concurrent memcached loader for appsinstalled logs.
#[derive(Clone, Parser)]
#[command(name = "memcload")]
#[command(about = "Load gzip TSV appsinstalled logs into memcached; use --dry to count without writing.")]
pub struct Cli {
    /// Glob for source data files.
    #[arg(long, default_value = DefaultArgs::PATTERN)]
    pub pattern: String,

    /// Read and parse log files without writing to memcache.
    #[arg(long)]
    pub dry: bool,

    /// Worker threads per file.
    #[arg(long, short = 'w', default_value = DefaultArgs::WORKERS)]
    pub workers: usize,

    /// memcached host:port for the idfa partition.
    #[arg(long, default_value = DefaultArgs::IDFA)]
    pub idfa: String,

    /// memcached host:port for the gaid partition.
    #[arg(long, default_value = DefaultArgs::GAID)]
    pub gaid: String,

    /// memcached host:port for the adid partition.
    #[arg(long, default_value = DefaultArgs::ADID)]
    pub adid: String,

    /// memcached host:port for the dvid partition.
    #[arg(long, default_value = DefaultArgs::DVID)]
    pub dvid: String,

    /// Verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    pub fn to_opts(&self) -> Opts {
        Opts {
            pattern: self.pattern.clone(),
            dry_run: self.dry,
            workers: self.workers.max(1),
            addrs: PartitionAddrs {
                idfa: self.idfa.clone(),
                gaid: self.gaid.clone(),
                adid: self.adid.clone(),
                dvid: self.dvid.clone(),
            },
            verbose: self.verbose,
        }
    }
}
