use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Block I/O profiling engine: capture and analyze block-device trace data.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Capture a trace from a live block device (requires an external tracer).
    Trace {
        /// Block device to trace, e.g. /dev/sdb.
        device: PathBuf,
        /// Trace duration in seconds. Must be at least 3.
        duration_secs: u64,
        /// Directory to write the captured archive into.
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Analyze a previously captured archive and print a report.
    Post {
        /// Path to the captured `.tar` archive.
        archive: PathBuf,
        /// Scratch directory for extracted shards.
        #[arg(short, long)]
        work_dir: Option<PathBuf>,
        /// Spatial histogram bucket size, in bytes.
        #[arg(long)]
        bucket_size: Option<u64>,
        /// Capacity band width, as a fraction of device capacity.
        #[arg(long)]
        percent: Option<f64>,
        /// Number of files to list in the top-files report.
        #[arg(long)]
        top_count_limit: Option<usize>,
    },
    /// Trace and build live-mode snapshots for a block device.
    Live {
        /// Block device to trace, e.g. /dev/sdb.
        device: PathBuf,
        /// Trace duration in seconds. Must be at least 3.
        duration_secs: u64,
    },
}
