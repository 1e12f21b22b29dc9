use serde::{Deserialize, Serialize};

/// Tunables for the ingestion-and-aggregation pipeline. See spec §6.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Config {
    /// Granularity of the spatial histogram, in bytes.
    pub bucket_size: u64,
    /// Capacity band width for the skew histogram, as a fraction of device capacity.
    pub percent: f64,
    /// File-ranking cutoff for the top-files report.
    pub top_count_limit: usize,
    /// Maximum number of shard-parsing workers in flight at once.
    pub worker_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bucket_size: 1024 * 1024,
            percent: 0.020,
            top_count_limit: 10,
            worker_cap: 32,
        }
    }
}
